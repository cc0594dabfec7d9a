//! Command parsing functionality

use super::Command;

/// Split a raw input line into a command and its argument tokens
///
/// Never fails: empty or unrecognised input yields `Command::Bad` with no
/// arguments.
pub fn parse_command(input: &str) -> (Command, Vec<String>) {
    let mut parts = input.split_whitespace();

    let Some(word) = parts.next() else {
        return (Command::Bad, Vec::new());
    };

    match Command::from_word(&word.to_lowercase()) {
        Some(cmd) => (cmd, parts.map(str::to_string).collect()),
        None => (Command::Bad, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("pwd"), (Command::Pwd, vec![]));
        assert_eq!(parse_command("help"), (Command::Help, vec![]));
        assert_eq!(
            parse_command("cd /pub/files"),
            (Command::Cd, vec!["/pub/files".to_string()])
        );
    }

    #[test]
    fn test_parse_is_whitespace_and_case_tolerant() {
        assert_eq!(
            parse_command("  LS *.txt"),
            (Command::Ls, vec!["*.txt".to_string()])
        );
        assert_eq!(
            parse_command("\tMget   a*.dat \t b*.dat  \n"),
            (
                Command::Mget,
                vec!["a*.dat".to_string(), "b*.dat".to_string()]
            )
        );
        assert_eq!(parse_command("ReConnect\r\n"), (Command::Reconnect, vec![]));
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_command(""), (Command::Bad, vec![]));
        assert_eq!(parse_command("   \t  \n"), (Command::Bad, vec![]));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(parse_command("delete foo.txt"), (Command::Bad, vec![]));
        assert_eq!(parse_command("bad"), (Command::Bad, vec![]));
    }
}
