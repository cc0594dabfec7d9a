//! Help text for the interactive prompt

use super::Command;

/// Recognised commands, space separated in declared order
pub fn get_help_text() -> String {
    command_names().join(" ")
}

/// Hint printed after an unrecognised command
pub fn get_usage_hint() -> String {
    format!(
        "Bad command\nPlease provide one of: {}",
        command_names().join(", ")
    )
}

fn command_names() -> Vec<&'static str> {
    Command::ALL.iter().map(Command::name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_text_order() {
        assert_eq!(
            get_help_text(),
            "pwd cd ls put help get mget mput reconnect"
        );
    }

    #[test]
    fn test_usage_hint() {
        assert_eq!(
            get_usage_hint(),
            "Bad command\nPlease provide one of: pwd, cd, ls, put, help, get, mget, mput, reconnect"
        );
    }
}
