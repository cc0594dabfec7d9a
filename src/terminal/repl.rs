//! Interactive read-eval loop
//!
//! Reads lines, hands them to the command parser and routes valid commands to
//! the session.

use log::{debug, error, info};
use std::io::{self, BufRead, Write};

use crate::commands::{Command, get_usage_hint, parse_command};
use crate::connection::Connector;
use crate::session::Session;

const PROMPT: &str = ">> ";

/// The session operations the loop drives
pub trait Shell {
    fn connect(&mut self);
    fn execute(&mut self, command: Command, args: &[String]);
    fn destroy(&mut self);
}

impl<C: Connector, W: Write> Shell for Session<C, W> {
    fn connect(&mut self) {
        Session::connect(self)
    }

    fn execute(&mut self, command: Command, args: &[String]) {
        Session::execute(self, command, args)
    }

    fn destroy(&mut self) {
        Session::destroy(self)
    }
}

/// True when the line asks to leave the loop
pub fn is_exit_phrase(line: &str) -> bool {
    let line = line.to_lowercase();
    line.contains("quit") || line.contains("exit")
}

/// Terminal handler for the interactive session
pub struct Repl<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Repl<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Connect, loop until an exit phrase or end of input, then destroy the session
    pub fn run<S: Shell>(&mut self, shell: &mut S) -> io::Result<()> {
        shell.connect();
        info!("Interactive session started");

        let result = self.command_loop(shell);

        writeln!(self.output, "Quit")?;
        shell.destroy();
        result
    }

    fn command_loop<S: Shell>(&mut self, shell: &mut S) -> io::Result<()> {
        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    debug!("End of input");
                    writeln!(self.output)?;
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    return Err(e);
                }
            }

            if is_exit_phrase(&line) {
                return Ok(());
            }

            debug!("User entered: {}", line.trim());
            match parse_command(&line) {
                (Command::Bad, _) => writeln!(self.output, "{}", get_usage_hint())?,
                (command, args) => shell.execute(command, &args),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingShell {
        connects: usize,
        destroys: usize,
        executed: Vec<(Command, Vec<String>)>,
    }

    impl Shell for RecordingShell {
        fn connect(&mut self) {
            self.connects += 1;
        }

        fn execute(&mut self, command: Command, args: &[String]) {
            self.executed.push((command, args.to_vec()));
        }

        fn destroy(&mut self) {
            self.destroys += 1;
        }
    }

    fn run_script(script: &str) -> (RecordingShell, String) {
        let mut shell = RecordingShell::default();
        let mut output = Vec::new();
        Repl::new(Cursor::new(script.to_string()), &mut output)
            .run(&mut shell)
            .unwrap();
        (shell, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_exit_phrase() {
        assert!(is_exit_phrase("quit\n"));
        assert!(is_exit_phrase("EXIT"));
        assert!(is_exit_phrase("please exit now"));
        assert!(is_exit_phrase("QuIt please"));
        assert!(!is_exit_phrase("ls *.txt"));
    }

    #[test]
    fn test_routes_commands_until_exit() {
        let (shell, output) = run_script("cd /pub\n  LS *.txt\nplease exit now\npwd\n");

        assert_eq!(shell.connects, 1);
        assert_eq!(shell.destroys, 1);
        assert_eq!(
            shell.executed,
            vec![
                (Command::Cd, vec!["/pub".to_string()]),
                (Command::Ls, vec!["*.txt".to_string()]),
            ]
        );
        assert_eq!(output, ">> >> >> Quit\n");
    }

    #[test]
    fn test_bad_command_prints_hint() {
        let (shell, output) = run_script("delete foo\n\nquit\n");

        assert!(shell.executed.is_empty());
        assert_eq!(output.matches("Bad command").count(), 2);
        assert!(output.contains(
            "Please provide one of: pwd, cd, ls, put, help, get, mget, mput, reconnect"
        ));
        assert_eq!(shell.destroys, 1);
    }

    #[test]
    fn test_end_of_input_ends_loop() {
        let (shell, output) = run_script("help\n");

        assert_eq!(shell.executed, vec![(Command::Help, vec![])]);
        assert_eq!(shell.destroys, 1);
        assert!(output.ends_with("Quit\n"));
    }
}
