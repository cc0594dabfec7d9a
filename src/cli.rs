//! Command-line arguments and credential prompts

use clap::Parser;
use clap::error::ErrorKind;
use std::io::{self, BufRead, Write};

use crate::error::Result;

pub const USAGE: &str = "Usage: ftps [options] ftp-host";

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "ftps",
    about = "Interactive FTP client that reconnects after idle periods",
    override_usage = "ftps [options] ftp-host"
)]
pub struct Cli {
    /// User name to log in with (prompted when omitted)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password to log in with (prompted without echo when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// FTP server, optionally as host:port
    pub host: String,
}

/// Outcome of argument parsing
#[derive(Debug)]
pub enum CliAction {
    Run(Cli),
    /// Help was requested; print it and exit successfully
    ShowHelp(String),
    /// Wrong arguments; print usage and exit with status 1
    Usage(String),
}

impl Cli {
    pub fn parse_from_args<I, T>(args: I) -> CliAction
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => CliAction::Run(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                CliAction::ShowHelp(e.to_string())
            }
            Err(e) => CliAction::Usage(e.to_string()),
        }
    }
}

/// Read one line, without its line ending
fn read_trimmed_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Prompt for the user name on the given streams
pub fn prompt_user(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "Please enter a username: ")?;
    output.flush()?;
    read_trimmed_line(input)
}

/// Prompt for the password with terminal echo disabled
pub fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Please enter your password: ")?;
    println!();
    Ok(password)
}

/// Fill in missing credentials interactively
pub fn resolve_credentials(cli: &Cli) -> Result<(String, String)> {
    let user = match &cli.user {
        Some(user) => user.clone(),
        None => prompt_user(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let password = match &cli.password {
        Some(password) => password.clone(),
        None => prompt_password()?,
    };

    Ok((user, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_full_arguments() {
        match Cli::parse_from_args(["ftps", "-u", "alice", "--password", "pw", "ftp.example.com"]) {
            CliAction::Run(cli) => {
                assert_eq!(cli.user.as_deref(), Some("alice"));
                assert_eq!(cli.password.as_deref(), Some("pw"));
                assert_eq!(cli.host, "ftp.example.com");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_host_only() {
        match Cli::parse_from_args(["ftps", "ftp.example.com:2121"]) {
            CliAction::Run(cli) => {
                assert!(cli.user.is_none());
                assert!(cli.password.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_help_flag() {
        assert!(matches!(
            Cli::parse_from_args(["ftps", "-h"]),
            CliAction::ShowHelp(_)
        ));
        assert!(matches!(
            Cli::parse_from_args(["ftps", "--help"]),
            CliAction::ShowHelp(_)
        ));
    }

    #[test]
    fn test_wrong_positional_count() {
        assert!(matches!(
            Cli::parse_from_args(["ftps"]),
            CliAction::Usage(_)
        ));
        assert!(matches!(
            Cli::parse_from_args(["ftps", "one", "two"]),
            CliAction::Usage(_)
        ));
    }

    #[test]
    fn test_prompt_user() {
        let mut input = Cursor::new("alice\r\n");
        let mut output = Vec::new();

        assert_eq!(prompt_user(&mut input, &mut output).unwrap(), "alice");
        assert_eq!(output, b"Please enter a username: ");
    }
}
