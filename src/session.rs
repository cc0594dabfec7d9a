//! FTP session: connection lifecycle, idle reconnects and command dispatch
//!
//! The session owns the live transport, the remembered working directory and
//! the idle timer. Every command first checks the timer: an expired session is
//! recycled transparently (the directory is restored after login), a live one
//! has its timer reset. Per-command failures are reported and never end the
//! session; only a failed login terminates the process.

use log::{debug, info, warn};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use crate::commands::{Command, get_help_text};
use crate::config::ClientConfig;
use crate::connection::{Connector, FtpTransport};
use crate::error::{FtpsError, Result};
use crate::timer::IdleTimer;
use crate::transfer::entry_name;

/// Session connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connected => write!(f, "connected"),
        }
    }
}

/// Live FTP session plus the navigation state that survives reconnects
pub struct Session<C: Connector, W: Write = io::Stdout> {
    connector: C,
    host: String,
    username: String,
    password: String,
    idle_timeout: Duration,
    local_directory: PathBuf,
    last_directory: Option<String>,
    connection: Option<C::Transport>,
    timer: Option<IdleTimer>,
    out: W,
}

impl<C: Connector> Session<C> {
    /// Create a session printing to stdout
    pub fn new(
        connector: C,
        host: &str,
        username: &str,
        password: &str,
        config: &ClientConfig,
    ) -> Self {
        Self::with_output(connector, host, username, password, config, io::stdout())
    }
}

impl<C: Connector, W: Write> Session<C, W> {
    pub fn with_output(
        connector: C,
        host: &str,
        username: &str,
        password: &str,
        config: &ClientConfig,
        out: W,
    ) -> Self {
        Self {
            connector,
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            idle_timeout: config.idle_timeout(),
            local_directory: config.local_directory().to_path_buf(),
            last_directory: None,
            connection: None,
            timer: None,
            out,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.connection.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Directory restored after every reconnect
    pub fn last_directory(&self) -> Option<&str> {
        self.last_directory.as_deref()
    }

    /// Log in; on failure print the error and exit the process
    pub fn connect(&mut self) {
        if let Err(e) = self.try_connect() {
            self.say(format_args!("Connection failed: {}", e));
            self.say("Aborting...");
            process::exit(1);
        }
    }

    /// Log in and restore (or capture) the working directory
    pub fn try_connect(&mut self) -> Result<()> {
        info!("Connecting to {} as {}", self.host, self.username);
        let mut transport = self
            .connector
            .connect(&self.host, &self.username, &self.password)?;

        match self.last_directory.clone() {
            None => {
                let dir = transport.pwd()?;
                debug!("Initial directory: {}", dir);
                self.last_directory = Some(dir);
            }
            Some(dir) => {
                debug!("Restoring directory {}", dir);
                transport.chdir(&dir)?;
            }
        }

        self.connection = Some(transport);
        let idle_timeout = self.idle_timeout;
        self.timer
            .get_or_insert_with(|| IdleTimer::new(idle_timeout))
            .reset();

        info!("Session {} with {}", self.state(), self.host);
        Ok(())
    }

    /// Best-effort logout; failures are expected on a dead link and ignored
    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.connection.take() {
            if let Err(e) = transport.quit() {
                debug!("Ignoring quit failure: {}", e);
            }
        }
    }

    pub fn reconnect(&mut self) {
        info!("Reconnecting to {}", self.host);
        self.disconnect();
        self.connect();
    }

    /// Run one command, recycling the session first if it sat idle too long
    pub fn execute(&mut self, command: Command, args: &[String]) {
        let expired = self.timer.as_ref().is_none_or(IdleTimer::expired);
        if expired || self.connection.is_none() {
            info!("Session idle past {:?}, reconnecting", self.idle_timeout);
            self.reconnect();
        } else if let Some(timer) = self.timer.as_mut() {
            timer.reset();
        }

        let arg = args.join(" ");
        debug!("Executing {} '{}'", command, arg);

        match command {
            Command::Pwd => {
                let dir = self.last_directory.clone().unwrap_or_default();
                self.say(format_args!("PWD = {}", dir));
            }
            Command::Cd => match self.change_directory(&arg) {
                Ok(dir) => self.say(format_args!("PWD = {}", dir)),
                Err(e) => self.say(format_args!("Cannot change directory to {} - {}", arg, e)),
            },
            Command::Ls => match self.with_transport(|t| t.list(&arg)) {
                Ok(entries) => {
                    for entry in entries {
                        self.say(entry);
                    }
                }
                Err(e) => self.say(format_args!("Could not do that - {}", e)),
            },
            Command::Get | Command::Put => {
                let result = required(&arg, command).and_then(|name| {
                    self.with_transport(|t| {
                        if command == Command::Get {
                            t.get(name)
                        } else {
                            t.put(name)
                        }
                    })
                });
                if let Err(e) = result {
                    self.say(format_args!("Cannot {} - {}", command, e));
                }
            }
            Command::Mget => {
                if let Err(e) = self.mget(&arg) {
                    self.say(format_args!("MGET failed - {}", e));
                }
            }
            Command::Mput => {
                if let Err(e) = self.mput(&arg) {
                    self.say(format_args!("MPUT failed - {}", e));
                }
            }
            Command::Help => self.say(get_help_text()),
            Command::Reconnect => {
                self.reconnect();
                self.say("Reconnect done");
            }
            Command::Bad => {}
        }
    }

    /// Stop the idle timer; the server connection is left as is
    pub fn destroy(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
        debug!("Session destroyed");
    }

    fn change_directory(&mut self, path: &str) -> Result<String> {
        let path = required(path, Command::Cd)?;
        let dir = self.with_transport(|t| {
            t.chdir(path)?;
            t.pwd()
        })?;
        self.last_directory = Some(dir.clone());
        Ok(dir)
    }

    /// Fetch every remote entry matching `pattern`; the first failure aborts the batch
    fn mget(&mut self, pattern: &str) -> Result<()> {
        let pattern = required(pattern, Command::Mget)?;
        let listing = self.with_transport(|t| t.list(pattern))?;

        for name in listing.iter().filter_map(|line| entry_name(line)) {
            self.say(format_args!("\tgetting {}", name));
            self.with_transport(|t| t.get(name))?;
        }
        Ok(())
    }

    /// Upload every local file matching `pattern`; the first failure aborts the batch
    fn mput(&mut self, pattern: &str) -> Result<()> {
        let pattern = required(pattern, Command::Mput)?;

        for name in expand_local(&self.local_directory, pattern)? {
            self.say(format_args!("\tputting {}", name));
            self.with_transport(|t| t.put(&name))?;
        }
        Ok(())
    }

    fn with_transport<T>(
        &mut self,
        op: impl FnOnce(&mut C::Transport) -> Result<T>,
    ) -> Result<T> {
        let transport = self
            .connection
            .as_mut()
            .ok_or_else(|| FtpsError::NotConnected("No active session".to_string()))?;
        op(transport)
    }

    /// Write one line of user-facing output
    fn say(&mut self, message: impl fmt::Display) {
        if let Err(e) = writeln!(self.out, "{}", message) {
            warn!("Failed to write output: {}", e);
        }
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

fn required(arg: &str, command: Command) -> Result<&str> {
    if arg.is_empty() {
        Err(FtpsError::MissingArgument(format!(
            "{} requires an argument",
            command
        )))
    } else {
        Ok(arg)
    }
}

/// Local files matching `pattern` under `base`, as names relative to `base`
fn expand_local(base: &Path, pattern: &str) -> Result<Vec<String>> {
    let full_pattern = base.join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .ok_or_else(|| FtpsError::InvalidPattern(format!("{} is not valid UTF-8", pattern)))?;

    let mut names = Vec::new();
    for entry in glob::glob(full_pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        let relative = path.strip_prefix(base).unwrap_or(&path);
        names.push(relative.to_string_lossy().into_owned());
    }
    Ok(names)
}
