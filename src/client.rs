use log::{debug, info};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::connection::{CommandConnection, Connector, DataConnection, FtpTransport};
use crate::error::{FtpsError, Result};
use crate::responses::{
    COMMAND_OK, CURRENT_DIRECTORY, GOODBYE, PASSIVE_MODE, SERVICE_READY, TRANSFER_DONE,
    TRANSFER_STARTING, USER_LOGGED_IN, USER_NAME_OKAY_NEED_PASSWORD, is_success,
    parse_pasv_address, parse_quoted_path,
};
use crate::transfer::{
    download_file_with_progress, read_directory_listing, upload_file_with_progress,
    validate_download_path, validate_upload_file,
};

/// Opens logged-in [`FtpClient`] sessions using the client configuration
#[derive(Debug, Clone)]
pub struct FtpConnector {
    config: ClientConfig,
}

impl FtpConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Connector for FtpConnector {
    type Transport = FtpClient;

    fn connect(&self, host: &str, user: &str, password: &str) -> Result<FtpClient> {
        FtpClient::login(&self.config, host, user, password)
    }
}

/// Blocking FTP client over a control channel with passive data transfers
pub struct FtpClient {
    connection: CommandConnection,
    local_directory: PathBuf,
    data_timeout: Duration,
}

impl FtpClient {
    /// Connect to `host`, authenticate and switch to binary transfers
    pub fn login(config: &ClientConfig, host: &str, user: &str, password: &str) -> Result<Self> {
        let (name, port) = config.resolve_endpoint(host)?;
        info!("Connecting to {}:{} as {}", name, port, user);

        let mut connection = CommandConnection::connect(&name, port, config.connect_timeout())?;

        let greeting = connection.read_response()?.expect(&[SERVICE_READY])?;
        info!("Server greeting: {}", greeting.message.trim());

        let reply = connection.execute(&format!("USER {}", user))?;
        match reply.code {
            USER_LOGGED_IN => debug!("Logged in without password"),
            USER_NAME_OKAY_NEED_PASSWORD => {
                connection
                    .execute(&format!("PASS {}", password))?
                    .expect(&[USER_LOGGED_IN])?;
            }
            code => return Err(FtpsError::from_ftp_response(code, reply.message)),
        }
        info!("Authenticated as {}", user);

        connection.execute("TYPE I")?.expect(&[COMMAND_OK])?;

        Ok(Self {
            connection,
            local_directory: config.local_directory().to_path_buf(),
            data_timeout: config.connect_timeout(),
        })
    }

    /// Enter passive mode and connect the data channel
    fn open_data_channel(&mut self) -> Result<DataConnection> {
        let reply = self.connection.execute("PASV")?.expect(&[PASSIVE_MODE])?;
        let mut addr = parse_pasv_address(&reply.message)?;

        // Some servers announce 0.0.0.0; reuse the control peer instead
        if addr.ip().is_unspecified() {
            addr = SocketAddr::new(self.connection.peer_addr().ip(), addr.port());
        }

        DataConnection::open(addr, self.data_timeout)
    }

    /// Open the data channel and issue a transfer command
    fn start_transfer(&mut self, command: &str) -> Result<DataConnection> {
        let data = self.open_data_channel()?;
        self.connection.execute(command)?.expect(&TRANSFER_STARTING)?;
        Ok(data)
    }

    /// Read the reply that closes a transfer
    fn finish_transfer(&mut self) -> Result<()> {
        self.connection.read_response()?.expect(&TRANSFER_DONE)?;
        Ok(())
    }

    /// Local path for a file name, relative names resolve against the local directory
    fn local_path(&self, name: &str) -> PathBuf {
        self.local_directory.join(name)
    }
}

/// Last path component of `name`, or `name` itself
fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
}

impl FtpTransport for FtpClient {
    fn pwd(&mut self) -> Result<String> {
        let reply = self.connection.execute("PWD")?.expect(&[CURRENT_DIRECTORY])?;
        parse_quoted_path(&reply.message)
    }

    fn chdir(&mut self, path: &str) -> Result<()> {
        let reply = self.connection.execute(&format!("CWD {}", path))?;
        if !is_success(reply.code) {
            return Err(FtpsError::from_ftp_response(reply.code, reply.message));
        }
        Ok(())
    }

    fn list(&mut self, pattern: &str) -> Result<Vec<String>> {
        let command = if pattern.is_empty() {
            "LIST".to_string()
        } else {
            format!("LIST {}", pattern)
        };

        let mut data = self.start_transfer(&command)?;
        let listing = read_directory_listing(&mut data);
        drop(data);

        // Always consume the closing reply so the control channel stays in step
        let done = self.finish_transfer();
        let listing = listing?;
        done?;
        Ok(listing)
    }

    fn get(&mut self, name: &str) -> Result<()> {
        let local_path = self.local_path(base_name(name));
        validate_download_path(&local_path)?;

        let mut data = self.start_transfer(&format!("RETR {}", name))?;
        let received = download_file_with_progress(&mut data, &local_path, name, &mut io::stdout());
        drop(data);

        let done = self.finish_transfer();
        received?;
        done
    }

    fn put(&mut self, name: &str) -> Result<()> {
        let local_path = self.local_path(name);
        validate_upload_file(&local_path)?;

        let remote_name = base_name(name);
        let mut data = self.start_transfer(&format!("STOR {}", remote_name))?;
        let sent = upload_file_with_progress(&mut data, &local_path, remote_name, &mut io::stdout());
        drop(data);

        let done = self.finish_transfer();
        sent?;
        done
    }

    fn quit(&mut self) -> Result<()> {
        let reply = self.connection.execute("QUIT");
        self.connection.disconnect()?;
        reply?.expect(&[GOODBYE])?;
        Ok(())
    }
}
