//! Command connection management for the ftps client
//!
//! Handles the TCP control channel: connecting, sending CRLF-terminated
//! commands and assembling (possibly multi-line) replies.

use log::{debug, info, warn};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{FtpsError, Result};
use crate::responses::{FtpResponse, is_error, parse_response};

/// Manages the FTP command connection (main control channel)
pub struct CommandConnection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    peer: SocketAddr,
    connected: bool,
}

impl CommandConnection {
    /// Connect to the first reachable address of `host:port`
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| FtpsError::InvalidHost(format!("{}: {}", host, e)))?
            .collect();

        if addrs.is_empty() {
            return Err(FtpsError::InvalidHost(format!("{} did not resolve", host)));
        }

        let mut last_error = None;
        for addr in addrs {
            debug!("Trying control connection to {}", addr);
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Self::from_stream(stream, addr, timeout),
                Err(e) => {
                    warn!("Connection to {} failed: {}", addr, e);
                    last_error = Some((addr, e));
                }
            }
        }

        Err(match last_error {
            Some((addr, e)) => match e.kind() {
                io::ErrorKind::TimedOut => {
                    FtpsError::ConnectionTimeout(format!("Connection to {} timed out", addr))
                }
                io::ErrorKind::ConnectionRefused => {
                    FtpsError::ConnectionRefused(format!("Connection refused by {}", addr))
                }
                _ => FtpsError::Io(e),
            },
            None => FtpsError::InvalidHost(format!("{} did not resolve", host)),
        })
    }

    fn from_stream(stream: TcpStream, peer: SocketAddr, timeout: Duration) -> Result<Self> {
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        let writer = stream.try_clone()?;
        info!("Connected to FTP server at {}", peer);

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            peer,
            connected: true,
        })
    }

    /// Address of the server end of the control channel
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Check if the connection is still usable
    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Send an FTP command (adds CRLF automatically)
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        if !self.connected {
            return Err(FtpsError::NotConnected("Control channel closed".to_string()));
        }

        if command.starts_with("PASS ") {
            debug!("Sending command: PASS [hidden]");
        } else {
            debug!("Sending command: {}", command);
        }

        let result = self
            .writer
            .write_all(format!("{}\r\n", command).as_bytes())
            .and_then(|_| self.writer.flush());

        match result {
            Ok(()) => Ok(()),
            Err(e) => match e.kind() {
                io::ErrorKind::BrokenPipe
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionReset => {
                    self.connected = false;
                    Err(FtpsError::ConnectionLost(
                        "Connection lost while sending".to_string(),
                    ))
                }
                _ => Err(FtpsError::Io(e)),
            },
        }
    }

    /// Read a single line from the control channel
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.connected = false;
                Err(FtpsError::ConnectionLost(
                    "Server closed the connection".to_string(),
                ))
            }
            Ok(_) => Ok(line),
            Err(e) => match e.kind() {
                io::ErrorKind::UnexpectedEof
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionReset => {
                    self.connected = false;
                    Err(FtpsError::ConnectionLost(
                        "Connection lost while reading".to_string(),
                    ))
                }
                _ => Err(FtpsError::Io(e)),
            },
        }
    }

    /// Read an FTP response (handles multi-line responses)
    pub fn read_response(&mut self) -> Result<FtpResponse> {
        let mut raw = String::new();
        let mut expected_code: Option<String> = None;

        loop {
            let line = self.read_line()?;
            raw.push_str(&line);

            match &expected_code {
                None => {
                    // "ddd-" opens a multi-line reply closed by "ddd "
                    if line.len() >= 4 && line.as_bytes()[3] == b'-' {
                        expected_code = Some(line[0..3].to_string());
                    } else {
                        break;
                    }
                }
                Some(code) => {
                    if line.starts_with(code.as_str()) && line.as_bytes().get(3) == Some(&b' ') {
                        break;
                    }
                }
            }
        }

        let response = parse_response(&raw)?;
        if is_error(response.code) {
            debug!("Server rejected command: {}", response);
        } else {
            debug!("Received response: {}", response);
        }
        Ok(response)
    }

    /// Send a command and read its reply
    pub fn execute(&mut self, command: &str) -> Result<FtpResponse> {
        self.send_command(command)?;
        self.read_response()
    }

    /// Shut the socket down
    pub fn disconnect(&mut self) -> Result<()> {
        if self.connected {
            self.connected = false;
            info!("Disconnecting from FTP server at {}", self.peer);
            self.writer.shutdown(std::net::Shutdown::Both)?;
        }
        Ok(())
    }
}

impl Drop for CommandConnection {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    fn scripted_server(script: &'static [u8]) -> (SocketAddr, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(script).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
            let mut received = Vec::new();
            let _ = stream.read_to_end(&mut received);
            received
        });
        (addr, handle)
    }

    #[test]
    fn test_reads_multi_line_then_single_line() {
        let (addr, server) =
            scripted_server(b"220-Welcome\r\n220-to the server\r\n220 Ready\r\n331 Need password\r\n");

        let mut conn =
            CommandConnection::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();
        let greeting = conn.read_response().unwrap();
        assert_eq!(greeting.code, 220);
        assert!(greeting.message.contains("to the server"));

        let reply = conn.execute("USER anonymous").unwrap();
        assert_eq!(reply.code, 331);

        conn.disconnect().unwrap();
        let received = server.join().unwrap();
        assert_eq!(received, b"USER anonymous\r\n");
    }

    #[test]
    fn test_eof_marks_connection_lost() {
        let (addr, server) = scripted_server(b"");

        let mut conn =
            CommandConnection::connect("127.0.0.1", addr.port(), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            conn.read_response(),
            Err(FtpsError::ConnectionLost(_))
        ));
        assert!(!conn.is_connected());
        assert!(matches!(
            conn.send_command("NOOP"),
            Err(FtpsError::NotConnected(_))
        ));

        drop(conn);
        server.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(CommandConnection::connect("127.0.0.1", port, Duration::from_secs(2)).is_err());
    }
}
