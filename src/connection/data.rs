//! Data connection management for FTP transfers
//!
//! Only passive mode is supported: the client connects to the address the
//! server announced in its `227` reply.

use log::{debug, error, info};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::{FtpsError, Result};

/// A passive-mode data connection for one transfer
pub struct DataConnection {
    stream: Option<TcpStream>,
    peer: SocketAddr,
}

impl DataConnection {
    /// Create error for data connection failures
    fn data_error(msg: &str) -> FtpsError {
        FtpsError::DataConnectionFailed(msg.to_string())
    }

    /// Connect to the address announced by the server
    pub fn open(addr: SocketAddr, timeout: Duration) -> Result<Self> {
        info!("Opening passive data connection to {}", addr);

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            error!("Failed to connect data channel to {}: {}", addr, e);
            Self::data_error(&format!("Failed to connect to {}: {}", addr, e))
        })?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        Ok(Self {
            stream: Some(stream),
            peer: addr,
        })
    }

    fn stream_mut(&mut self) -> Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| Self::data_error("No data connection established"))
    }

    /// Send data over the connection
    pub fn send_data(&mut self, data: &[u8]) -> Result<usize> {
        let stream = self.stream_mut()?;
        stream
            .write_all(data)
            .map_err(|e| Self::data_error(&format!("Failed to send data: {}", e)))?;
        Ok(data.len())
    }

    /// Receive data from the connection; 0 means the server closed it
    pub fn receive_data(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let stream = self.stream_mut()?;
        stream
            .read(buffer)
            .map_err(|e| Self::data_error(&format!("Failed to receive data: {}", e)))
    }

    /// Close the data connection, signalling end-of-file to the server
    pub fn close(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.shutdown(std::net::Shutdown::Both)?;
            debug!("Data connection to {} closed", self.peer);
        }
        Ok(())
    }
}

impl Drop for DataConnection {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
