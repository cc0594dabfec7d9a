//! FTP response parsing functionality

use log::debug;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{FtpsError, Result};

/// Parsed FTP response from server
#[derive(Debug, Clone, PartialEq)]
pub struct FtpResponse {
    /// Response code (e.g., 230, 530, 331)
    pub code: u16,

    /// Response message, continuation lines included
    pub message: String,
}

impl FtpResponse {
    /// Create a new FTP response
    pub fn new(code: u16, message: String) -> Self {
        Self { code, message }
    }

    /// Turn any code outside `expected` into an error
    pub fn expect(self, expected: &[u16]) -> Result<Self> {
        if expected.contains(&self.code) {
            Ok(self)
        } else {
            Err(FtpsError::from_ftp_response(self.code, self.message))
        }
    }
}

impl std::fmt::Display for FtpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// Parse FTP response string into structured response
pub fn parse_response(response: &str) -> Result<FtpResponse> {
    let response = response.trim();

    if response.is_empty() {
        return Err(FtpsError::ResponseParseError("Empty response".to_string()));
    }

    // FTP responses start with 3-digit code followed by space or dash
    if response.len() < 3 || !response.is_char_boundary(3) {
        return Err(FtpsError::ResponseParseError(format!(
            "Response too short: {}",
            response
        )));
    }

    let code_str = &response[0..3];
    let code = code_str.parse::<u16>().map_err(|_| {
        FtpsError::ResponseParseError(format!("Invalid response code: {}", code_str))
    })?;

    let separator = response[3..].chars().next().unwrap_or(' ');
    if separator != ' ' && separator != '-' {
        return Err(FtpsError::ResponseParseError(format!(
            "Missing separator after code: {}",
            response
        )));
    }

    // Everything after "XXX " or "XXX-"
    let message = response.get(4..).unwrap_or("").to_string();

    debug!("Parsed FTP response: code={}, message='{}'", code, message);

    Ok(FtpResponse::new(code, message))
}

/// Extract the data address from `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)`
pub fn parse_pasv_address(message: &str) -> Result<SocketAddr> {
    let malformed = || FtpsError::ResponseParseError(format!("Cannot parse PASV: {}", message));

    let start = message.find('(').ok_or_else(malformed)?;
    let end = message[start..].find(')').ok_or_else(malformed)? + start;

    let nums = message[start + 1..end]
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|_| malformed())?;

    if nums.len() != 6 {
        return Err(malformed());
    }

    let ip = IpAddr::V4(Ipv4Addr::new(nums[0], nums[1], nums[2], nums[3]));
    let port = u16::from(nums[4]) * 256 + u16::from(nums[5]);
    Ok(SocketAddr::new(ip, port))
}

/// Extract the directory from `257 "/some/path" is current directory`
///
/// A doubled quote inside the path stands for a literal quote.
pub fn parse_quoted_path(message: &str) -> Result<String> {
    let malformed = || FtpsError::ResponseParseError(format!("Cannot parse PWD: {}", message));

    let start = message.find('"').ok_or_else(malformed)?;
    let mut path = String::new();
    let mut chars = message[start + 1..].chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                path.push('"');
            } else {
                return Ok(path);
            }
        } else {
            path.push(c);
        }
    }

    Err(malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let response = parse_response("230 User logged in, proceed\r\n").unwrap();
        assert_eq!(response.code, 230);
        assert_eq!(response.message, "User logged in, proceed");
    }

    #[test]
    fn test_parse_multi_line() {
        let response = parse_response("220-Welcome\r\n220 Ready\r\n").unwrap();
        assert_eq!(response.code, 220);
        assert!(response.message.starts_with("Welcome"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_response("").is_err());
        assert!(parse_response("ab").is_err());
        assert!(parse_response("abc hello").is_err());
        assert!(parse_response("200xhello").is_err());
    }

    #[test]
    fn test_expect() {
        let ok = FtpResponse::new(250, "Okay".to_string());
        assert!(ok.expect(&[250]).is_ok());

        let denied = FtpResponse::new(550, "No such directory".to_string());
        assert!(matches!(
            denied.expect(&[250]),
            Err(FtpsError::FileNotFound { code: 550, .. })
        ));
    }

    #[test]
    fn test_parse_pasv_address() {
        let addr = parse_pasv_address("Entering Passive Mode (127,0,0,1,8,52).").unwrap();
        assert_eq!(addr, "127.0.0.1:2100".parse().unwrap());

        assert!(parse_pasv_address("Entering Passive Mode").is_err());
        assert!(parse_pasv_address("Entering Passive Mode (127,0,0,1,8)").is_err());
        assert!(parse_pasv_address("Entering Passive Mode (300,0,0,1,8,52)").is_err());
    }

    #[test]
    fn test_parse_quoted_path() {
        assert_eq!(
            parse_quoted_path("\"/home/user\" is current directory").unwrap(),
            "/home/user"
        );
        assert_eq!(
            parse_quoted_path("\"/odd \"\"name\"\"\" created").unwrap(),
            "/odd \"name\""
        );
        assert!(parse_quoted_path("no quotes here").is_err());
        assert!(parse_quoted_path("\"/unterminated").is_err());
    }
}
