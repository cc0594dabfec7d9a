use std::fmt;

/// Main error type for the ftps client
#[derive(Debug)]
pub enum FtpsError {
    // Connection Errors
    ConnectionRefused(String),
    ConnectionTimeout(String),
    ConnectionLost(String),
    NotConnected(String),
    InvalidHost(String),

    // Authentication Errors
    InvalidCredentials { code: u16, message: String },
    AuthenticationFailed { code: u16, message: String },

    // Transfer Errors
    FileNotFound { code: u16, message: String },
    FileNameNotAllowed { code: u16, message: String },
    InsufficientStorage { code: u16, message: String },
    TransferFailed { code: u16, message: String },
    DataConnectionFailed(String),

    // Protocol Errors
    ProtocolViolation { code: u16, message: String },
    CommandNotSupported { code: u16, message: String },
    ResponseParseError(String),

    // Configuration Errors
    InvalidConfigValue(String),
    Config(config::ConfigError),

    // Local command errors
    InvalidPattern(String),
    MissingArgument(String),

    // IO Errors
    Io(std::io::Error),
}

impl fmt::Display for FtpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Connection Errors
            Self::ConnectionRefused(msg) => write!(f, "Connection refused: {}", msg),
            Self::ConnectionTimeout(msg) => write!(f, "Connection timeout: {}", msg),
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::NotConnected(msg) => write!(f, "Not connected: {}", msg),
            Self::InvalidHost(msg) => write!(f, "Invalid host: {}", msg),

            // Authentication Errors
            Self::InvalidCredentials { code, message } => {
                write!(f, "Invalid credentials ({}): {}", code, message)
            }
            Self::AuthenticationFailed { code, message } => {
                write!(f, "Authentication failed ({}): {}", code, message)
            }

            // Transfer Errors
            Self::FileNotFound { code, message } => {
                write!(f, "File not found ({}): {}", code, message)
            }
            Self::FileNameNotAllowed { code, message } => {
                write!(f, "File name not allowed ({}): {}", code, message)
            }
            Self::InsufficientStorage { code, message } => {
                write!(f, "Insufficient storage ({}): {}", code, message)
            }
            Self::TransferFailed { code, message } => {
                write!(f, "Transfer failed ({}): {}", code, message)
            }
            Self::DataConnectionFailed(msg) => write!(f, "Data connection failed: {}", msg),

            // Protocol Errors
            Self::ProtocolViolation { code, message } => {
                write!(f, "Protocol violation ({}): {}", code, message)
            }
            Self::CommandNotSupported { code, message } => {
                write!(f, "Command not supported ({}): {}", code, message)
            }
            Self::ResponseParseError(msg) => write!(f, "Response parse error: {}", msg),

            // Configuration Errors
            Self::InvalidConfigValue(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Config(err) => write!(f, "Configuration error: {}", err),

            // Local command errors
            Self::InvalidPattern(msg) => write!(f, "Invalid pattern: {}", msg),
            Self::MissingArgument(msg) => write!(f, "Missing argument: {}", msg),

            // IO Errors
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for FtpsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FtpsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<config::ConfigError> for FtpsError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<glob::PatternError> for FtpsError {
    fn from(err: glob::PatternError) -> Self {
        Self::InvalidPattern(err.to_string())
    }
}

impl From<glob::GlobError> for FtpsError {
    fn from(err: glob::GlobError) -> Self {
        Self::Io(err.into())
    }
}

/// Map a negative FTP reply onto an error
impl FtpsError {
    pub fn from_ftp_response(code: u16, message: String) -> Self {
        match code {
            530 => Self::InvalidCredentials { code, message },
            331 | 332 => Self::AuthenticationFailed { code, message },

            550 => Self::FileNotFound { code, message },
            553 => Self::FileNameNotAllowed { code, message },
            452 | 552 => Self::InsufficientStorage { code, message },
            425 | 426 | 451 | 551 => Self::TransferFailed { code, message },

            502 | 504 => Self::CommandNotSupported { code, message },

            _ => Self::ProtocolViolation { code, message },
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FtpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_code_mapping() {
        assert!(matches!(
            FtpsError::from_ftp_response(530, "Login incorrect".into()),
            FtpsError::InvalidCredentials { code: 530, .. }
        ));
        assert!(matches!(
            FtpsError::from_ftp_response(550, "No such file".into()),
            FtpsError::FileNotFound { code: 550, .. }
        ));
        assert!(matches!(
            FtpsError::from_ftp_response(426, "Aborted".into()),
            FtpsError::TransferFailed { code: 426, .. }
        ));
        assert!(matches!(
            FtpsError::from_ftp_response(421, "Timeout".into()),
            FtpsError::ProtocolViolation { code: 421, .. }
        ));
    }

    #[test]
    fn test_display_includes_code() {
        let err = FtpsError::from_ftp_response(550, "a.dat: No such file".into());
        assert_eq!(err.to_string(), "File not found (550): a.dat: No such file");
    }
}
