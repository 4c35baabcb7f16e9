use std::fmt;
use std::io;

use expertctl_codec::CodecError;
use expertctl_session::SessionError;
use expertctl_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        TransportError::Timeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::InaccessibleChannel { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::Codec(err) => codec_error(context, err),
        SessionError::Discovery { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        SessionError::UnknownState(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeouts_map_to_124() {
        let err = session_error(
            "status failed",
            SessionError::Transport(TransportError::Timeout {
                port: 45454,
                timeout: Duration::from_secs(2),
            }),
        );
        assert_eq!(err.code, TIMEOUT);

        let err = session_error(
            "discovery failed",
            SessionError::Discovery {
                timeout: Duration::from_secs(2),
            },
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn inaccessible_channel_is_usage_error() {
        let err = session_error(
            "channel failed",
            SessionError::Codec(CodecError::InaccessibleChannel {
                channel: 9,
                accessible: vec![0, 1, 2],
            }),
        );
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("channel failed: channel 9"));
    }

    #[test]
    fn permission_denied_bind() {
        let err = transport_error(
            "bind failed",
            TransportError::Bind {
                addr: "0.0.0.0:45454".parse().expect("socket address"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
