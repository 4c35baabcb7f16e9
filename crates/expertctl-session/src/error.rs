use std::time::Duration;

/// Errors that can occur in controller operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] expertctl_transport::TransportError),

    /// The command could not be encoded.
    #[error(transparent)]
    Codec(#[from] expertctl_codec::CodecError),

    /// No amplifier broadcast was heard while discovering.
    #[error("no Devialet Expert amplifier found on the network after {timeout:?}")]
    Discovery { timeout: Duration },

    /// A toggle needs a status field the amplifier did not report.
    #[error("amplifier did not report its {0} state")]
    UnknownState(&'static str),
}

pub type Result<T> = std::result::Result<T, SessionError>;
