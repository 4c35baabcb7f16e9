/// Errors that can occur while encoding commands.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The channel index has no known command encoding.
    #[error("channel {channel} is not accessible via network commands (accessible: {accessible:?})")]
    InaccessibleChannel { channel: u8, accessible: Vec<u8> },
}

pub type Result<T> = std::result::Result<T, CodecError>;
