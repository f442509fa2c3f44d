// Error handling for the video bridge

use std::fmt;

/// Video bridge error types
///
/// Every variant carries a stable short code for the command response
/// channel; the human-readable message comes from `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// No rendering host is attached
    NoHost,

    /// Source could not be classified into a playable container kind
    UnsupportedContainer(String),

    /// Handle does not refer to a live player instance
    UnknownHandle(i64),

    /// Error reported by the media engine
    Engine(String),

    /// Malformed or missing command argument
    InvalidArgument(String),

    /// Unrecognized command name
    Unimplemented(String),

    /// IO error
    Io(String),
}

impl VideoError {
    /// Stable short code surfaced alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            VideoError::NoHost => "NoHost",
            VideoError::UnsupportedContainer(_) => "UnsupportedContainerKind",
            VideoError::UnknownHandle(_) => "UnknownHandle",
            VideoError::Engine(_) => "VideoError",
            VideoError::InvalidArgument(_) => "InvalidArgument",
            VideoError::Unimplemented(_) => "Unimplemented",
            VideoError::Io(_) => "IoError",
        }
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VideoError::NoHost => {
                write!(f, "No rendering host: video playback requires an active host")
            }
            VideoError::UnsupportedContainer(msg) => write!(f, "Unsupported container: {}", msg),
            VideoError::UnknownHandle(handle) => {
                write!(f, "No video player associated with handle {}", handle)
            }
            VideoError::Engine(msg) => write!(f, "Video player had error: {}", msg),
            VideoError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            VideoError::Unimplemented(method) => write!(f, "Unimplemented command: {}", method),
            VideoError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for VideoError {}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, VideoError>;

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(VideoError::NoHost.code(), "NoHost");
        assert_eq!(
            VideoError::UnsupportedContainer("x".into()).code(),
            "UnsupportedContainerKind"
        );
        assert_eq!(VideoError::UnknownHandle(7).code(), "UnknownHandle");
        assert_eq!(VideoError::Engine("x".into()).code(), "VideoError");
    }

    #[test]
    fn unknown_handle_message_names_the_handle() {
        let msg = VideoError::UnknownHandle(42).to_string();
        assert!(msg.contains("42"));
    }
}
