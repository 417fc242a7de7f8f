use std::io;
use thiserror::Error;

/// Main error type for the BMX codec library.
#[derive(Error, Debug)]
pub enum BmxError {
    /// An I/O error occurred while opening, reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The external image library failed to decode or encode a picture
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// The input ends before a complete header could be read
    #[error("Truncated header: needed {needed} bytes, found {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
    /// A header declares more payload than the file holds
    #[error("Payload overflow: header declares {declared} bytes, only {available} available")]
    PayloadOverflow { declared: usize, available: usize },
    /// A format or compression flag byte has an unknown value
    #[error("Unknown format flag: {0:#04x}")]
    UnknownFormatFlag(u8),
    /// Header dimensions describe a raster too large to allocate
    #[error("Bitmap dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },
    /// A zero-length file was handed to a decoder
    #[error("Empty input")]
    EmptyInput,
    /// The compressed stream is corrupt or the decoder was misused
    #[error("Decode protocol error: {0}")]
    DecodeProtocol(String),
    /// The stream codec's input buffer is full; poll before sinking again
    #[error("Sink rejected: internal buffer is full")]
    SinkRejected,
    /// An invalid argument was provided
    #[error("Invalid argument: {0}")]
    InvalidArg(String),
    /// An invalid operation was attempted
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// A specialized `Result` type for BMX codec operations.
pub type Result<T> = std::result::Result<T, BmxError>;
