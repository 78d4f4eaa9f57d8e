//! # LZ77 with a sliding window
//!
//! This crate compresses byte streams by replacing repeated substrings with
//! back-references into a fixed size dictionary window.  Each token is a
//! triple `(offset,length,next)` written as three little endian `i16`.
//! There is no entropy coding stage and no header.
//!
//! * `lz77` contains the encoder, the decoder, and the stream level functions
//! * `driver` runs a file through encoding and decoding in one pass
//!
//! ```
//! # fn main() -> Result<(),lz77kit::Error> {
//! let opt = lz77kit::lz77::STD_OPTIONS;
//! let compressed = lz77kit::lz77::compress_slice(b"abcabcabc",&opt)?;
//! let expanded = lz77kit::lz77::expand_slice(&compressed,&opt)?;
//! assert_eq!(expanded,b"abcabcabc".to_vec());
//! # Ok(())
//! # }
//! ```

mod tools;
pub mod lz77;
pub mod driver;

/// Errors in compressing or expanding
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("unable to open {path}: {source}")]
    StreamOpen {
        path: String,
        source: std::io::Error
    },
    #[error("read failed: {0}")]
    StreamRead(#[source] std::io::Error),
    #[error("write failed: {0}")]
    StreamWrite(#[source] std::io::Error),
    #[error("token stream ends in the middle of a triple")]
    DecodeTruncatedStream,
    #[error("token field out of range")]
    TokenOutOfRange,
    #[error("window sizes are not supported")]
    BadWindowSize,
    #[error("window shifted past the end of data")]
    ShiftPastEnd,
    #[error("run aborted, compression did not finish")]
    RunAborted
}
