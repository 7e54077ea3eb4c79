use hex::FromHexError;
use std::io;

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// A read would consume more bytes than remain in the buffer.
    OutOfBounds { needed: usize, remaining: usize },
    /// The supplied bytes do not fit the transaction grammar.
    MalformedInput(String),
    /// The transaction was fully decoded but bytes remain.
    TrailingBytes(usize),
    /// A finite random source ran out of bytes.
    RandomSourceExhausted,
    /// An argument provided is invalid
    BadArgument(String),
    /// The valid transaction provider failed on every attempt.
    ProviderExhausted { attempts: u32 },
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// Standard library IO error
    IOError(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::OutOfBounds { needed, remaining } => f.write_str(&format!(
                "Out of bounds: needed {} bytes, {} remaining",
                needed, remaining
            )),
            Error::MalformedInput(s) => f.write_str(&format!("Malformed input: {}", s)),
            Error::TrailingBytes(n) => {
                f.write_str(&format!("{} trailing bytes after transaction", n))
            }
            Error::RandomSourceExhausted => f.write_str("Random source exhausted"),
            Error::BadArgument(s) => f.write_str(&format!("Bad argument: {}", s)),
            Error::ProviderExhausted { attempts } => f.write_str(&format!(
                "No valid transaction after {} attempts",
                attempts
            )),
            Error::FromHexError(e) => f.write_str(&format!("Hex decoding error: {}", e)),
            Error::IOError(e) => f.write_str(&format!("IO error: {}", e)),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FromHexError(e) => Some(e),
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IOError(e)
    }
}
