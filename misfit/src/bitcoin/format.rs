use crate::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The wire format a transaction is decoded with.
///
/// Segwit encoding is not self-describing, so the caller must say which format the bytes are in.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum TxFormat {
    /// version, inputs, outputs, locktime.
    Legacy,
    /// version, marker, flag, inputs, outputs, witness items, locktime.
    Segwit,
}

impl TxFormat {
    /// Guess the format from the two bytes after the version: a `0x00` marker followed by a
    /// non-zero flag is taken as segwit.
    ///
    /// This is a caller policy and never used by decoding itself. A legacy transaction with no
    /// inputs has a zero input count and a zero output count there, and is detected as legacy.
    pub fn detect(raw: &[u8]) -> TxFormat {
        match (raw.get(4), raw.get(5)) {
            (Some(0x00), Some(flag)) if *flag != 0x00 => TxFormat::Segwit,
            _ => TxFormat::Legacy,
        }
    }

    pub fn has_witness(&self) -> bool {
        *self == TxFormat::Segwit
    }
}

impl Display for TxFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TxFormat::Legacy => f.write_str("legacy"),
            TxFormat::Segwit => f.write_str("segwit"),
        }
    }
}

impl FromStr for TxFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" | "non-segwit" => Ok(TxFormat::Legacy),
            "segwit" | "witness" => Ok(TxFormat::Segwit),
            _ => Err(Error::BadArgument(format!("unknown transaction format: {}", s))),
        }
    }
}
