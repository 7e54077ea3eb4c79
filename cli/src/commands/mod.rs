//! The command table. Every command parses its own arguments and implements [Handler].

use clap::{Subcommand, ValueEnum};
use log::debug;
use misfit::{Result, Tx, TxFormat};

mod createtx;
mod decode;
mod selectors;

pub use createtx::CreateTxArgs;
pub use decode::DecodeArgs;
pub use selectors::SelectorsArgs;

/// The capability shared by every command: run with parsed arguments, return what to print.
pub trait Handler {
    fn run(&self) -> Result<String>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Corrupt selected fields of a valid transaction and print the malformed hex.
    Createtx(CreateTxArgs),
    /// Print a transaction's wire fields as JSON.
    Decode(DecodeArgs),
    /// List the field selectors that can be corrupted.
    Selectors(SelectorsArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Createtx(_) => "createtx",
            Command::Decode(_) => "decode",
            Command::Selectors(_) => "selectors",
        }
    }

    pub fn handler(&self) -> &dyn Handler {
        match self {
            Command::Createtx(args) => args,
            Command::Decode(args) => args,
            Command::Selectors(args) => args,
        }
    }
}

/// Wire format choice on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Legacy,
    Segwit,
    /// Segwit if the bytes after the version look like a marker and flag and the whole
    /// transaction decodes as segwit, legacy otherwise.
    Auto,
}

impl FormatArg {
    pub fn resolve(&self, raw: &[u8]) -> TxFormat {
        match self {
            FormatArg::Legacy => TxFormat::Legacy,
            FormatArg::Segwit => TxFormat::Segwit,
            FormatArg::Auto => match TxFormat::detect(raw) {
                TxFormat::Segwit if Tx::decode(raw.to_vec(), TxFormat::Segwit).is_ok() => {
                    TxFormat::Segwit
                }
                TxFormat::Segwit => {
                    debug!("input has a segwit marker but does not decode as segwit");
                    TxFormat::Legacy
                }
                TxFormat::Legacy => TxFormat::Legacy,
            },
        }
    }
}
