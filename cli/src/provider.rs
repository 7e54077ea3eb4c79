//! Sources of the valid transaction that gets corrupted.
//!
//! Building and signing a fresh transaction against a node is outside this tool, so a provider
//! only has to hand over hex. Providers may fail transiently, [acquire] retries a bounded
//! number of times and then gives up.

use crate::commands::FormatArg;
use log::{debug, warn};
use misfit::{Error, Result, TxFormat};
use std::io::Read;
use std::path::PathBuf;

/// Supplies a valid transaction as hex.
pub trait TxProvider {
    /// Short description for log messages.
    fn describe(&self) -> String;

    fn provide(&mut self) -> Result<String>;
}

/// Hex given directly on the command line.
pub struct LiteralProvider {
    hex: String,
}

impl TxProvider for LiteralProvider {
    fn describe(&self) -> String {
        "command line".to_string()
    }

    fn provide(&mut self) -> Result<String> {
        Ok(self.hex.clone())
    }
}

/// Hex read from a file.
pub struct FileProvider {
    path: PathBuf,
}

impl TxProvider for FileProvider {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn provide(&mut self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Hex read from standard input.
pub struct StdinProvider;

impl TxProvider for StdinProvider {
    fn describe(&self) -> String {
        "stdin".to_string()
    }

    fn provide(&mut self) -> Result<String> {
        let mut hex = String::new();
        std::io::stdin().read_to_string(&mut hex)?;
        Ok(hex)
    }
}

/// Fetch a transaction, retrying up to `max_attempts` times in total.
///
/// An attempt fails if the provider errors or returns something that is not non-empty hex.
pub fn acquire(provider: &mut dyn TxProvider, max_attempts: u32) -> Result<Vec<u8>> {
    for attempt in 1..=max_attempts {
        match provider.provide().and_then(|hex| parse_hex(&hex)) {
            Ok(raw) => {
                debug!("got {} byte transaction from {}", raw.len(), provider.describe());
                return Ok(raw);
            }
            Err(e) => warn!(
                "attempt {} of {} to read a transaction from {} failed: {}",
                attempt,
                max_attempts,
                provider.describe(),
                e
            ),
        }
    }
    Err(Error::ProviderExhausted {
        attempts: max_attempts,
    })
}

fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    let raw = hex::decode(hex.trim())?;
    if raw.is_empty() {
        return Err(Error::MalformedInput("empty transaction".to_string()));
    }
    Ok(raw)
}

/// Arguments that pick the input transaction, shared by the commands that read one.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Valid raw transaction in hex. Read from --file or stdin when absent.
    pub raw: Option<String>,
    /// Read the transaction hex from a file.
    #[arg(long, conflicts_with = "raw")]
    pub file: Option<PathBuf>,
    /// Wire format of the input transaction. `auto` picks segwit only when the input has a
    /// marker and flag and decodes as segwit, and falls back to legacy otherwise.
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    pub format: FormatArg,
    /// Attempts at reading the input before giving up.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,
}

impl InputArgs {
    pub fn provider(&self) -> Box<dyn TxProvider> {
        match (&self.raw, &self.file) {
            (Some(hex), _) => Box::new(LiteralProvider { hex: hex.clone() }),
            (None, Some(path)) => Box::new(FileProvider { path: path.clone() }),
            (None, None) => Box::new(StdinProvider),
        }
    }

    /// Read the input and settle its wire format.
    pub fn load(&self) -> Result<(Vec<u8>, TxFormat)> {
        let raw = acquire(self.provider().as_mut(), self.attempts)?;
        let format = self.format.resolve(&raw);
        debug!("decoding input as {}", format);
        Ok((raw, format))
    }
}
