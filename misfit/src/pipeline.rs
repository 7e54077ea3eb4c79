//! Decode, mutate and encode in one call.

use crate::bitcoin::{Tx, TxFormat};
use crate::mutate::{mutate, EntropySource, MutationConfig, MutationReport};
use crate::Result;
use bytes::Bytes;
use log::debug;

/// The malformed transaction and a record of what was corrupted.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub raw: Bytes,
    /// The mutated record that `raw` encodes. It may no longer decode from `raw`.
    pub tx: Tx,
    pub report: MutationReport,
}

/// Decode `valid_raw_tx`, corrupt the fields selected by `config` and encode the result.
///
/// The first error from either stage is returned and no output is produced. Decoding is strict,
/// so input that does not parse exactly in `format` is always an error.
pub fn run_with_report<S: EntropySource + ?Sized>(
    valid_raw_tx: impl Into<Bytes>,
    format: TxFormat,
    config: &MutationConfig,
    source: &mut S,
) -> Result<Outcome> {
    let mut tx = Tx::decode(valid_raw_tx, format)?;
    let report = mutate(&mut tx, config, source)?;
    let raw = tx.encode()?;
    debug!(
        "malformed {} transaction: {} bytes, {} fields corrupted",
        format,
        raw.len(),
        report.mutated.len()
    );
    Ok(Outcome { raw, tx, report })
}

/// Decode, mutate and encode, returning only the malformed bytes.
pub fn run<S: EntropySource + ?Sized>(
    valid_raw_tx: impl Into<Bytes>,
    format: TxFormat,
    config: &MutationConfig,
    source: &mut S,
) -> Result<Bytes> {
    Ok(run_with_report(valid_raw_tx, format, config, source)?.raw)
}

/// As [run], with hex in and hex out.
pub fn run_hex<S: EntropySource + ?Sized>(
    valid_tx_hex: &str,
    format: TxFormat,
    config: &MutationConfig,
    source: &mut S,
) -> Result<String> {
    let raw = hex::decode(valid_tx_hex.trim())?;
    Ok(hex::encode(run(raw, format, config, source)?))
}
