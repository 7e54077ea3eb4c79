use crate::bitcoin::{CountByte, Outpoint, Tx};
use crate::mutate::{EntropySource, FieldSelector, MutationConfig, Section};
use crate::Result;
use bytes::Bytes;
use log::{debug, warn};

/// One field that was overwritten.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MutatedField {
    pub field: FieldSelector,
    /// Element index for fields inside a repeated section.
    pub index: Option<usize>,
}

/// The fields a mutation pass overwrote, in wire order.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct MutationReport {
    pub mutated: Vec<MutatedField>,
}

impl MutationReport {
    pub fn is_empty(&self) -> bool {
        self.mutated.is_empty()
    }

    pub fn count(&self, field: FieldSelector) -> usize {
        self.mutated.iter().filter(|m| m.field == field).count()
    }
}

/// Draws replacement bytes and records what was replaced.
struct Scrambler<'s, S: EntropySource + ?Sized> {
    source: &'s mut S,
    report: MutationReport,
}

impl<S: EntropySource + ?Sized> Scrambler<'_, S> {
    fn fill(&mut self, field: FieldSelector, index: Option<usize>, dest: &mut [u8]) -> Result<()> {
        self.source.fill(dest)?;
        match index {
            Some(i) => debug!("corrupted {}[{}], {} bytes", field, i, dest.len()),
            None => debug!("corrupted {}, {} bytes", field, dest.len()),
        }
        self.report.mutated.push(MutatedField { field, index });
        Ok(())
    }

    fn byte(&mut self, field: FieldSelector, index: Option<usize>, dest: &mut u8) -> Result<()> {
        self.fill(field, index, std::slice::from_mut(dest))
    }

    fn bytes(
        &mut self,
        field: FieldSelector,
        index: Option<usize>,
        dest: &mut Bytes,
    ) -> Result<()> {
        let mut replacement = vec![0u8; dest.len()];
        self.fill(field, index, &mut replacement)?;
        *dest = Bytes::from(replacement);
        Ok(())
    }

    fn count(&mut self, field: FieldSelector, dest: &mut CountByte) -> Result<()> {
        let mut value = 0u8;
        self.byte(field, None, &mut value)?;
        *dest = CountByte::pinned(value);
        Ok(())
    }
}

/// Overwrite the fields enabled in `config` with random bytes of the same length.
///
/// Fields are visited in wire order, so the bytes drawn from `source` map onto the transaction
/// in the order they appear in the encoding. Selectors for the repeated sections apply to the
/// first `invalid_*_count` elements only. No element is ever added or removed.
///
/// When `input.previous_output` is enabled it already covers the txid and vout, which are then
/// not drawn a second time. Marker, flag and witness selectors have nothing to act on in a
/// legacy transaction and are skipped with a warning.
pub fn mutate<S: EntropySource + ?Sized>(
    tx: &mut Tx,
    config: &MutationConfig,
    source: &mut S,
) -> Result<MutationReport> {
    use FieldSelector::*;
    let mut s = Scrambler {
        source,
        report: MutationReport::default(),
    };

    if config.version {
        s.fill(Version, None, &mut tx.version)?;
    }
    match tx.segwit.as_mut() {
        Some(flags) => {
            if config.marker {
                s.byte(Marker, None, &mut flags.marker)?;
            }
            if config.flag {
                s.byte(Flag, None, &mut flags.flag)?;
            }
        }
        None => {
            if config.marker || config.flag {
                warn!("legacy transaction has no marker or flag, selectors ignored");
            }
        }
    }

    if config.tx_in_count {
        s.count(TxInCount, &mut tx.tx_in_count)?;
    }
    if config.touches(Section::Inputs) {
        let n = config.eligible(Section::Inputs, tx.inputs.len());
        for (i, input) in tx.inputs.iter_mut().take(n).enumerate() {
            let prev = &mut input.previous_output.raw;
            if config.input_previous_output {
                s.fill(InputPreviousOutput, Some(i), prev)?;
            } else {
                if config.input_txid {
                    s.fill(InputTxid, Some(i), &mut prev[..Outpoint::HASH_SIZE])?;
                }
                if config.input_vout {
                    s.fill(InputVout, Some(i), &mut prev[Outpoint::HASH_SIZE..])?;
                }
            }
            if config.input_script_length {
                s.byte(InputScriptLength, Some(i), &mut input.script_length)?;
            }
            if config.input_signature_script {
                s.bytes(InputSignatureScript, Some(i), &mut input.signature_script)?;
            }
            if config.input_sequence {
                s.fill(InputSequence, Some(i), &mut input.sequence)?;
            }
        }
    }

    if config.tx_out_count {
        s.count(TxOutCount, &mut tx.tx_out_count)?;
    }
    if config.touches(Section::Outputs) {
        let n = config.eligible(Section::Outputs, tx.outputs.len());
        for (i, output) in tx.outputs.iter_mut().take(n).enumerate() {
            if config.output_value {
                s.fill(OutputValue, Some(i), &mut output.value)?;
            }
            if config.output_pk_script_length {
                s.byte(OutputPkScriptLength, Some(i), &mut output.pk_script_length)?;
            }
            if config.output_pk_script {
                s.bytes(OutputPkScript, Some(i), &mut output.pk_script)?;
            }
        }
    }

    if tx.segwit.is_some() {
        if config.witness_count {
            s.count(WitnessCount, &mut tx.witness_count)?;
        }
        if config.touches(Section::Witnesses) {
            let n = config.eligible(Section::Witnesses, tx.witnesses.len());
            for (i, item) in tx.witnesses.iter_mut().take(n).enumerate() {
                if config.witness_size {
                    s.byte(WitnessSize, Some(i), &mut item.size)?;
                }
                if config.witness_item {
                    s.bytes(WitnessItem, Some(i), &mut item.item)?;
                }
            }
        }
    } else if config.witness_count || config.touches(Section::Witnesses) {
        warn!("legacy transaction has no witness section, witness selectors ignored");
    }

    if config.locktime {
        s.fill(Locktime, None, &mut tx.locktime)?;
    }
    Ok(s.report)
}
