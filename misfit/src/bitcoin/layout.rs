use crate::bitcoin::{Outpoint, Tx};
use crate::mutate::FieldSelector;
use std::ops::Range;

/// The position of one field in the encoded transaction.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FieldSpan {
    pub field: FieldSelector,
    /// Element index for fields inside the inputs, outputs or witness section.
    pub index: Option<usize>,
    pub range: Range<usize>,
}

struct LayoutBuilder {
    offset: usize,
    spans: Vec<FieldSpan>,
}

impl LayoutBuilder {
    fn push(&mut self, field: FieldSelector, index: Option<usize>, width: usize) {
        let start = self.offset;
        self.offset += width;
        self.spans.push(FieldSpan {
            field,
            index,
            range: start..self.offset,
        });
    }
}

impl Tx {
    /// List every wire field of the encoding with the byte range it occupies, in wire order.
    ///
    /// Positions follow the bytes actually emitted, so a length byte that disagrees with its
    /// payload does not shift anything. The previous output is reported as one field, see
    /// [Tx::span_of] for its txid and vout parts.
    pub fn layout(&self) -> Vec<FieldSpan> {
        use FieldSelector::*;
        let mut b = LayoutBuilder {
            offset: 0,
            spans: Vec::new(),
        };
        b.push(Version, None, 4);
        if self.segwit.is_some() {
            b.push(Marker, None, 1);
            b.push(Flag, None, 1);
        }
        b.push(TxInCount, None, 1);
        for (i, input) in self.inputs.iter().enumerate() {
            b.push(InputPreviousOutput, Some(i), Outpoint::SIZE as usize);
            b.push(InputScriptLength, Some(i), 1);
            b.push(InputSignatureScript, Some(i), input.signature_script.len());
            b.push(InputSequence, Some(i), 4);
        }
        b.push(TxOutCount, None, 1);
        for (i, output) in self.outputs.iter().enumerate() {
            b.push(OutputValue, Some(i), 8);
            b.push(OutputPkScriptLength, Some(i), 1);
            b.push(OutputPkScript, Some(i), output.pk_script.len());
        }
        if self.segwit.is_some() {
            b.push(WitnessCount, None, 1);
            for (i, item) in self.witnesses.iter().enumerate() {
                b.push(WitnessSize, Some(i), 1);
                b.push(WitnessItem, Some(i), item.item.len());
            }
        }
        b.push(Locktime, None, 4);
        debug_assert_eq!(b.offset as u64, self.encoded_size());
        b.spans
    }

    /// The byte range of a single field, or `None` if the transaction has no such field.
    pub fn span_of(&self, field: FieldSelector, index: Option<usize>) -> Option<Range<usize>> {
        let (lookup, sub) = match field {
            FieldSelector::InputTxid => (
                FieldSelector::InputPreviousOutput,
                Some(0..Outpoint::HASH_SIZE),
            ),
            FieldSelector::InputVout => (
                FieldSelector::InputPreviousOutput,
                Some(Outpoint::HASH_SIZE..Outpoint::SIZE as usize),
            ),
            _ => (field, None),
        };
        let span = self
            .layout()
            .into_iter()
            .find(|s| s.field == lookup && s.index == index)?;
        Some(match sub {
            Some(sub) => span.range.start + sub.start..span.range.start + sub.end,
            None => span.range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcoin::TxFormat;
    use crate::FieldSelector::*;

    const TX: &str = concat!(
        "01000000",
        "01",
        "1111111111111111111111111111111111111111111111111111111111111111",
        "02000000",
        "02",
        "5151",
        "ffffffff",
        "01",
        "0100000000000000",
        "00",
        "00000000",
    );

    #[test]
    fn legacy_layout() {
        let tx = Tx::from_hex(TX, TxFormat::Legacy).unwrap();
        let layout = tx.layout();
        let fields: Vec<_> = layout.iter().map(|s| (s.field, s.range.clone())).collect();
        assert_eq!(
            fields,
            vec![
                (Version, 0..4),
                (TxInCount, 4..5),
                (InputPreviousOutput, 5..41),
                (InputScriptLength, 41..42),
                (InputSignatureScript, 42..44),
                (InputSequence, 44..48),
                (TxOutCount, 48..49),
                (OutputValue, 49..57),
                (OutputPkScriptLength, 57..58),
                (OutputPkScript, 58..58),
                (Locktime, 58..62),
            ]
        );
        assert_eq!(layout.last().unwrap().range.end, TX.len() / 2);
    }

    #[test]
    fn sub_spans() {
        let tx = Tx::from_hex(TX, TxFormat::Legacy).unwrap();
        assert_eq!(tx.span_of(InputTxid, Some(0)), Some(5..37));
        assert_eq!(tx.span_of(InputVout, Some(0)), Some(37..41));
        assert_eq!(tx.span_of(Locktime, None), Some(58..62));
        assert_eq!(tx.span_of(InputSequence, Some(1)), None);
        assert_eq!(tx.span_of(Marker, None), None);
    }

    #[test]
    fn segwit_layout() {
        let tx = Tx::new(TxFormat::Segwit, 2, vec![], vec![], vec![], 0).unwrap();
        let fields: Vec<_> = tx.layout().into_iter().map(|s| s.field).collect();
        assert_eq!(
            fields,
            vec![Version, Marker, Flag, TxInCount, TxOutCount, WitnessCount, Locktime]
        );
        assert_eq!(tx.span_of(WitnessCount, None), Some(8..9));
    }
}
