use crate::bitcoin::{ByteCursor, CountByte, Encodable, TxFormat};
use crate::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use log::trace;
use serde::{Deserialize, Serialize};

/// A Bitcoin transaction as it appears on the wire.
///
/// Every field is kept as the raw bytes that were read, little-endian integers included, so
/// that a corrupted field of any bit pattern can be carried through and re-encoded unchanged.
/// Encoding a decoded transaction reproduces the decoded bytes exactly.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct Tx {
    /// transaction version, 4 bytes
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub version: [u8; 4],
    /// segwit marker and flag, present only in the segwit format
    pub segwit: Option<SegwitFlags>,
    pub tx_in_count: CountByte,
    pub inputs: Vec<TxInput>,
    pub tx_out_count: CountByte,
    pub outputs: Vec<TxOutput>,
    /// only encoded in the segwit format
    pub witness_count: CountByte,
    pub witnesses: Vec<WitnessItem>,
    /// lock time, 4 bytes
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub locktime: [u8; 4],
}

impl Tx {
    /// Build a transaction, deriving all counts from the sequences supplied.
    ///
    /// Witness items are only allowed in the segwit format.
    pub fn new(
        format: TxFormat,
        version: u32,
        inputs: Vec<TxInput>,
        outputs: Vec<TxOutput>,
        witnesses: Vec<WitnessItem>,
        locktime: u32,
    ) -> Result<Tx> {
        if !format.has_witness() && !witnesses.is_empty() {
            return Err(Error::BadArgument(
                "witness items require the segwit format".to_string(),
            ));
        }
        Ok(Tx {
            version: version.to_le_bytes(),
            segwit: match format {
                TxFormat::Segwit => Some(SegwitFlags::default()),
                TxFormat::Legacy => None,
            },
            tx_in_count: CountByte::for_len(inputs.len())?,
            inputs,
            tx_out_count: CountByte::for_len(outputs.len())?,
            outputs,
            witness_count: CountByte::for_len(witnesses.len())?,
            witnesses,
            locktime: locktime.to_le_bytes(),
        })
    }

    /// Decode a complete transaction. Bytes left over after the locktime are an error.
    pub fn decode(raw: impl Into<Bytes>, format: TxFormat) -> Result<Tx> {
        let mut cursor = ByteCursor::new(raw);
        let tx = Tx::read(&mut cursor, format)?;
        if !cursor.is_exhausted() {
            return Err(Error::TrailingBytes(cursor.remaining()));
        }
        Ok(tx)
    }

    /// Decode a complete transaction from hex. Surrounding whitespace is ignored.
    pub fn from_hex(hex: &str, format: TxFormat) -> Result<Tx> {
        let raw = hex::decode(hex.trim())?;
        Tx::decode(raw, format)
    }

    /// Read a transaction from the cursor, leaving any following bytes unread.
    pub fn read(cursor: &mut ByteCursor, format: TxFormat) -> Result<Tx> {
        let version = cursor.take_array::<4>()?;
        let segwit = match format {
            TxFormat::Segwit => Some(SegwitFlags::from_binary(cursor)?),
            TxFormat::Legacy => None,
        };
        let tx_in_count = cursor.take_u8()?;
        let mut inputs = Vec::with_capacity(tx_in_count as usize);
        for _ in 0..tx_in_count {
            inputs.push(TxInput::from_binary(cursor)?);
        }
        let tx_out_count = cursor.take_u8()?;
        let mut outputs = Vec::with_capacity(tx_out_count as usize);
        for _ in 0..tx_out_count {
            outputs.push(TxOutput::from_binary(cursor)?);
        }
        let mut witness_count = 0;
        let mut witnesses = Vec::new();
        if format.has_witness() {
            witness_count = cursor.take_u8()?;
            witnesses.reserve(witness_count as usize);
            for _ in 0..witness_count {
                witnesses.push(WitnessItem::from_binary(cursor)?);
            }
        }
        let locktime = cursor.take_array::<4>()?;
        trace!(
            "decoded {} tx: {} inputs, {} outputs, {} witness items, {} bytes",
            format,
            tx_in_count,
            tx_out_count,
            witness_count,
            cursor.position()
        );
        Ok(Tx {
            version,
            segwit,
            tx_in_count: CountByte::derived(tx_in_count),
            inputs,
            tx_out_count: CountByte::derived(tx_out_count),
            outputs,
            witness_count: CountByte::derived(witness_count),
            witnesses,
            locktime,
        })
    }

    pub fn format(&self) -> TxFormat {
        match self.segwit {
            Some(_) => TxFormat::Segwit,
            None => TxFormat::Legacy,
        }
    }

    /// Encode the transaction to a new buffer.
    pub fn encode(&self) -> Result<Bytes> {
        let mut buffer = BytesMut::with_capacity(self.encoded_size() as usize);
        self.to_binary(&mut buffer)?;
        Ok(buffer.freeze())
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode(self.encode()?))
    }

    pub fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_slice(&self.version);
        if let Some(flags) = &self.segwit {
            flags.to_binary(buffer)?;
        }
        buffer.put_u8(self.tx_in_count.resolve(self.inputs.len())?);
        for input in &self.inputs {
            input.to_binary(buffer)?;
        }
        buffer.put_u8(self.tx_out_count.resolve(self.outputs.len())?);
        for output in &self.outputs {
            output.to_binary(buffer)?;
        }
        if self.segwit.is_some() {
            buffer.put_u8(self.witness_count.resolve(self.witnesses.len())?);
            for item in &self.witnesses {
                item.to_binary(buffer)?;
            }
        }
        buffer.put_slice(&self.locktime);
        Ok(())
    }

    pub fn encoded_size(&self) -> u64 {
        // version, two counts, locktime
        let mut size = 10;
        if let Some(flags) = &self.segwit {
            size += flags.encoded_size() + 1;
            size += self.witnesses.iter().map(|w| w.encoded_size()).sum::<u64>();
        }
        size += self.inputs.iter().map(|i| i.encoded_size()).sum::<u64>();
        size += self.outputs.iter().map(|o| o.encoded_size()).sum::<u64>();
        size
    }
}

/// The two bytes that follow the version in the segwit format.
///
/// Whatever bytes were read are kept, valid or not.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SegwitFlags {
    pub marker: u8,
    pub flag: u8,
}

impl Default for SegwitFlags {
    fn default() -> Self {
        SegwitFlags {
            marker: 0x00,
            flag: 0x01,
        }
    }
}

impl Encodable for SegwitFlags {
    fn from_binary(cursor: &mut ByteCursor) -> Result<Self> {
        let marker = cursor.take_u8()?;
        let flag = cursor.take_u8()?;
        Ok(SegwitFlags { marker, flag })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_u8(self.marker);
        buffer.put_u8(self.flag);
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        2
    }
}

/// An Outpoint is a reference to a specific output of a specific transaction.
///
/// The 32 byte hash and 4 byte index are kept together as one opaque blob.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Outpoint {
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub raw: [u8; 36],
}

impl Outpoint {
    pub const SIZE: u64 = 36;
    /// Width of the transaction hash at the start of the outpoint.
    pub const HASH_SIZE: usize = 32;

    pub fn new(tx_hash: [u8; 32], index: u32) -> Outpoint {
        let mut raw = [0u8; 36];
        raw[..Self::HASH_SIZE].copy_from_slice(&tx_hash);
        raw[Self::HASH_SIZE..].copy_from_slice(&index.to_le_bytes());
        Outpoint { raw }
    }

    /// The referenced transaction hash, in wire byte order.
    pub fn tx_hash(&self) -> &[u8] {
        &self.raw[..Self::HASH_SIZE]
    }

    pub fn index(&self) -> u32 {
        let mut index = [0u8; 4];
        index.copy_from_slice(&self.raw[Self::HASH_SIZE..]);
        u32::from_le_bytes(index)
    }
}

impl Encodable for Outpoint {
    fn from_binary(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Outpoint {
            raw: cursor.take_array::<36>()?,
        })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_slice(&self.raw);
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        Self::SIZE
    }
}

/// A TxInput is an input to a transaction.
///
/// The script length is stored separately from the script so that it can disagree with it.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct TxInput {
    pub previous_output: Outpoint,
    pub script_length: u8,
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub signature_script: Bytes,
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub sequence: [u8; 4],
}

impl TxInput {
    pub fn new(
        previous_output: Outpoint,
        signature_script: Bytes,
        sequence: u32,
    ) -> Result<TxInput> {
        Ok(TxInput {
            previous_output,
            script_length: length_byte(&signature_script)?,
            signature_script,
            sequence: sequence.to_le_bytes(),
        })
    }
}

impl Encodable for TxInput {
    fn from_binary(cursor: &mut ByteCursor) -> Result<Self> {
        let previous_output = Outpoint::from_binary(cursor)?;
        let signature_script = cursor.take_length_prefixed()?;
        let sequence = cursor.take_array::<4>()?;
        Ok(TxInput {
            previous_output,
            script_length: signature_script.len() as u8,
            signature_script,
            sequence,
        })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        self.previous_output.to_binary(buffer)?;
        buffer.put_u8(self.script_length);
        buffer.put_slice(&self.signature_script);
        buffer.put_slice(&self.sequence);
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        self.previous_output.encoded_size() + 1 + self.signature_script.len() as u64 + 4
    }
}

/// A TxOutput is an output from a transaction.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct TxOutput {
    /// value in satoshis, 8 bytes little-endian
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub value: [u8; 8],
    pub pk_script_length: u8,
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub pk_script: Bytes,
}

impl TxOutput {
    pub fn new(value: u64, pk_script: Bytes) -> Result<TxOutput> {
        Ok(TxOutput {
            value: value.to_le_bytes(),
            pk_script_length: length_byte(&pk_script)?,
            pk_script,
        })
    }
}

impl Encodable for TxOutput {
    fn from_binary(cursor: &mut ByteCursor) -> Result<Self> {
        let value = cursor.take_array::<8>()?;
        let pk_script = cursor.take_length_prefixed()?;
        Ok(TxOutput {
            value,
            pk_script_length: pk_script.len() as u8,
            pk_script,
        })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_slice(&self.value);
        buffer.put_u8(self.pk_script_length);
        buffer.put_slice(&self.pk_script);
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        8 + 1 + self.pk_script.len() as u64
    }
}

/// One length-prefixed item of the witness section.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct WitnessItem {
    pub size: u8,
    #[serde(with = "crate::bitcoin::serde_hex")]
    pub item: Bytes,
}

impl WitnessItem {
    pub fn new(item: Bytes) -> Result<WitnessItem> {
        Ok(WitnessItem {
            size: length_byte(&item)?,
            item,
        })
    }
}

impl Encodable for WitnessItem {
    fn from_binary(cursor: &mut ByteCursor) -> Result<Self> {
        let item = cursor.take_length_prefixed()?;
        Ok(WitnessItem {
            size: item.len() as u8,
            item,
        })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_u8(self.size);
        buffer.put_slice(&self.item);
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        1 + self.item.len() as u64
    }
}

fn length_byte(data: &[u8]) -> Result<u8> {
    u8::try_from(data.len()).map_err(|_| {
        Error::MalformedInput(format!(
            "{} bytes is too long for a single byte length prefix",
            data.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// A mainnet p2pkh transaction with one input and two outputs.
    const TX1: &str = "01000000018a052edc7ae2136bfc0a860cdc91185ab0d7329107802f0a9c1cd0026c815f75010000006b483045022100e587ef1b4497a6694cad646cab468b6ece2fa98c7f49f9488611ca34eecebd1002205c4ea9066484bd1bffb7fdd7d84b5ae0ee6b7cdc20a8a513e41e420e0633b98841210262142850483b6728b8ecd299e4d0c8cf30ea0636f66205166814e52d73b64b4bffffffff0200000000000000000a006a075354554b2e434fb8ce3f01000000001976a91454cba8da8701174e34aac2bb31d42a88e2c302d088ac00000000";

    /// A segwit transaction with a two item witness section.
    const SEGWIT_TX: &str = concat!(
        "02000000",
        "0001",
        "01",
        "a1075db55d416d3ca199f55b6084e2115b9345e16c5cf302fc80e9d5fbf5d48d",
        "00000000",
        "00",
        "fdffffff",
        "01",
        "00f2052a01000000",
        "16",
        "0014c5dae84e4fc7e812f67c72a1109e317bb3a6e7f7",
        "02",
        "03",
        "aabbcc",
        "21",
        "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc",
        "65000000",
    );

    #[test]
    fn tx_read() {
        let raw = hex::decode(TX1).unwrap();
        let tx = Tx::decode(raw.clone(), TxFormat::Legacy).unwrap();
        assert_eq!(tx.version, [1, 0, 0, 0]);
        assert!(tx.segwit.is_none());
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.tx_in_count.value(), 1);
        assert_eq!(tx.outputs.len(), 2);
        assert!(tx.witnesses.is_empty());
        assert_eq!(tx.encoded_size(), raw.len() as u64);
        let input = &tx.inputs[0];
        assert_eq!(
            input.previous_output.tx_hash(),
            &hex!("8a052edc7ae2136bfc0a860cdc91185ab0d7329107802f0a9c1cd0026c815f75")
        );
        assert_eq!(input.previous_output.index(), 1);
        assert_eq!(input.script_length, 0x6b);
        assert_eq!(input.signature_script.len(), 0x6b);
        assert_eq!(input.sequence, [0xff; 4]);
        assert_eq!(tx.outputs[1].value, hex!("b8ce3f0100000000"));
        assert_eq!(tx.outputs[1].pk_script_length, 0x19);
        assert_eq!(tx.locktime, [0; 4]);
    }

    #[test]
    fn round_trip() {
        let tx = Tx::from_hex(TX1, TxFormat::Legacy).unwrap();
        assert_eq!(tx.to_hex().unwrap(), TX1);
        let tx = Tx::from_hex(SEGWIT_TX, TxFormat::Segwit).unwrap();
        assert_eq!(tx.to_hex().unwrap(), SEGWIT_TX);
    }

    #[test]
    fn segwit_read() {
        let tx = Tx::from_hex(SEGWIT_TX, TxFormat::Segwit).unwrap();
        assert_eq!(tx.format(), TxFormat::Segwit);
        assert_eq!(tx.segwit, Some(SegwitFlags::default()));
        assert_eq!(tx.witnesses.len(), 2);
        assert_eq!(tx.witnesses[0].size, 3);
        assert_eq!(tx.witnesses[0].item.as_ref(), &hex!("aabbcc"));
        assert_eq!(tx.witnesses[1].size, 0x21);
        assert_eq!(tx.locktime, hex!("65000000"));
        assert_eq!(tx.encoded_size(), (SEGWIT_TX.len() / 2) as u64);
    }

    #[test]
    fn odd_flags_preserved() {
        let mut raw = hex::decode(SEGWIT_TX).unwrap();
        raw[4] = 0x07;
        raw[5] = 0xee;
        let tx = Tx::decode(raw.clone(), TxFormat::Segwit).unwrap();
        assert_eq!(tx.segwit, Some(SegwitFlags { marker: 0x07, flag: 0xee }));
        assert_eq!(tx.encode().unwrap().as_ref(), &raw[..]);
    }

    /// If the binary is incomplete, we should get an error
    #[test]
    fn read_short() {
        let raw = hex::decode(TX1).unwrap();
        assert!(matches!(
            Tx::decode(raw[..200].to_vec(), TxFormat::Legacy),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            Tx::decode(Vec::new(), TxFormat::Legacy),
            Err(Error::OutOfBounds {
                needed: 4,
                remaining: 0
            })
        ));
    }

    /// If we supply too many bytes then decoding must fail, reading leaves them in the cursor.
    #[test]
    fn tx_long() {
        let mut raw = hex::decode(TX1).unwrap();
        let len = raw.len();
        raw.extend_from_slice(&[0u8; 100]);
        assert!(matches!(
            Tx::decode(raw.clone(), TxFormat::Legacy),
            Err(Error::TrailingBytes(100))
        ));
        let mut cursor = ByteCursor::new(raw);
        let tx = Tx::read(&mut cursor, TxFormat::Legacy).unwrap();
        assert_eq!(cursor.position(), len);
        assert_eq!(tx.encoded_size(), len as u64);
    }

    #[test]
    fn wrong_format() {
        // a segwit transaction read as legacy stops at the zero marker as the input count
        assert!(Tx::from_hex(SEGWIT_TX, TxFormat::Legacy).is_err());
        assert!(Tx::from_hex(TX1, TxFormat::Segwit).is_err());
    }

    #[test]
    fn empty_sections() {
        let tx = Tx::new(TxFormat::Legacy, 1, vec![], vec![], vec![], 0).unwrap();
        assert_eq!(tx.encode().unwrap().as_ref(), &hex!("01000000000000000000"));
        let decoded = Tx::from_hex("01000000000000000000", TxFormat::Legacy).unwrap();
        assert_eq!(decoded, tx);

        let tx = Tx::new(TxFormat::Segwit, 2, vec![], vec![], vec![], 0).unwrap();
        let raw = tx.encode().unwrap();
        assert_eq!(raw.as_ref(), &hex!("02000000000100000000000000"));
        assert_eq!(Tx::decode(raw, TxFormat::Segwit).unwrap(), tx);
    }

    #[test]
    fn build() {
        let input = TxInput::new(
            Outpoint::new([0x11; 32], 3),
            Bytes::from_static(&[0x51]),
            0xfffffffe,
        )
        .unwrap();
        let output = TxOutput::new(5_000, Bytes::new()).unwrap();
        let witness = WitnessItem::new(Bytes::from_static(&[1, 2])).unwrap();
        let tx = Tx::new(TxFormat::Segwit, 2, vec![input], vec![output], vec![witness], 7).unwrap();
        let decoded = Tx::decode(tx.encode().unwrap(), TxFormat::Segwit).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.inputs[0].previous_output.index(), 3);
        assert_eq!(decoded.inputs[0].sequence, hex!("feffffff"));
        assert_eq!(decoded.outputs[0].value, hex!("8813000000000000"));
        assert_eq!(decoded.locktime, hex!("07000000"));

        assert!(Tx::new(
            TxFormat::Legacy,
            1,
            vec![],
            vec![],
            vec![WitnessItem::new(Bytes::new()).unwrap()],
            0
        )
        .is_err());
        assert!(WitnessItem::new(Bytes::from(vec![0u8; 256])).is_err());
    }

    #[test]
    fn pinned_count_emitted_verbatim() {
        let mut tx = Tx::from_hex(TX1, TxFormat::Legacy).unwrap();
        tx.tx_out_count = CountByte::pinned(9);
        let raw = tx.encode().unwrap();
        let original = hex::decode(TX1).unwrap();
        // out count sits after version, in count and the single input
        let pos = 4 + 1 + tx.inputs[0].encoded_size() as usize;
        assert_eq!(raw[pos], 9);
        assert_eq!(original[pos], 2);
        assert_eq!(raw.len(), original.len());
        assert_eq!(&raw[..pos], &original[..pos]);
        assert_eq!(&raw[pos + 1..], &original[pos + 1..]);
    }

    #[test]
    fn mismatched_length_emitted_verbatim() {
        let mut tx = Tx::from_hex(SEGWIT_TX, TxFormat::Segwit).unwrap();
        tx.witnesses[0].size = 0xff;
        let raw = tx.encode().unwrap();
        assert_eq!(raw.len(), SEGWIT_TX.len() / 2);
        // the stored size no longer matches, so decoding runs off the end
        assert!(Tx::decode(raw, TxFormat::Segwit).is_err());
    }

    #[test]
    fn serde_json_hex_fields() {
        let tx = Tx::from_hex(SEGWIT_TX, TxFormat::Segwit).unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["version"], "02000000");
        assert_eq!(json["locktime"], "65000000");
        assert_eq!(json["witnesses"][0]["item"], "aabbcc");
        assert_eq!(json["outputs"][0]["value"], "00f2052a01000000");
        let back: Tx = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}
