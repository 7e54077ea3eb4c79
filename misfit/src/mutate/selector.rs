use crate::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The part of a transaction a field belongs to.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Section {
    /// Fields that occur once per transaction.
    Header,
    Inputs,
    Outputs,
    Witnesses,
}

/// Names a field of the transaction wire format that can be corrupted.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum FieldSelector {
    Version,
    Marker,
    Flag,
    TxInCount,
    /// The whole 36 byte previous output.
    InputPreviousOutput,
    /// The first 32 bytes of the previous output.
    InputTxid,
    /// The last 4 bytes of the previous output.
    InputVout,
    InputScriptLength,
    InputSignatureScript,
    InputSequence,
    TxOutCount,
    OutputValue,
    OutputPkScriptLength,
    OutputPkScript,
    WitnessCount,
    WitnessSize,
    WitnessItem,
    Locktime,
}

impl FieldSelector {
    /// Every selector, in wire order.
    pub const ALL: [FieldSelector; 18] = [
        FieldSelector::Version,
        FieldSelector::Marker,
        FieldSelector::Flag,
        FieldSelector::TxInCount,
        FieldSelector::InputPreviousOutput,
        FieldSelector::InputTxid,
        FieldSelector::InputVout,
        FieldSelector::InputScriptLength,
        FieldSelector::InputSignatureScript,
        FieldSelector::InputSequence,
        FieldSelector::TxOutCount,
        FieldSelector::OutputValue,
        FieldSelector::OutputPkScriptLength,
        FieldSelector::OutputPkScript,
        FieldSelector::WitnessCount,
        FieldSelector::WitnessSize,
        FieldSelector::WitnessItem,
        FieldSelector::Locktime,
    ];

    /// The canonical name, as accepted by [FieldSelector::from_str].
    pub fn name(&self) -> &'static str {
        use FieldSelector::*;
        match self {
            Version => "version",
            Marker => "marker",
            Flag => "flag",
            TxInCount => "tx_in_count",
            InputPreviousOutput => "input.previous_output",
            InputTxid => "input.txid",
            InputVout => "input.vout",
            InputScriptLength => "input.script_length",
            InputSignatureScript => "input.signature_script",
            InputSequence => "input.sequence",
            TxOutCount => "tx_out_count",
            OutputValue => "output.value",
            OutputPkScriptLength => "output.pk_script_length",
            OutputPkScript => "output.pk_script",
            WitnessCount => "witness_count",
            WitnessSize => "witness.size",
            WitnessItem => "witness.item",
            Locktime => "locktime",
        }
    }

    pub fn description(&self) -> &'static str {
        use FieldSelector::*;
        match self {
            Version => "transaction version (4 bytes)",
            Marker => "segwit marker (1 byte)",
            Flag => "segwit flag (1 byte)",
            TxInCount => "declared number of inputs (1 byte)",
            InputPreviousOutput => "previous output of each input (36 bytes)",
            InputTxid => "previous output txid of each input (32 bytes)",
            InputVout => "previous output index of each input (4 bytes)",
            InputScriptLength => "signature script length of each input (1 byte)",
            InputSignatureScript => "signature script of each input",
            InputSequence => "sequence of each input (4 bytes)",
            TxOutCount => "declared number of outputs (1 byte)",
            OutputValue => "value of each output (8 bytes)",
            OutputPkScriptLength => "pubkey script length of each output (1 byte)",
            OutputPkScript => "pubkey script of each output",
            WitnessCount => "declared number of witness items (1 byte)",
            WitnessSize => "size of each witness item (1 byte)",
            WitnessItem => "content of each witness item",
            Locktime => "transaction locktime (4 bytes)",
        }
    }

    /// The section whose elements this selector applies to.
    ///
    /// Count bytes belong to the header: they occur once whatever the number of elements.
    pub fn section(&self) -> Section {
        use FieldSelector::*;
        match self {
            InputPreviousOutput | InputTxid | InputVout | InputScriptLength
            | InputSignatureScript | InputSequence => Section::Inputs,
            OutputValue | OutputPkScriptLength | OutputPkScript => Section::Outputs,
            WitnessSize | WitnessItem => Section::Witnesses,
            Version | Marker | Flag | TxInCount | TxOutCount | WitnessCount | Locktime => {
                Section::Header
            }
        }
    }

    /// True if this selector names a length or count byte rather than content.
    pub fn is_size_field(&self) -> bool {
        use FieldSelector::*;
        matches!(
            self,
            TxInCount
                | TxOutCount
                | WitnessCount
                | InputScriptLength
                | OutputPkScriptLength
                | WitnessSize
        )
    }
}

impl Display for FieldSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldSelector {
    type Err = Error;

    /// Accepts the canonical names plus the command line spellings used by earlier tooling,
    /// such as `tx_in_sequence` or `script-pubkey`.
    ///
    /// `all` names no single field and is rejected here. It is understood by
    /// [MutationConfig::from_selectors](crate::mutate::MutationConfig::from_selectors).
    fn from_str(s: &str) -> Result<Self> {
        use FieldSelector::*;
        let normalized = s.trim().trim_start_matches("--").to_lowercase().replace('-', "_");
        let selector = match normalized.as_str() {
            "version" | "tx_version" => Version,
            "marker" | "tx_marker" => Marker,
            "flag" | "tx_flag" => Flag,
            "locktime" | "tx_locktime" => Locktime,
            "tx_in_count" | "input.count" => TxInCount,
            "input.previous_output" | "previous_output" | "tx_in_previous_output" => {
                InputPreviousOutput
            }
            "input.txid" | "txid" | "input_txid" | "tx_in_txid" => InputTxid,
            "input.vout" | "vout" | "input_vout" | "tx_in_vout" => InputVout,
            "input.script_length" | "tx_in_script_size" => InputScriptLength,
            "input.signature_script" | "script_sig" | "input_script" | "tx_in_script" => {
                InputSignatureScript
            }
            "input.sequence" | "sequence" | "input_sequence" | "tx_in_sequence" => InputSequence,
            "tx_out_count" | "output.count" => TxOutCount,
            "output.value" | "amount" | "output_amount" | "tx_out_amount" => OutputValue,
            "output.pk_script_length" | "tx_out_script_size" => OutputPkScriptLength,
            "output.pk_script" | "script_pubkey" | "output_script" | "tx_out_script" => {
                OutputPkScript
            }
            "witness_count" | "tx_witness_count" | "witness.count" => WitnessCount,
            "witness.size" | "tx_witness_size" => WitnessSize,
            "witness.item" | "witness" | "witness_data" | "tx_witness_item" => WitnessItem,
            _ => return Err(Error::BadArgument(format!("unknown field selector: {}", s))),
        };
        Ok(selector)
    }
}
