use crate::mutate::{FieldSelector, Section};
use crate::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Which fields to corrupt, and in how many elements of each repeated section.
///
/// The default enables nothing and leaves every section limit unset. An unset limit makes every
/// element of the section eligible; a limit of zero makes none eligible; a limit of `k` makes
/// the first `k` eligible.
///
/// The struct deserializes from JSON with every key optional:
///
/// ```json
/// { "input_sequence": true, "invalid_tx_in_count": 1 }
/// ```
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub version: bool,
    pub marker: bool,
    pub flag: bool,
    pub locktime: bool,
    pub tx_in_count: bool,
    pub input_previous_output: bool,
    pub input_txid: bool,
    pub input_vout: bool,
    pub input_script_length: bool,
    pub input_signature_script: bool,
    pub input_sequence: bool,
    pub tx_out_count: bool,
    pub output_value: bool,
    pub output_pk_script_length: bool,
    pub output_pk_script: bool,
    pub witness_count: bool,
    pub witness_size: bool,
    pub witness_item: bool,
    /// Number of leading inputs eligible for corruption.
    pub invalid_tx_in_count: Option<usize>,
    /// Number of leading outputs eligible for corruption.
    pub invalid_tx_out_count: Option<usize>,
    /// Number of leading witness items eligible for corruption.
    pub invalid_witness_count: Option<usize>,
}

impl MutationConfig {
    /// A configuration with every selector enabled and no section limits.
    pub fn all() -> MutationConfig {
        let mut config = MutationConfig::default();
        for selector in FieldSelector::ALL {
            config.set(selector, true);
        }
        config
    }

    /// Build a configuration from selector names. The name `all` enables every selector.
    pub fn from_selectors<I, S>(names: I) -> Result<MutationConfig>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = MutationConfig::default();
        for name in names {
            let name = name.as_ref();
            if name.trim().eq_ignore_ascii_case("all") {
                config.merge(&MutationConfig::all());
            } else {
                config.set(name.parse()?, true);
            }
        }
        Ok(config)
    }

    /// Enable a selector, builder style.
    pub fn with(mut self, selector: FieldSelector) -> MutationConfig {
        self.set(selector, true);
        self
    }

    /// Set the element limit of a repeated section, builder style.
    pub fn limit(mut self, section: Section, count: usize) -> Result<MutationConfig> {
        *self.limit_mut(section)? = Some(count);
        Ok(self)
    }

    fn flag_mut(&mut self, selector: FieldSelector) -> &mut bool {
        use FieldSelector::*;
        match selector {
            Version => &mut self.version,
            Marker => &mut self.marker,
            Flag => &mut self.flag,
            Locktime => &mut self.locktime,
            TxInCount => &mut self.tx_in_count,
            InputPreviousOutput => &mut self.input_previous_output,
            InputTxid => &mut self.input_txid,
            InputVout => &mut self.input_vout,
            InputScriptLength => &mut self.input_script_length,
            InputSignatureScript => &mut self.input_signature_script,
            InputSequence => &mut self.input_sequence,
            TxOutCount => &mut self.tx_out_count,
            OutputValue => &mut self.output_value,
            OutputPkScriptLength => &mut self.output_pk_script_length,
            OutputPkScript => &mut self.output_pk_script,
            WitnessCount => &mut self.witness_count,
            WitnessSize => &mut self.witness_size,
            WitnessItem => &mut self.witness_item,
        }
    }

    fn limit_mut(&mut self, section: Section) -> Result<&mut Option<usize>> {
        match section {
            Section::Inputs => Ok(&mut self.invalid_tx_in_count),
            Section::Outputs => Ok(&mut self.invalid_tx_out_count),
            Section::Witnesses => Ok(&mut self.invalid_witness_count),
            Section::Header => Err(Error::BadArgument(
                "the header has no element limit".to_string(),
            )),
        }
    }

    pub fn set(&mut self, selector: FieldSelector, enabled: bool) {
        *self.flag_mut(selector) = enabled;
    }

    pub fn is_enabled(&self, selector: FieldSelector) -> bool {
        use FieldSelector::*;
        match selector {
            Version => self.version,
            Marker => self.marker,
            Flag => self.flag,
            Locktime => self.locktime,
            TxInCount => self.tx_in_count,
            InputPreviousOutput => self.input_previous_output,
            InputTxid => self.input_txid,
            InputVout => self.input_vout,
            InputScriptLength => self.input_script_length,
            InputSignatureScript => self.input_signature_script,
            InputSequence => self.input_sequence,
            TxOutCount => self.tx_out_count,
            OutputValue => self.output_value,
            OutputPkScriptLength => self.output_pk_script_length,
            OutputPkScript => self.output_pk_script,
            WitnessCount => self.witness_count,
            WitnessSize => self.witness_size,
            WitnessItem => self.witness_item,
        }
    }

    /// The enabled selectors, in wire order.
    pub fn enabled(&self) -> Vec<FieldSelector> {
        FieldSelector::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }

    /// True if any selector of the section is enabled.
    pub fn touches(&self, section: Section) -> bool {
        self.enabled().iter().any(|s| s.section() == section)
    }

    /// The number of leading elements eligible for corruption in a section holding `len`.
    ///
    /// A limit larger than the section is clamped to the section length.
    pub fn eligible(&self, section: Section, len: usize) -> usize {
        let limit = match section {
            Section::Inputs => self.invalid_tx_in_count,
            Section::Outputs => self.invalid_tx_out_count,
            Section::Witnesses => self.invalid_witness_count,
            Section::Header => None,
        };
        match limit {
            None => len,
            Some(k) if k > len => {
                warn!(
                    "{:?} limit of {} exceeds the {} elements present, using {}",
                    section, k, len, len
                );
                len
            }
            Some(k) => k,
        }
    }

    /// Enable everything enabled in `other`, and take its section limits where it sets them.
    pub fn merge(&mut self, other: &MutationConfig) {
        for selector in other.enabled() {
            self.set(selector, true);
        }
        if other.invalid_tx_in_count.is_some() {
            self.invalid_tx_in_count = other.invalid_tx_in_count;
        }
        if other.invalid_tx_out_count.is_some() {
            self.invalid_tx_out_count = other.invalid_tx_out_count;
        }
        if other.invalid_witness_count.is_some() {
            self.invalid_witness_count = other.invalid_witness_count;
        }
    }
}
