use crate::commands::Handler;
use crate::provider::InputArgs;
use log::info;
use misfit::mutate::MutatedField;
use misfit::{pipeline, FieldSelector, MutationConfig, Result, RngSource};
use std::fs::File;
use std::path::PathBuf;

/// Arguments of `misfit createtx`.
#[derive(clap::Args, Debug)]
pub struct CreateTxArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Seed for reproducible output. Without it every run differs.
    #[arg(long)]
    pub seed: Option<u64>,
    /// JSON file holding a mutation configuration. Flags are added on top of it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Corrupt a field by selector name, may be repeated. See `misfit selectors`.
    #[arg(short, long = "field", value_name = "SELECTOR")]
    pub fields: Vec<String>,
    /// Corrupt every field.
    #[arg(long)]
    pub all: bool,
    /// Print the corrupted fields to stderr.
    #[arg(long)]
    pub report: bool,
    /// Print the mutated record as JSON to stderr.
    #[arg(long)]
    pub show: bool,

    /// Set the transaction version as random invalid parameter
    #[arg(long)]
    pub tx_version: bool,
    /// Set the segwit marker as random invalid parameter
    #[arg(long)]
    pub tx_marker: bool,
    /// Set the segwit flag as random invalid parameter
    #[arg(long)]
    pub tx_flag: bool,
    /// Set the transaction locktime as random invalid parameter
    #[arg(long)]
    pub tx_locktime: bool,
    /// Set the declared input count as random invalid parameter
    #[arg(long)]
    pub tx_in_count_byte: bool,
    /// Set the whole previous output of inputs as random invalid parameter
    #[arg(long)]
    pub tx_in_previous_output: bool,
    /// Set the txid of inputs as random invalid parameter
    #[arg(long)]
    pub tx_in_txid: bool,
    /// Set the vout of inputs as random invalid parameter
    #[arg(long)]
    pub tx_in_vout: bool,
    /// Set the scriptsig size of inputs as random invalid parameter
    #[arg(long)]
    pub tx_in_script_size: bool,
    /// Set the scriptsig of inputs as random invalid parameter
    #[arg(long)]
    pub tx_in_script: bool,
    /// Set the sequence of inputs as random invalid parameter
    #[arg(long)]
    pub tx_in_sequence: bool,
    /// Number of leading inputs to corrupt (all when not set)
    #[arg(long)]
    pub invalid_tx_in_count: Option<usize>,
    /// Set the declared output count as random invalid parameter
    #[arg(long)]
    pub tx_out_count_byte: bool,
    /// Set the amount of outputs as random invalid parameter
    #[arg(long)]
    pub tx_out_amount: bool,
    /// Set the scriptpubkey size of outputs as random invalid parameter
    #[arg(long)]
    pub tx_out_script_size: bool,
    /// Set the scriptpubkey of outputs as random invalid parameter
    #[arg(long)]
    pub tx_out_script: bool,
    /// Number of leading outputs to corrupt (all when not set)
    #[arg(long)]
    pub invalid_tx_out_count: Option<usize>,
    /// Set the declared witness item count as random invalid parameter
    #[arg(long)]
    pub tx_witness_count_byte: bool,
    /// Set the size of witness items as random invalid parameter
    #[arg(long)]
    pub tx_witness_size: bool,
    /// Set the content of witness items as random invalid parameter
    #[arg(long)]
    pub tx_witness_item: bool,
    /// Number of leading witness items to corrupt (all when not set)
    #[arg(long)]
    pub invalid_tx_witness_count: Option<usize>,
}

impl CreateTxArgs {
    /// The configuration from flags alone.
    fn flag_config(&self) -> Result<MutationConfig> {
        use FieldSelector::*;
        let mut config = MutationConfig::from_selectors(&self.fields)?;
        if self.all {
            config.merge(&MutationConfig::all());
        }
        let flags = [
            (self.tx_version, Version),
            (self.tx_marker, Marker),
            (self.tx_flag, Flag),
            (self.tx_locktime, Locktime),
            (self.tx_in_count_byte, TxInCount),
            (self.tx_in_previous_output, InputPreviousOutput),
            (self.tx_in_txid, InputTxid),
            (self.tx_in_vout, InputVout),
            (self.tx_in_script_size, InputScriptLength),
            (self.tx_in_script, InputSignatureScript),
            (self.tx_in_sequence, InputSequence),
            (self.tx_out_count_byte, TxOutCount),
            (self.tx_out_amount, OutputValue),
            (self.tx_out_script_size, OutputPkScriptLength),
            (self.tx_out_script, OutputPkScript),
            (self.tx_witness_count_byte, WitnessCount),
            (self.tx_witness_size, WitnessSize),
            (self.tx_witness_item, WitnessItem),
        ];
        for (enabled, selector) in flags {
            if enabled {
                config.set(selector, true);
            }
        }
        config.invalid_tx_in_count = self.invalid_tx_in_count;
        config.invalid_tx_out_count = self.invalid_tx_out_count;
        config.invalid_witness_count = self.invalid_tx_witness_count;
        Ok(config)
    }

    /// The configuration file, if any, with the flags merged over it.
    pub fn mutation_config(&self) -> Result<MutationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)?;
                serde_json::from_reader(file).map_err(std::io::Error::from)?
            }
            None => MutationConfig::default(),
        };
        config.merge(&self.flag_config()?);
        Ok(config)
    }
}

impl Handler for CreateTxArgs {
    fn run(&self) -> Result<String> {
        let config = self.mutation_config()?;
        if config.is_empty() {
            log::warn!("no fields selected, the transaction will be re-encoded unchanged");
        }
        let (raw, format) = self.input.load()?;
        let mut source = match self.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        };
        let outcome = pipeline::run_with_report(raw, format, &config, &mut source)?;
        for MutatedField { field, index } in &outcome.report.mutated {
            let line = match index {
                Some(i) => format!("{}[{}]", field, i),
                None => field.to_string(),
            };
            info!("corrupted {}", line);
            if self.report {
                eprintln!("corrupted {}", line);
            }
        }
        if self.show {
            let json =
                serde_json::to_string_pretty(&outcome.tx).map_err(std::io::Error::from)?;
            eprintln!("{}", json);
        }
        Ok(hex::encode(outcome.raw))
    }
}
