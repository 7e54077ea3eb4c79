use crate::commands::Handler;
use crate::provider::InputArgs;
use misfit::{Result, Tx};

/// Arguments of `misfit decode`.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Also print the byte range of every field.
    #[arg(long)]
    pub layout: bool,
}

impl Handler for DecodeArgs {
    fn run(&self) -> Result<String> {
        let (raw, format) = self.input.load()?;
        let tx = Tx::decode(raw, format)?;
        let mut out = serde_json::to_string_pretty(&tx).map_err(std::io::Error::from)?;
        if self.layout {
            for span in tx.layout() {
                let name = match span.index {
                    Some(i) => format!("{}[{}]", span.field, i),
                    None => span.field.to_string(),
                };
                out.push_str(&format!("\n{:>4}..{:<4} {}", span.range.start, span.range.end, name));
            }
        }
        Ok(out)
    }
}
