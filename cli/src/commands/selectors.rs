use crate::commands::Handler;
use misfit::{FieldSelector, Result};

/// Arguments of `misfit selectors`.
#[derive(clap::Args, Debug)]
pub struct SelectorsArgs {}

impl Handler for SelectorsArgs {
    fn run(&self) -> Result<String> {
        let width = FieldSelector::ALL
            .iter()
            .map(|s| s.name().len())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = FieldSelector::ALL
            .iter()
            .map(|s| format!("{:<width$}  {}", s.name(), s.description(), width = width))
            .collect();
        Ok(lines.join("\n"))
    }
}
