//! Field selection and corruption of decoded transactions.

mod config;
mod engine;
mod entropy;
mod selector;

pub use self::config::MutationConfig;
pub use self::engine::{mutate, MutatedField, MutationReport};
pub use self::entropy::{EntropySource, FiniteSource, RngSource};
pub use self::selector::{FieldSelector, Section};
