//! Malformed Bitcoin transaction generator for protocol-conformance testing.
//!
//! A structurally valid transaction is decoded into its raw wire fields, a chosen subset of
//! those fields is overwritten with random bytes of the same length, and the result is encoded
//! back to bytes ready to hand to a node or parser under test. Fields that are not selected come
//! out byte-identical to the input.
//!
//! ```
//! use misfit::{pipeline, FieldSelector, MutationConfig, RngSource, TxFormat};
//!
//! // version 1, no inputs, no outputs, locktime 0
//! let valid = "01000000000000000000";
//! let config = MutationConfig::default().with(FieldSelector::Locktime);
//! let mut source = RngSource::seeded(7);
//! let malformed = pipeline::run_hex(valid, TxFormat::Legacy, &config, &mut source).unwrap();
//! assert_eq!(malformed.len(), valid.len());
//! assert_eq!(&malformed[..12], &valid[..12]);
//! ```

/// The transaction wire format: byte cursor, record types and codec.
pub mod bitcoin;

/// Field selectors, mutation configuration, random sources and the mutation engine.
pub mod mutate;

pub mod pipeline;

mod result;
pub use result::{Error, Result};

pub use bitcoin::{Tx, TxFormat};
pub use mutate::{EntropySource, FieldSelector, FiniteSource, MutationConfig, RngSource, Section};

#[cfg(test)]
mod proptest_tests;
