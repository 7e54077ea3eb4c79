use crate::{Error, Result};
use bytes::{Buf, Bytes};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A source of the random bytes used to overwrite fields.
///
/// Sources are owned by a single pipeline run. Runs in parallel each need their own source.
pub trait EntropySource {
    /// Fill `dest` completely, or fail without a partial guarantee.
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

/// Entropy drawn from any [RngCore].
#[derive(Debug, Clone)]
pub struct RngSource<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    /// A reproducible source: the same seed always yields the same bytes.
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RngSource::new(StdRng::from_entropy())
    }
}

impl<R: RngCore> EntropySource for RngSource<R> {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        self.rng
            .try_fill_bytes(dest)
            .map_err(|_| Error::RandomSourceExhausted)
    }
}

/// A finite, scripted source that hands out a fixed byte sequence in order.
///
/// Requests beyond the end fail with [Error::RandomSourceExhausted] and consume nothing.
#[derive(Debug, Clone)]
pub struct FiniteSource {
    bytes: Bytes,
}

impl FiniteSource {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        FiniteSource {
            bytes: bytes.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.remaining()
    }
}

impl EntropySource for FiniteSource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        if self.bytes.remaining() < dest.len() {
            return Err(Error::RandomSourceExhausted);
        }
        self.bytes.copy_to_slice(dest);
        Ok(())
    }
}
