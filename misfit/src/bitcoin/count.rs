use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The single byte element count that precedes the inputs, outputs and witness items.
///
/// Counts are compact-size values restricted to one byte. A count that was read from the wire
/// or built from a sequence is *derived*: when encoding, the byte is recomputed from the number
/// of elements actually present. A *pinned* count is emitted verbatim whatever the number of
/// elements, which is how a wrong declared count is produced.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CountByte {
    value: u8,
    pinned: bool,
}

impl CountByte {
    pub fn derived(value: u8) -> CountByte {
        CountByte {
            value,
            pinned: false,
        }
    }

    /// Derive the count for a section holding `len` elements.
    pub fn for_len(len: usize) -> Result<CountByte> {
        Ok(Self::derived(Self::check_len(len)?))
    }

    pub fn pinned(value: u8) -> CountByte {
        CountByte {
            value,
            pinned: true,
        }
    }

    /// The value last read, built or pinned.
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// The byte to put on the wire in front of a section holding `len` elements.
    pub fn resolve(&self, len: usize) -> Result<u8> {
        if self.pinned {
            Ok(self.value)
        } else {
            Self::check_len(len)
        }
    }

    fn check_len(len: usize) -> Result<u8> {
        u8::try_from(len).map_err(|_| {
            Error::MalformedInput(format!(
                "{} elements do not fit in a single count byte",
                len
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_follows_len() {
        let c = CountByte::derived(2);
        assert_eq!(c.resolve(2).unwrap(), 2);
        // derived counts are recomputed from the actual sequence length
        assert_eq!(c.resolve(5).unwrap(), 5);
        assert!(c.resolve(256).is_err());
    }

    #[test]
    fn pinned_is_verbatim() {
        let c = CountByte::pinned(0xfd);
        assert!(c.is_pinned());
        assert_eq!(c.resolve(1).unwrap(), 0xfd);
        assert_eq!(c.resolve(1000).unwrap(), 0xfd);
    }

    #[test]
    fn for_len_limits() {
        assert_eq!(CountByte::for_len(255).unwrap().value(), 255);
        assert!(matches!(
            CountByte::for_len(300),
            Err(Error::MalformedInput(_))
        ));
    }
}
