//! The bitcoin module contains the transaction wire format and its codec.

mod count;
mod cursor;
mod encoding;
mod format;
mod layout;
mod serde_hex;
mod tx;

pub use self::count::CountByte;
pub use self::cursor::ByteCursor;
pub use self::encoding::Encodable;
pub use self::format::TxFormat;
pub use self::layout::FieldSpan;
pub use self::tx::{Outpoint, SegwitFlags, Tx, TxInput, TxOutput, WitnessItem};
