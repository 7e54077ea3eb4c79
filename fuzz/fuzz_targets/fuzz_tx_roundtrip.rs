#![no_main]

use libfuzzer_sys::fuzz_target;
use misfit::{Tx, TxFormat};

fuzz_target!(|data: &[u8]| {
    // anything that decodes must re-encode to exactly the input
    for format in [TxFormat::Legacy, TxFormat::Segwit] {
        if let Ok(tx) = Tx::decode(data.to_vec(), format) {
            let encoded = tx.encode().expect("decoded transaction must encode");
            assert_eq!(&encoded[..], data);
            assert_eq!(tx.encoded_size() as usize, data.len());
        }
    }
});
