#![no_main]

use libfuzzer_sys::fuzz_target;
use misfit::{pipeline, MutationConfig, RngSource, Tx, TxFormat};

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let (seed, raw) = data.split_at(8);
    let seed = u64::from_le_bytes(seed.try_into().unwrap());
    let config = MutationConfig::all();

    for format in [TxFormat::Legacy, TxFormat::Segwit] {
        if Tx::decode(raw.to_vec(), format).is_err() {
            continue;
        }
        let out = pipeline::run(raw.to_vec(), format, &config, &mut RngSource::seeded(seed))
            .expect("mutating a decodable transaction must succeed");
        assert_eq!(out.len(), raw.len());
    }
});
