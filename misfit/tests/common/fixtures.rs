//! Valid transactions used as pipeline input.

use misfit::TxFormat;

/// A mainnet p2pkh transaction with one input and two outputs.
pub const MAINNET_P2PKH: &str = "01000000018a052edc7ae2136bfc0a860cdc91185ab0d7329107802f0a9c1cd0026c815f75010000006b483045022100e587ef1b4497a6694cad646cab468b6ece2fa98c7f49f9488611ca34eecebd1002205c4ea9066484bd1bffb7fdd7d84b5ae0ee6b7cdc20a8a513e41e420e0633b98841210262142850483b6728b8ecd299e4d0c8cf30ea0636f66205166814e52d73b64b4bffffffff0200000000000000000a006a075354554b2e434fb8ce3f01000000001976a91454cba8da8701174e34aac2bb31d42a88e2c302d088ac00000000";

/// One input with a one byte signature script, one output with an empty pubkey script.
pub const LEGACY_ONE_IN_ONE_OUT: &str = concat!(
    "01000000",
    "01",
    "2d711642b726b04401627ca9fbac32f5c8530fb1903cc4db02258717921a4881",
    "00000000",
    "01",
    "51",
    "ffffffff",
    "01",
    "0065cd1d00000000",
    "00",
    "00000000",
);

/// A p2wpkh spend: one input, two outputs, signature and pubkey in the witness section.
pub const SEGWIT_P2WPKH: &str = concat!(
    "02000000",
    "0001",
    "01",
    "84fd9bac333ad79154348296204fa7f8c537a96e08983e5f73b3f5aca8e8edf7",
    "01000000",
    "00",
    "fdffffff",
    "02",
    "40420f0000000000",
    "16",
    "0014ca978112ca1bbdcafac231b39a23dc4da786eff8",
    "a086010000000000",
    "17",
    "a9143e23e8160039594a33894f6564e1b1348bbd7a0087",
    "02",
    "47",
    "30440220454349e422f05297191ead13e21d3db520e5abef52055e4964b82fb213f593a10220043a718774c572bd8a25adbeb1bfcd5c0256ae11cecf9f9c3f925d0e52beaf8901",
    "21",
    "020017dea7770f7ecff7ab3c20506546129e96bdeba2f544bb8e5414eb79786122",
    "d2040000",
);

pub fn all() -> Vec<(&'static str, TxFormat)> {
    vec![
        (MAINNET_P2PKH, TxFormat::Legacy),
        (LEGACY_ONE_IN_ONE_OUT, TxFormat::Legacy),
        (SEGWIT_P2WPKH, TxFormat::Segwit),
    ]
}
