//! Signs hex-encoded unsigned transactions with a single key.

use crate::errors::CliError;
use issuer_core::formatting::encode_hex_with_checksum;
use issuer_core::keychain::parse_secret_key;
use issuer_core::{Codec, Keychain, Tx, UnsignedTx};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Reads one codec-encoded unsigned transaction per line of `input` as raw
/// hex, signs every input with `secret_key` and writes the checksummed hex
/// of each signed transaction to `output`. Returns the number signed.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    secret_key: &str,
    codec: &Codec,
) -> Result<usize, CliError> {
    let mut keychain = Keychain::new();
    let signer = keychain.add(parse_secret_key(secret_key)?);

    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let mut count = 0;
    for line in reader.lines() {
        let unsigned_bytes = hex::decode(line?.trim())?;
        let unsigned: UnsignedTx = codec.unmarshal(&unsigned_bytes)?;

        let signers = vec![vec![signer]; unsigned.inputs().len()];
        let signed = Tx::sign(unsigned, codec, &keychain, &signers)?;
        debug!("Signed {}", signed.id());

        writeln!(writer, "{}", encode_hex_with_checksum(signed.bytes()))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
