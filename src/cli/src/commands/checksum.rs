//! Adds checksums to hex-encoded payloads.

use crate::errors::CliError;
use issuer_core::formatting::encode_hex_with_checksum;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads one raw hex payload per line of `input` and writes its
/// checksummed hex form, one per line, to `output`. Returns the number of
/// payloads written.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize, CliError> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let mut count = 0;
    for line in reader.lines() {
        let bytes = hex::decode(line?.trim())?;
        writeln!(writer, "{}", encode_hex_with_checksum(&bytes))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
