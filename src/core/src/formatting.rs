//! Human-readable encodings: CB58, checksummed hex and chain addresses.

use crate::errors::CoreError;
use bech32::{Bech32, Hrp};
use sha2::{Digest, Sha256};

const CHECKSUM_LEN: usize = 4;
const HEX_PREFIX: &str = "0x";
const ADDRESS_SEP: char = '-';

/// Network id of the main network.
pub const MAINNET_ID: u32 = 1;
/// Network id of the public test network.
pub const FUJI_ID: u32 = 5;
/// Network id of a local test network.
pub const LOCAL_ID: u32 = 12345;

/// Returns the human-readable address part used on `network_id`.
pub fn get_hrp(network_id: u32) -> &'static str {
    match network_id {
        MAINNET_ID => "avax",
        FUJI_ID => "fuji",
        LOCAL_ID => "local",
        _ => "custom",
    }
}

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = Sha256::digest(bytes);
    let mut sum = [0u8; CHECKSUM_LEN];
    sum.copy_from_slice(&hash[hash.len() - CHECKSUM_LEN..]);
    sum
}

fn with_checksum(bytes: &[u8]) -> Vec<u8> {
    let mut checked = Vec::with_capacity(bytes.len() + CHECKSUM_LEN);
    checked.extend_from_slice(bytes);
    checked.extend_from_slice(&checksum(bytes));
    checked
}

fn strip_checksum(checked: &[u8]) -> Result<Vec<u8>, CoreError> {
    if checked.len() < CHECKSUM_LEN {
        return Err(CoreError::Decode(format!(
            "input too short for checksum: {} bytes",
            checked.len()
        )));
    }
    let (raw, sum) = checked.split_at(checked.len() - CHECKSUM_LEN);
    if checksum(raw)[..] != *sum {
        return Err(CoreError::Decode("invalid input checksum".to_string()));
    }
    Ok(raw.to_vec())
}

/// Encodes `bytes` as base58 with a trailing 4-byte SHA-256 checksum.
pub fn cb58_encode(bytes: &[u8]) -> String {
    bs58::encode(with_checksum(bytes)).into_string()
}

/// Decodes a CB58 string, verifying its checksum.
pub fn cb58_decode(s: &str) -> Result<Vec<u8>, CoreError> {
    let checked = bs58::decode(s)
        .into_vec()
        .map_err(|e| CoreError::Decode(format!("invalid cb58 string: {}", e)))?;
    strip_checksum(&checked)
}

/// Encodes `bytes` as `0x`-prefixed hex with a trailing 4-byte checksum.
pub fn encode_hex_with_checksum(bytes: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(with_checksum(bytes)))
}

/// Decodes `0x`-prefixed checksummed hex.
pub fn decode_hex_with_checksum(s: &str) -> Result<Vec<u8>, CoreError> {
    let body = s.strip_prefix(HEX_PREFIX).ok_or_else(|| {
        CoreError::Decode(format!("hex string is missing the {} prefix", HEX_PREFIX))
    })?;
    let checked =
        hex::decode(body).map_err(|e| CoreError::Decode(format!("invalid hex: {}", e)))?;
    strip_checksum(&checked)
}

/// Renders a raw address as `<chain alias>-<bech32(hrp, addr)>`.
pub fn format_address(chain_alias: &str, hrp: &str, addr: &[u8]) -> Result<String, CoreError> {
    let hrp = Hrp::parse(hrp).map_err(|e| CoreError::Decode(format!("invalid hrp: {}", e)))?;
    let encoded = bech32::encode::<Bech32>(hrp, addr)
        .map_err(|e| CoreError::Decode(format!("cannot encode address: {}", e)))?;
    Ok(format!("{}{}{}", chain_alias, ADDRESS_SEP, encoded))
}

/// Splits a formatted address into chain alias, hrp and raw bytes.
pub fn parse_address(addr: &str) -> Result<(String, String, Vec<u8>), CoreError> {
    let (chain_alias, encoded) = addr
        .split_once(ADDRESS_SEP)
        .ok_or_else(|| CoreError::Decode(format!("no chain alias in address {}", addr)))?;
    let (hrp, bytes) = bech32::decode(encoded)
        .map_err(|e| CoreError::Decode(format!("invalid bech32 address {}: {}", addr, e)))?;
    Ok((chain_alias.to_string(), hrp.to_string(), bytes))
}
