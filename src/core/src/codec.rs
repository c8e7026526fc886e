//! Versioned binary codec for transactions and UTXOs.
//!
//! A payload is a 2-byte big-endian codec version followed by a fixed-int,
//! big-endian `bincode` body. The codec is an explicit value: callers build
//! one with [`Codec::new`] and hand it to everything that encodes or decodes.

use crate::errors::CoreError;
use bincode::Options;
use byteorder::{BigEndian, ByteOrder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The only codec version this crate reads and writes.
pub const CODEC_VERSION: u16 = 0;

/// Default upper bound on a single encoded payload.
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;

const VERSION_LEN: usize = 2;

/// Encodes and decodes versioned payloads.
#[derive(Clone, Debug)]
pub struct Codec {
    version: u16,
    max_size: u64,
}

impl Codec {
    /// Creates a codec that refuses payloads larger than `max_size` bytes.
    pub fn new(max_size: u64) -> Result<Self, CoreError> {
        if max_size <= VERSION_LEN as u64 {
            return Err(CoreError::Codec(format!(
                "max size {} leaves no room for a payload",
                max_size
            )));
        }
        Ok(Self {
            version: CODEC_VERSION,
            max_size,
        })
    }

    /// The version written in front of every payload.
    pub fn version(&self) -> u16 {
        self.version
    }

    fn options(&self) -> impl Options {
        bincode::DefaultOptions::new()
            .with_big_endian()
            .with_fixint_encoding()
            .with_limit(self.max_size - VERSION_LEN as u64)
    }

    /// Serializes `value` behind the codec version.
    pub fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CoreError> {
        let body = self
            .options()
            .serialize(value)
            .map_err(|e| CoreError::Codec(format!("failed to marshal: {}", e)))?;

        let mut bytes = vec![0u8; VERSION_LEN];
        BigEndian::write_u16(&mut bytes, self.version);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Deserializes a payload, rejecting unknown versions and trailing bytes.
    pub fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CoreError> {
        if bytes.len() < VERSION_LEN {
            return Err(CoreError::Decode(format!(
                "payload of {} bytes has no codec version",
                bytes.len()
            )));
        }
        if bytes.len() as u64 > self.max_size {
            return Err(CoreError::Decode(format!(
                "payload of {} bytes exceeds the maximum of {}",
                bytes.len(),
                self.max_size
            )));
        }

        let (version, body) = bytes.split_at(VERSION_LEN);
        let version = BigEndian::read_u16(version);
        if version != self.version {
            return Err(CoreError::UnsupportedCodecVersion {
                expected: self.version,
                actual: version,
            });
        }

        Ok(self.options().deserialize(body)?)
    }
}
