//! Key pairs and the addresses they control.

use crate::errors::CoreError;
use crate::formatting::cb58_decode;
use crate::types::{Input, MintInput, Output, OutputOwners, ShortId, TransferInput, SHORT_ID_LEN};
use ed25519_dalek::{Keypair, PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of CB58-encoded secret keys.
pub const SECRET_KEY_PREFIX: &str = "PrivateKey-";

/// Derives the short address of a public key: the first 20 bytes of its
/// SHA-256 digest.
pub fn address_of(public: &PublicKey) -> ShortId {
    let hash = Sha256::digest(public.as_bytes());
    let mut addr = [0u8; SHORT_ID_LEN];
    addr.copy_from_slice(&hash[..SHORT_ID_LEN]);
    ShortId(addr)
}

/// Parses a secret key given as `PrivateKey-<cb58>` or as 64 hex characters.
pub fn parse_secret_key(encoded: &str) -> Result<SecretKey, CoreError> {
    let bytes = match encoded.strip_prefix(SECRET_KEY_PREFIX) {
        Some(cb58) => cb58_decode(cb58)?,
        None => hex::decode(encoded.trim_start_matches("0x"))
            .map_err(|e| CoreError::Decode(format!("invalid secret key hex: {}", e)))?,
    };
    SecretKey::from_bytes(&bytes)
        .map_err(|e| CoreError::Decode(format!("invalid secret key: {}", e)))
}

/// A set of key pairs indexed by the address each controls.
#[derive(Default)]
pub struct Keychain {
    keys: Vec<Keypair>,
    addrs: BTreeMap<ShortId, usize>,
}

impl Keychain {
    /// Creates an empty keychain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a keychain from encoded secret keys, see [`parse_secret_key`].
    pub fn from_encoded<S: AsRef<str>>(encoded: &[S]) -> Result<Self, CoreError> {
        let mut keychain = Self::new();
        for key in encoded {
            keychain.add(parse_secret_key(key.as_ref())?);
        }
        Ok(keychain)
    }

    /// Adds a key and returns the address it controls.
    pub fn add(&mut self, secret: SecretKey) -> ShortId {
        let public = PublicKey::from(&secret);
        let addr = address_of(&public);
        if !self.addrs.contains_key(&addr) {
            self.addrs.insert(addr, self.keys.len());
            self.keys.push(Keypair { secret, public });
        }
        addr
    }

    /// The key controlling `addr`, if held.
    pub fn get(&self, addr: &ShortId) -> Option<&Keypair> {
        self.addrs.get(addr).map(|&i| &self.keys[i])
    }

    /// Controlled addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = &ShortId> {
        self.addrs.keys()
    }

    /// The address of the first key added; change is paid here.
    pub fn first_address(&self) -> Option<ShortId> {
        self.keys.first().map(|key| address_of(&key.public))
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are held.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Picks owners this keychain can sign for, in owner order, until the
    /// threshold is met. Returns their indices and addresses.
    pub fn match_owners(&self, owners: &OutputOwners, now: u64) -> Option<(Vec<u32>, Vec<ShortId>)> {
        if owners.locktime > now {
            return None;
        }

        let threshold = owners.threshold as usize;
        let mut sig_indices = Vec::with_capacity(threshold);
        let mut signers = Vec::with_capacity(threshold);
        for (i, addr) in owners.addrs.iter().enumerate() {
            if sig_indices.len() == threshold {
                break;
            }
            if self.addrs.contains_key(addr) {
                sig_indices.push(i as u32);
                signers.push(*addr);
            }
        }

        if sig_indices.len() == threshold {
            Some((sig_indices, signers))
        } else {
            None
        }
    }

    /// Builds the input authorizing `output` at time `now`, along with the
    /// addresses that must sign it. `None` when the output is still locked
    /// or the keychain lacks enough owners.
    pub fn spend(&self, output: &Output, now: u64) -> Option<(Input, Vec<ShortId>)> {
        let (sig_indices, signers) = self.match_owners(output.owners(), now)?;
        let input = match output {
            Output::Transfer(out) => Input::Transfer(TransferInput {
                amount: out.amount,
                sig_indices,
            }),
            Output::Mint(_) => Input::Mint(MintInput { sig_indices }),
        };
        Some((input, signers))
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("addrs", &self.addrs.keys().collect::<Vec<_>>())
            .finish()
    }
}
