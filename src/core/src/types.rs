//! Core types for issuing UTXO transfers.

use crate::errors::CoreError;
use crate::formatting::{cb58_decode, cb58_encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Length in bytes of an [`Id`].
pub const ID_LEN: usize = 32;

/// Length in bytes of a [`ShortId`].
pub const SHORT_ID_LEN: usize = 20;

macro_rules! fixed_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Builds an identifier from a slice of exactly the right length.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
                if bytes.len() != $len {
                    return Err(CoreError::Decode(format!(
                        "invalid {} length: {} (expected {})",
                        stringify!($name),
                        bytes.len(),
                        $len
                    )));
                }
                let mut id = [0u8; $len];
                id.copy_from_slice(bytes);
                Ok(Self(id))
            }

            /// Returns the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&cb58_encode(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_slice(&cb58_decode(s)?)
            }
        }
    };
}

fixed_id!(
    /// A 32-byte identifier naming an asset, a transaction or a chain.
    Id,
    ID_LEN
);

fixed_id!(
    /// A 20-byte short identifier, used as the raw form of an address.
    ShortId,
    SHORT_ID_LEN
);

impl Id {
    /// Returns the SHA-256 digest of `bytes` as an identifier.
    pub fn digest(bytes: &[u8]) -> Self {
        let mut id = [0u8; ID_LEN];
        id.copy_from_slice(&Sha256::digest(bytes));
        Self(id)
    }
}

/// Required amount per asset, and amount covered per asset.
pub type AssetAmounts = BTreeMap<Id, u64>;

/// Unspent outputs keyed by reference, iterated in reference order.
pub type UtxoSet = BTreeMap<UtxoId, Utxo>;

/// Reference to a single output of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtxoId {
    /// The transaction that produced the output
    pub tx_id: Id,
    /// The position of the output within that transaction
    pub output_index: u32,
}

impl UtxoId {
    /// Creates a new UTXO reference.
    pub fn new(tx_id: Id, output_index: u32) -> Self {
        Self { tx_id, output_index }
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.output_index)
    }
}

/// Spend predicate: who may spend an output, how many of them must sign,
/// and from when.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputOwners {
    /// Unix time before which the output cannot be spent
    pub locktime: u64,
    /// Number of owner signatures required
    pub threshold: u32,
    /// Owning addresses
    pub addrs: Vec<ShortId>,
}

impl OutputOwners {
    /// A single-signature owner with no time lock.
    pub fn single(addr: ShortId) -> Self {
        Self {
            locktime: 0,
            threshold: 1,
            addrs: vec![addr],
        }
    }
}

/// An output that carries a transferable amount.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransferOutput {
    /// The amount held by the output
    pub amount: u64,
    /// Who may spend it
    pub owners: OutputOwners,
}

/// An output granting the right to mint; it holds no amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintOutput {
    /// Who may exercise it
    pub owners: OutputOwners,
}

/// Any output a UTXO can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// Holds an amount of the UTXO's asset
    Transfer(TransferOutput),
    /// Holds a mint right, no amount
    Mint(MintOutput),
}

impl Output {
    /// The spend predicate of this output.
    pub fn owners(&self) -> &OutputOwners {
        match self {
            Output::Transfer(out) => &out.owners,
            Output::Mint(out) => &out.owners,
        }
    }

    /// The amount held, if this kind of output carries one.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Output::Transfer(out) => Some(out.amount),
            Output::Mint(_) => None,
        }
    }
}

/// Authorization to consume a [`TransferOutput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    /// The amount consumed
    pub amount: u64,
    /// Positions, within the output's owners, of the signing addresses
    pub sig_indices: Vec<u32>,
}

/// Authorization to consume a [`MintOutput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintInput {
    /// Positions, within the output's owners, of the signing addresses
    pub sig_indices: Vec<u32>,
}

/// An authorization produced by a keychain for some [`Output`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    /// Consumes an amount
    Transfer(TransferInput),
    /// Consumes a mint right
    Mint(MintInput),
}

impl Input {
    /// The amount consumed, if this kind of input carries one.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Input::Transfer(input) => Some(input.amount),
            Input::Mint(_) => None,
        }
    }

    /// Returns the input if it carries an amount.
    pub fn into_transfer(self) -> Option<TransferInput> {
        match self {
            Input::Transfer(input) => Some(input),
            Input::Mint(_) => None,
        }
    }
}

/// An output of a given asset, as placed in a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableOutput {
    /// The asset being sent
    pub asset_id: Id,
    /// Amount and recipients
    pub out: TransferOutput,
}

impl TransferableOutput {
    /// An output paying `amount` of `asset_id` to a single address.
    pub fn pay_to(asset_id: Id, amount: u64, addr: ShortId) -> Self {
        Self {
            asset_id,
            out: TransferOutput {
                amount,
                owners: OutputOwners::single(addr),
            },
        }
    }
}

/// An input consuming a UTXO, as placed in a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableInput {
    /// The UTXO being consumed
    pub utxo_id: UtxoId,
    /// The asset of that UTXO
    pub asset_id: Id,
    /// Amount and signature indices
    pub input: TransferInput,
}

/// An unspent transaction output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Unique reference
    pub utxo_id: UtxoId,
    /// The asset held
    pub asset_id: Id,
    /// The held output and its spend predicate
    pub out: Output,
}

/// A 64-byte ed25519 signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl serde::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SignatureVisitor;

        impl<'de> serde::de::Visitor<'de> for SignatureVisitor {
            type Value = Signature;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 64-byte signature")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.len() != 64 {
                    return Err(E::custom(format!(
                        "invalid signature length: {} (expected 64)",
                        v.len()
                    )));
                }

                let mut signature = [0u8; 64];
                signature.copy_from_slice(v);
                Ok(Signature(signature))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut signature = [0u8; 64];
                for (i, byte) in signature.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(Signature(signature))
            }
        }

        deserializer.deserialize_bytes(SignatureVisitor)
    }
}

/// Confirmation status of an issued transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The node has never heard of the transaction
    Unknown,
    /// The transaction is known but not yet decided
    Processing,
    /// The transaction was accepted
    Committed,
    /// The transaction was rejected
    Aborted,
}

impl Status {
    /// Whether no further status change can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Committed | Status::Aborted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Unknown => "Unknown",
            Status::Processing => "Processing",
            Status::Committed => "Committed",
            Status::Aborted => "Aborted",
        };
        f.write_str(name)
    }
}
