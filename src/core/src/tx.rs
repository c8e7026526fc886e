//! Transaction shapes, canonical ordering and signing.

use crate::codec::Codec;
use crate::errors::CoreError;
use crate::keychain::Keychain;
use crate::types::{Id, ShortId, Signature, TransferableInput, TransferableOutput};
use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fields shared by every transaction shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTx {
    /// Network the transaction is valid on
    pub network_id: u32,
    /// Chain the transaction is issued to
    pub blockchain_id: Id,
    /// Outputs created on this chain
    pub outs: Vec<TransferableOutput>,
    /// Inputs consumed from this chain
    pub ins: Vec<TransferableInput>,
    /// Free-form memo
    pub memo: Vec<u8>,
}

/// Moves value out of this chain into the atomic UTXO set of another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTx {
    /// Common fields; `outs` only holds change returned on this chain
    pub base: BaseTx,
    /// The chain the exported outputs are addressed to
    pub destination_chain: Id,
    /// Outputs placed in the atomic UTXO set
    pub exported_outs: Vec<TransferableOutput>,
}

/// Consumes atomic UTXOs exported to this chain by another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTx {
    /// Common fields; `ins` is empty
    pub base: BaseTx,
    /// The chain that exported the consumed UTXOs
    pub source_chain: Id,
    /// Inputs consumed from the atomic UTXO set
    pub imported_inputs: Vec<TransferableInput>,
}

/// An unsigned transaction body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsignedTx {
    /// Plain transfer within one chain
    Base(BaseTx),
    /// First half of a cross-chain transfer
    Export(ExportTx),
    /// Second half of a cross-chain transfer
    Import(ImportTx),
}

impl UnsignedTx {
    /// The inputs that need a credential, in signing order.
    pub fn inputs(&self) -> &[TransferableInput] {
        match self {
            UnsignedTx::Base(tx) => &tx.ins,
            UnsignedTx::Export(tx) => &tx.base.ins,
            UnsignedTx::Import(tx) => &tx.imported_inputs,
        }
    }

    /// Common fields.
    pub fn base(&self) -> &BaseTx {
        match self {
            UnsignedTx::Base(tx) => tx,
            UnsignedTx::Export(tx) => &tx.base,
            UnsignedTx::Import(tx) => &tx.base,
        }
    }
}

/// Signatures authorizing one input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// One signature per signing owner, in owner order
    pub signatures: Vec<Signature>,
}

/// A signed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// The signed body
    pub unsigned: UnsignedTx,
    /// One credential per input, in input order
    pub credentials: Vec<Credential>,
}

/// A signed transaction together with its encoding and id.
#[derive(Clone, Debug)]
pub struct SignedTx {
    tx: Tx,
    bytes: Vec<u8>,
    id: Id,
}

impl SignedTx {
    /// The transaction.
    pub fn tx(&self) -> &Tx {
        &self.tx
    }

    /// The codec encoding submitted to the network.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The transaction id: SHA-256 of the encoding.
    pub fn id(&self) -> Id {
        self.id
    }
}

impl Tx {
    /// Signs `unsigned`, producing one credential per input from the
    /// matching signer set.
    pub fn sign(
        unsigned: UnsignedTx,
        codec: &Codec,
        keychain: &Keychain,
        signers: &[Vec<ShortId>],
    ) -> Result<SignedTx, CoreError> {
        let num_inputs = unsigned.inputs().len();
        if signers.len() != num_inputs {
            return Err(CoreError::Signing(format!(
                "{} signer sets for {} inputs",
                signers.len(),
                num_inputs
            )));
        }

        let unsigned_bytes = codec.marshal(&unsigned)?;
        let digest = Sha256::digest(&unsigned_bytes);

        let mut credentials = Vec::with_capacity(signers.len());
        for (i, signer_set) in signers.iter().enumerate() {
            if signer_set.is_empty() {
                return Err(CoreError::Signing(format!("input {} has no signers", i)));
            }

            let mut signatures = Vec::with_capacity(signer_set.len());
            for addr in signer_set {
                let keypair = keychain.get(addr).ok_or_else(|| {
                    CoreError::Signing(format!("no key for signer {} of input {}", addr, i))
                })?;
                let signature = keypair.sign(&digest);
                keypair.public.verify(&digest, &signature).map_err(|e| {
                    CoreError::Signing(format!("bad signature from {}: {}", addr, e))
                })?;
                signatures.push(Signature(signature.to_bytes()));
            }
            credentials.push(Credential { signatures });
        }

        let tx = Tx {
            unsigned,
            credentials,
        };
        let bytes = codec.marshal(&tx)?;
        let id = Id::digest(&bytes);
        Ok(SignedTx { tx, bytes, id })
    }
}

/// Sorts outputs by their codec encoding, which starts with the asset id.
pub fn sort_transferable_outputs(
    outs: &mut Vec<TransferableOutput>,
    codec: &Codec,
) -> Result<(), CoreError> {
    let mut keyed = outs
        .drain(..)
        .map(|out| Ok((codec.marshal(&out)?, out)))
        .collect::<Result<Vec<_>, CoreError>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    outs.extend(keyed.into_iter().map(|(_, out)| out));
    Ok(())
}

/// Sorts inputs by UTXO reference, carrying each input's signer set along.
pub fn sort_inputs_with_signers(
    ins: &mut Vec<TransferableInput>,
    signers: &mut Vec<Vec<ShortId>>,
) {
    let mut paired: Vec<_> = ins.drain(..).zip(signers.drain(..)).collect();
    paired.sort_by(|a, b| a.0.utxo_id.cmp(&b.0.utxo_id));
    for (input, signer_set) in paired {
        ins.push(input);
        signers.push(signer_set);
    }
}

/// Builds and signs a plain transfer.
pub fn build_base_tx(
    network_id: u32,
    chain_id: Id,
    outs: Vec<TransferableOutput>,
    ins: Vec<TransferableInput>,
    signers: &[Vec<ShortId>],
    codec: &Codec,
    keychain: &Keychain,
) -> Result<SignedTx, CoreError> {
    let unsigned = UnsignedTx::Base(BaseTx {
        network_id,
        blockchain_id: chain_id,
        outs,
        ins,
        memo: Vec::new(),
    });
    Tx::sign(unsigned, codec, keychain, signers)
}

/// Builds and signs an export of `exported_outs` to `destination_chain`,
/// returning `returned_outs` on the source chain.
#[allow(clippy::too_many_arguments)]
pub fn build_export_tx(
    network_id: u32,
    chain_id: Id,
    destination_chain: Id,
    exported_outs: Vec<TransferableOutput>,
    returned_outs: Vec<TransferableOutput>,
    ins: Vec<TransferableInput>,
    signers: &[Vec<ShortId>],
    codec: &Codec,
    keychain: &Keychain,
) -> Result<SignedTx, CoreError> {
    let unsigned = UnsignedTx::Export(ExportTx {
        base: BaseTx {
            network_id,
            blockchain_id: chain_id,
            outs: returned_outs,
            ins,
            memo: Vec::new(),
        },
        destination_chain,
        exported_outs,
    });
    Tx::sign(unsigned, codec, keychain, signers)
}

/// Builds and signs an import of atomic UTXOs exported by `source_chain`.
#[allow(clippy::too_many_arguments)]
pub fn build_import_tx(
    network_id: u32,
    chain_id: Id,
    source_chain: Id,
    outs: Vec<TransferableOutput>,
    imported_inputs: Vec<TransferableInput>,
    signers: &[Vec<ShortId>],
    codec: &Codec,
    keychain: &Keychain,
) -> Result<SignedTx, CoreError> {
    let unsigned = UnsignedTx::Import(ImportTx {
        base: BaseTx {
            network_id,
            blockchain_id: chain_id,
            outs,
            ins: Vec::new(),
            memo: Vec::new(),
        },
        source_chain,
        imported_inputs,
    });
    Tx::sign(unsigned, codec, keychain, signers)
}
