//! In-memory chain used to drive the issuing engine end to end.

use async_trait::async_trait;
use issuer_core::formatting::parse_address;
use issuer_core::issue::{StatusSource, TxIssuer, TxStatusReply, UtxoIndex, UtxoPage, UtxoSource};
use issuer_core::tx::UnsignedTx;
use issuer_core::types::{Output, OutputOwners, TransferOutput, TransferableInput, TransferableOutput};
use issuer_core::{Codec, CoreError, Id, ShortId, Status, Tx, Utxo, UtxoId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct LedgerState {
    utxos: BTreeMap<UtxoId, Utxo>,
    /// Atomic UTXOs importable from each source chain
    atomic: BTreeMap<Id, BTreeMap<UtxoId, Utxo>>,
    /// Outputs exported to each destination chain
    exported: BTreeMap<Id, Vec<TransferableOutput>>,
    issued: Vec<Vec<u8>>,
    statuses: HashMap<Id, (Status, usize)>,
    page_requests: usize,
}

/// A single chain holding UTXOs in memory.
///
/// Issued transactions are checked against the current UTXO set: unknown or
/// already spent inputs are refused. Every transaction reports `Processing`
/// for `processing_rounds` status queries before it is committed.
pub struct Ledger {
    codec: Codec,
    state: Mutex<LedgerState>,
    processing_rounds: usize,
    /// Refuse every submission after this many
    pub max_issued: Option<usize>,
}

impl Ledger {
    pub fn new(codec: Codec, processing_rounds: usize) -> Self {
        Ledger {
            codec,
            state: Mutex::new(LedgerState::default()),
            processing_rounds,
            max_issued: None,
        }
    }

    /// Adds `count` UTXOs of `amount` owned by `owner`, created by `tx_id`.
    pub fn fund(&self, tx_id: Id, asset_id: Id, owner: ShortId, amount: u64, count: u32) {
        let mut state = self.state.lock().unwrap();
        for i in 0..count {
            let utxo = new_utxo(tx_id, i, asset_id, owner, amount);
            state.utxos.insert(utxo.utxo_id, utxo);
        }
    }

    /// Adds an atomic UTXO exported to this chain by `source_chain`.
    pub fn fund_atomic(&self, source_chain: Id, tx_id: Id, asset_id: Id, owner: ShortId, amount: u64) {
        let utxo = new_utxo(tx_id, 0, asset_id, owner, amount);
        let mut state = self.state.lock().unwrap();
        state
            .atomic
            .entry(source_chain)
            .or_default()
            .insert(utxo.utxo_id, utxo);
    }

    /// Total of `asset_id` held by `owner` on this chain.
    pub fn balance(&self, asset_id: Id, owner: ShortId) -> u64 {
        let state = self.state.lock().unwrap();
        state
            .utxos
            .values()
            .filter(|utxo| utxo.asset_id == asset_id && utxo.out.owners().addrs.contains(&owner))
            .filter_map(|utxo| utxo.out.amount())
            .sum()
    }

    /// Number of UTXOs owned by `owner` on this chain.
    pub fn utxo_count(&self, owner: ShortId) -> usize {
        let state = self.state.lock().unwrap();
        state
            .utxos
            .values()
            .filter(|utxo| utxo.out.owners().addrs.contains(&owner))
            .count()
    }

    pub fn atomic_count(&self, source_chain: Id) -> usize {
        let state = self.state.lock().unwrap();
        state.atomic.get(&source_chain).map_or(0, BTreeMap::len)
    }

    pub fn exported(&self, destination_chain: Id) -> Vec<TransferableOutput> {
        let state = self.state.lock().unwrap();
        state.exported.get(&destination_chain).cloned().unwrap_or_default()
    }

    /// Raw bytes of every accepted transaction, in submission order.
    pub fn issued(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().issued.clone()
    }

    pub fn page_requests(&self) -> usize {
        self.state.lock().unwrap().page_requests
    }

    fn accept(&self, state: &mut LedgerState, tx_id: Id, tx: &Tx) -> Result<(), CoreError> {
        let (consumed, source) = match &tx.unsigned {
            UnsignedTx::Base(base) => (&base.ins, None),
            UnsignedTx::Export(export) => (&export.base.ins, None),
            UnsignedTx::Import(import) => (&import.imported_inputs, Some(import.source_chain)),
        };
        if tx.credentials.len() != consumed.len() {
            return Err(CoreError::Network("credential count mismatch".to_string()));
        }

        let set = match source {
            Some(chain) => state.atomic.entry(chain).or_default(),
            None => &mut state.utxos,
        };
        check_inputs(set, consumed)?;
        for input in consumed {
            set.remove(&input.utxo_id);
        }

        let outs = &tx.unsigned.base().outs;
        for (i, out) in outs.iter().enumerate() {
            let utxo = Utxo {
                utxo_id: UtxoId::new(tx_id, i as u32),
                asset_id: out.asset_id,
                out: Output::Transfer(out.out.clone()),
            };
            state.utxos.insert(utxo.utxo_id, utxo);
        }
        if let UnsignedTx::Export(export) = &tx.unsigned {
            state
                .exported
                .entry(export.destination_chain)
                .or_default()
                .extend(export.exported_outs.iter().cloned());
        }
        Ok(())
    }
}

fn new_utxo(tx_id: Id, index: u32, asset_id: Id, owner: ShortId, amount: u64) -> Utxo {
    Utxo {
        utxo_id: UtxoId::new(tx_id, index),
        asset_id,
        out: Output::Transfer(TransferOutput {
            amount,
            owners: OutputOwners::single(owner),
        }),
    }
}

fn check_inputs(set: &BTreeMap<UtxoId, Utxo>, inputs: &[TransferableInput]) -> Result<(), CoreError> {
    for input in inputs {
        let utxo = set
            .get(&input.utxo_id)
            .ok_or_else(|| CoreError::Network(format!("missing or spent UTXO {}", input.utxo_id)))?;
        if utxo.out.amount() != Some(input.input.amount) || utxo.asset_id != input.asset_id {
            return Err(CoreError::Network(format!("input {} does not match", input.utxo_id)));
        }
    }
    Ok(())
}

#[async_trait]
impl UtxoSource for Ledger {
    async fn get_utxos(
        &self,
        addrs: &[String],
        source_chain: Option<&Id>,
        limit: u32,
        start: &UtxoIndex,
    ) -> Result<UtxoPage, CoreError> {
        let owners = addrs
            .iter()
            .map(|addr| {
                let (_, _, bytes) = parse_address(addr)?;
                ShortId::from_slice(&bytes)
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let mut state = self.state.lock().unwrap();
        state.page_requests += 1;
        let empty = BTreeMap::new();
        let set = match source_chain {
            Some(chain) => state.atomic.get(chain).unwrap_or(&empty),
            None => &state.utxos,
        };

        let skip = if start.utxo.is_empty() {
            0
        } else {
            start
                .utxo
                .parse::<usize>()
                .map_err(|e| CoreError::Network(e.to_string()))?
        };
        let owned: Vec<&Utxo> = set
            .values()
            .filter(|utxo| utxo.out.owners().addrs.iter().any(|a| owners.contains(a)))
            .collect();
        let page: Vec<&Utxo> = owned.iter().skip(skip).take(limit as usize).copied().collect();

        let utxos = page
            .iter()
            .map(|utxo| self.codec.marshal(*utxo))
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(UtxoPage {
            end_index: UtxoIndex {
                address: addrs.first().cloned().unwrap_or_default(),
                utxo: (skip + utxos.len()).to_string(),
            },
            utxos,
        })
    }
}

#[async_trait]
impl TxIssuer for Ledger {
    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<Id, CoreError> {
        let tx: Tx = self.codec.unmarshal(tx_bytes)?;
        let tx_id = Id::digest(tx_bytes);

        let mut state = self.state.lock().unwrap();
        if let Some(max) = self.max_issued {
            if state.issued.len() >= max {
                return Err(CoreError::Network("node refused the transaction".to_string()));
            }
        }
        self.accept(&mut state, tx_id, &tx)?;
        state.issued.push(tx_bytes.to_vec());
        state.statuses.insert(tx_id, (Status::Processing, 0));
        Ok(tx_id)
    }
}

#[async_trait]
impl StatusSource for Ledger {
    async fn get_tx_status(&self, tx_id: &Id, _include_reason: bool) -> Result<TxStatusReply, CoreError> {
        let mut state = self.state.lock().unwrap();
        let status = match state.statuses.get_mut(tx_id) {
            Some((status, queries)) => {
                *queries += 1;
                if *queries > self.processing_rounds {
                    *status = Status::Committed;
                }
                *status
            }
            None => Status::Unknown,
        };
        Ok(TxStatusReply { status, reason: None })
    }
}
