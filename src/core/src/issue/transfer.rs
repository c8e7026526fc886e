//! Drives batches of outputs through selection, signing, submission and
//! confirmation, one batch at a time.

use crate::codec::Codec;
use crate::errors::CoreError;
use crate::formatting::{format_address, get_hrp};
use crate::issue::change::get_change_outputs;
use crate::issue::client::ChainClient;
use crate::issue::confirm::confirm_tx;
use crate::issue::cost::get_cost;
use crate::issue::inputs::build_inputs;
use crate::issue::utxos::fetch_utxos;
use crate::keychain::Keychain;
use crate::tx::{build_base_tx, build_export_tx, build_import_tx, sort_transferable_outputs, SignedTx};
use crate::types::{Id, ShortId, Status, TransferableInput, TransferableOutput};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Confirmation attempts per transaction unless configured otherwise.
pub const DEFAULT_CONFIRM_ATTEMPTS: usize = 100;

/// Delay between confirmation attempts unless configured otherwise.
pub const DEFAULT_CONFIRM_DELAY: Duration = Duration::from_millis(100);

/// Pause between two batches unless configured otherwise.
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_secs(1);

/// The transaction shape each batch is issued as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    /// Plain transfer on one chain
    Base,
    /// Move the outputs into the atomic set shared with `destination_chain`
    Export {
        /// Chain receiving the exported outputs
        destination_chain: Id,
    },
    /// Pay the outputs from the atomic set exported by `source_chain`
    Import {
        /// Chain the consumed UTXOs were exported from
        source_chain: Id,
    },
}

/// Parameters shared by every batch of a transfer.
#[derive(Clone, Debug)]
pub struct TransferConfig {
    pub network_id: u32,
    /// Chain the transactions are issued on
    pub chain_id: Id,
    /// Alias used when rendering addresses of this chain, e.g. `X`
    pub chain_alias: String,
    pub kind: TransferKind,
    pub fee_asset_id: Id,
    pub fee_amount: u64,
    pub confirm_attempts: usize,
    pub confirm_delay: Duration,
    /// Pause after each batch before the next one is started
    pub batch_interval: Duration,
}

impl TransferConfig {
    /// A config with the default confirmation and throttling settings.
    pub fn new(network_id: u32, chain_id: Id, chain_alias: &str, kind: TransferKind) -> Self {
        TransferConfig {
            network_id,
            chain_id,
            chain_alias: chain_alias.to_string(),
            kind,
            fee_asset_id: Id::default(),
            fee_amount: 0,
            confirm_attempts: DEFAULT_CONFIRM_ATTEMPTS,
            confirm_delay: DEFAULT_CONFIRM_DELAY,
            batch_interval: DEFAULT_BATCH_INTERVAL,
        }
    }

    pub fn with_fee(mut self, fee_asset_id: Id, fee_amount: u64) -> Self {
        self.fee_asset_id = fee_asset_id;
        self.fee_amount = fee_amount;
        self
    }
}

/// Outcome of one issued batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReceipt {
    pub tx_id: Id,
    pub status: Status,
    /// Formatted address that received the change of this batch
    pub change_address: String,
    /// Requested outputs sent so far, this batch included
    pub num_sent: usize,
}

/// Issues output batches against a single chain.
pub struct Transferer<'a, C: ChainClient + ?Sized> {
    client: &'a C,
    codec: &'a Codec,
    keychain: &'a Keychain,
    config: TransferConfig,
}

impl<'a, C: ChainClient + ?Sized> Transferer<'a, C> {
    pub fn new(client: &'a C, codec: &'a Codec, keychain: &'a Keychain, config: TransferConfig) -> Self {
        Transferer {
            client,
            codec,
            keychain,
            config,
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Sends every batch in order, waiting for each to be confirmed before
    /// the next one fetches its UTXOs.
    ///
    /// The first error stops the whole run. Batches confirmed before it are
    /// not undone.
    pub async fn send_outputs(
        &self,
        batches: &[Vec<TransferableOutput>],
    ) -> Result<Vec<BatchReceipt>, CoreError> {
        let mut receipts = Vec::with_capacity(batches.len());
        let mut num_sent = 0usize;

        for (i, batch) in batches.iter().enumerate() {
            let (tx_id, status, change_address) = self.send_batch(batch).await?;
            num_sent += batch.len();

            info!(
                "Issued {} ({}) with change to {}: {} outputs sent",
                tx_id, status, change_address, num_sent
            );
            receipts.push(BatchReceipt {
                tx_id,
                status,
                change_address,
                num_sent,
            });

            if i + 1 < batches.len() {
                tokio::time::sleep(self.config.batch_interval).await;
            }
        }
        Ok(receipts)
    }

    async fn send_batch(
        &self,
        outs: &[TransferableOutput],
    ) -> Result<(Id, Status, String), CoreError> {
        let cost = get_cost(outs, self.config.fee_asset_id, self.config.fee_amount)?;

        let hrp = get_hrp(self.config.network_id);
        let source_chain = match &self.config.kind {
            TransferKind::Import { source_chain } => Some(source_chain),
            _ => None,
        };
        let utxos = fetch_utxos(
            self.client,
            self.codec,
            &self.config.chain_alias,
            hrp,
            source_chain,
            self.keychain,
        )
        .await?;

        let selected = build_inputs(&utxos, self.keychain, &cost, unix_now())?;

        let change_addr = self
            .keychain
            .first_address()
            .ok_or_else(|| CoreError::Signing("keychain holds no keys".to_string()))?;
        let change = get_change_outputs(change_addr, &cost, &selected.spent);
        debug!(
            "Batch of {} outputs spends {} inputs with {} change outputs",
            outs.len(),
            selected.inputs.len(),
            change.len()
        );

        let signed = self.assemble(outs, change, selected.inputs, &selected.signers)?;

        let tx_id = self.client.issue_tx(signed.bytes()).await?;
        if tx_id != signed.id() {
            debug!("Node reported id {} for locally computed {}", tx_id, signed.id());
        }

        let status = confirm_tx(
            self.client,
            &tx_id,
            self.config.confirm_attempts,
            self.config.confirm_delay,
        )
        .await?;

        let change_address = format_address(&self.config.chain_alias, hrp, change_addr.as_bytes())?;
        Ok((tx_id, status, change_address))
    }

    fn assemble(
        &self,
        outs: &[TransferableOutput],
        mut change: Vec<TransferableOutput>,
        ins: Vec<TransferableInput>,
        signers: &[Vec<ShortId>],
    ) -> Result<SignedTx, CoreError> {
        let config = &self.config;
        match config.kind {
            TransferKind::Base => {
                let mut all_outs = outs.to_vec();
                all_outs.append(&mut change);
                sort_transferable_outputs(&mut all_outs, self.codec)?;
                build_base_tx(
                    config.network_id,
                    config.chain_id,
                    all_outs,
                    ins,
                    signers,
                    self.codec,
                    self.keychain,
                )
            }
            TransferKind::Export { destination_chain } => {
                let mut exported = outs.to_vec();
                sort_transferable_outputs(&mut exported, self.codec)?;
                sort_transferable_outputs(&mut change, self.codec)?;
                build_export_tx(
                    config.network_id,
                    config.chain_id,
                    destination_chain,
                    exported,
                    change,
                    ins,
                    signers,
                    self.codec,
                    self.keychain,
                )
            }
            TransferKind::Import { source_chain } => {
                let mut all_outs = outs.to_vec();
                all_outs.append(&mut change);
                sort_transferable_outputs(&mut all_outs, self.codec)?;
                build_import_tx(
                    config.network_id,
                    config.chain_id,
                    source_chain,
                    all_outs,
                    ins,
                    signers,
                    self.codec,
                    self.keychain,
                )
            }
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
