//! End-to-end tests of batched transfers against the in-memory ledger.

use crate::ledger::Ledger;
use ed25519_dalek::SecretKey;
use issuer_core::codec::DEFAULT_MAX_SIZE;
use issuer_core::formatting::format_address;
use issuer_core::issue::{
    build_outputs, TransferConfig, TransferKind, Transferer, MAX_OUTPUTS_PER_TX, UTXO_PAGE_SIZE,
};
use issuer_core::{Codec, CoreError, Id, Keychain, ShortId, Status, Tx, TransferableOutput, UnsignedTx};
use rand::Rng;
use std::time::Duration;

const AVAX: Id = Id([0xaa; 32]);
const CHAIN: Id = Id([0x0c; 32]);
const FEE: u64 = 1_000;

fn codec() -> Codec {
    Codec::new(DEFAULT_MAX_SIZE).unwrap()
}

fn keychain(seed: u8) -> (Keychain, ShortId) {
    let mut keychain = Keychain::new();
    let addr = keychain.add(SecretKey::from_bytes(&[seed; 32]).unwrap());
    (keychain, addr)
}

fn random_addresses(count: usize) -> Vec<ShortId> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut addr = [0u8; 20];
            rng.fill(&mut addr);
            ShortId(addr)
        })
        .collect()
}

fn config(kind: TransferKind) -> TransferConfig {
    let mut config = TransferConfig::new(12345, CHAIN, "X", kind).with_fee(AVAX, FEE);
    config.confirm_attempts = 5;
    config.confirm_delay = Duration::ZERO;
    config.batch_interval = Duration::ZERO;
    config
}

fn decode(codec: &Codec, bytes: &[u8]) -> Tx {
    codec.unmarshal(bytes).unwrap()
}

/// Tests that later batches spend the change of earlier ones.
#[tokio::test]
async fn test_batches_spend_fresh_change() {
    let codec = codec();
    let (keychain, owner) = keychain(1);
    let ledger = Ledger::new(codec.clone(), 2);
    ledger.fund(Id([0x10; 32]), AVAX, owner, 10_000_000, 1);

    let recipients = random_addresses(3);
    let batches = build_outputs(&recipients, 400, AVAX, 10).unwrap();
    assert_eq!(batches.len(), 2);

    let transferer = Transferer::new(&ledger, &codec, &keychain, config(TransferKind::Base));
    let receipts = transferer.send_outputs(&batches).await.unwrap();

    assert_eq!(receipts.len(), 2);
    assert!(receipts.iter().all(|r| r.status == Status::Committed));
    assert_eq!(receipts[0].num_sent, 1000);
    assert_eq!(receipts[1].num_sent, 1200);
    assert_eq!(
        receipts[0].change_address,
        format_address("X", "local", owner.as_bytes()).unwrap()
    );

    for recipient in &recipients {
        assert_eq!(ledger.balance(AVAX, *recipient), 4_000);
        assert_eq!(ledger.utxo_count(*recipient), 400);
    }
    assert_eq!(ledger.balance(AVAX, owner), 10_000_000 - 12_000 - 2 * FEE);

    let issued = ledger.issued();
    // a full batch carries its change as one extra output
    let first = decode(&codec, &issued[0]);
    assert_eq!(first.unsigned.base().outs.len(), MAX_OUTPUTS_PER_TX + 1);

    let second = decode(&codec, &issued[1]);
    assert_eq!(second.unsigned.inputs().len(), 1);
    assert_eq!(second.unsigned.inputs()[0].utxo_id.tx_id, receipts[0].tx_id);
}

/// Tests that identical ledgers yield identical transaction bytes.
#[tokio::test]
async fn test_issued_bytes_are_reproducible() {
    let codec = codec();
    let (keychain, owner) = keychain(2);
    let recipients = vec![ShortId([0x21; 20]), ShortId([0x22; 20])];
    let batches = build_outputs(&recipients, 3, AVAX, 2_500).unwrap();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let ledger = Ledger::new(codec.clone(), 0);
        for tx_byte in [0x35, 0x31, 0x39, 0x33] {
            ledger.fund(Id([tx_byte; 32]), AVAX, owner, 3_000, 4);
        }
        let transferer = Transferer::new(&ledger, &codec, &keychain, config(TransferKind::Base));
        transferer.send_outputs(&batches).await.unwrap();
        runs.push(ledger.issued());
    }
    assert_eq!(runs[0], runs[1]);

    // 16 000 is needed, taken from the lowest references first
    let tx = decode(&codec, &runs[0][0]);
    let picked: Vec<(u8, u32)> = tx
        .unsigned
        .inputs()
        .iter()
        .map(|input| (input.utxo_id.tx_id.0[0], input.utxo_id.output_index))
        .collect();
    assert_eq!(
        picked,
        vec![(0x31, 0), (0x31, 1), (0x31, 2), (0x31, 3), (0x33, 0), (0x33, 1)]
    );
}

#[tokio::test]
async fn test_export_moves_outputs_off_chain() {
    let codec = codec();
    let (keychain, owner) = keychain(3);
    let destination = Id([0xdd; 32]);
    let ledger = Ledger::new(codec.clone(), 1);
    ledger.fund(Id([0x10; 32]), AVAX, owner, 50_000, 1);

    let recipients = random_addresses(2);
    let batches = build_outputs(&recipients, 2, AVAX, 1_000).unwrap();
    let transferer = Transferer::new(
        &ledger,
        &codec,
        &keychain,
        config(TransferKind::Export {
            destination_chain: destination,
        }),
    );
    transferer.send_outputs(&batches).await.unwrap();

    let exported = ledger.exported(destination);
    assert_eq!(exported.len(), 4);
    for recipient in &recipients {
        assert_eq!(ledger.balance(AVAX, *recipient), 0);
    }
    assert_eq!(ledger.balance(AVAX, owner), 50_000 - 4_000 - FEE);

    let tx = decode(&codec, &ledger.issued()[0]);
    match tx.unsigned {
        UnsignedTx::Export(export) => {
            assert_eq!(export.destination_chain, destination);
            assert_eq!(export.base.outs.len(), 1);
            assert_eq!(export.exported_outs, exported);
        }
        other => panic!("expected export tx, got {:?}", other),
    }
}

#[tokio::test]
async fn test_import_consumes_atomic_utxos() {
    let codec = codec();
    let (keychain, owner) = keychain(4);
    let source = Id([0x5c; 32]);
    let ledger = Ledger::new(codec.clone(), 0);
    ledger.fund_atomic(source, Id([0x11; 32]), AVAX, owner, 20_000);
    // Plain UTXOs must not be picked for an import
    ledger.fund(Id([0x01; 32]), AVAX, owner, 1_000_000, 1);

    let recipient = ShortId([0x77; 20]);
    let batches = vec![vec![TransferableOutput::pay_to(AVAX, 5_000, recipient)]];
    let transferer = Transferer::new(
        &ledger,
        &codec,
        &keychain,
        config(TransferKind::Import {
            source_chain: source,
        }),
    );
    transferer.send_outputs(&batches).await.unwrap();

    assert_eq!(ledger.atomic_count(source), 0);
    assert_eq!(ledger.balance(AVAX, recipient), 5_000);
    assert_eq!(ledger.balance(AVAX, owner), 1_000_000 + 20_000 - 5_000 - FEE);

    let tx = decode(&codec, &ledger.issued()[0]);
    match tx.unsigned {
        UnsignedTx::Import(import) => {
            assert!(import.base.ins.is_empty());
            assert_eq!(import.imported_inputs.len(), 1);
            assert_eq!(import.base.outs.len(), 2);
        }
        other => panic!("expected import tx, got {:?}", other),
    }
}

/// Tests that a refused submission stops the run without undoing earlier batches.
#[tokio::test]
async fn test_failure_aborts_remaining_batches() {
    let codec = codec();
    let (keychain, owner) = keychain(5);
    let mut ledger = Ledger::new(codec.clone(), 0);
    ledger.max_issued = Some(1);
    ledger.fund(Id([0x10; 32]), AVAX, owner, 100_000, 1);

    let first = ShortId([0x01; 20]);
    let second = ShortId([0x02; 20]);
    let batches = vec![
        vec![TransferableOutput::pay_to(AVAX, 10, first)],
        vec![TransferableOutput::pay_to(AVAX, 10, second)],
    ];
    let transferer = Transferer::new(&ledger, &codec, &keychain, config(TransferKind::Base));
    let result = transferer.send_outputs(&batches).await;

    assert!(matches!(result, Err(CoreError::Network(_))));
    assert_eq!(ledger.issued().len(), 1);
    assert_eq!(ledger.balance(AVAX, first), 10);
    assert_eq!(ledger.balance(AVAX, second), 0);
}

#[tokio::test]
async fn test_insufficient_funds_issues_nothing() {
    let codec = codec();
    let (keychain, owner) = keychain(6);
    let ledger = Ledger::new(codec.clone(), 0);
    ledger.fund(Id([0x10; 32]), AVAX, owner, 20, 2);

    let batches = vec![vec![TransferableOutput::pay_to(AVAX, 100, ShortId([0x09; 20]))]];
    let transferer = Transferer::new(&ledger, &codec, &keychain, config(TransferKind::Base));

    match transferer.send_outputs(&batches).await {
        Err(CoreError::InsufficientFunds { asset, needed, have }) => {
            assert_eq!(asset, AVAX);
            assert_eq!(needed, 100 + FEE);
            assert_eq!(have, 40);
        }
        other => panic!("expected insufficient funds, got {:?}", other),
    }
    assert!(ledger.issued().is_empty());
}

#[tokio::test]
async fn test_selection_pages_through_large_sets() {
    let codec = codec();
    let (keychain, owner) = keychain(7);
    let ledger = Ledger::new(codec.clone(), 0);
    ledger.fund(Id([0x10; 32]), AVAX, owner, 10, UTXO_PAGE_SIZE + 6);

    let batches = vec![vec![TransferableOutput::pay_to(AVAX, 9_000, ShortId([0x09; 20]))]];
    let transferer = Transferer::new(&ledger, &codec, &keychain, config(TransferKind::Base));
    transferer.send_outputs(&batches).await.unwrap();

    assert_eq!(ledger.page_requests(), 2);
    let tx = decode(&codec, &ledger.issued()[0]);
    assert_eq!(tx.unsigned.inputs().len(), 1_000);
    assert_eq!(ledger.utxo_count(owner), (UTXO_PAGE_SIZE + 6 - 1_000) as usize);
}
