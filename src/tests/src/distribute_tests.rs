//! Tests for the distribute command against the in-memory ledger.

use crate::ledger::Ledger;
use ed25519_dalek::{PublicKey, SecretKey};
use issuer_cli::config::{CliConfig, DistributionPlan, PlanKind};
use issuer_cli::{distribute, CliError};
use issuer_core::codec::DEFAULT_MAX_SIZE;
use issuer_core::formatting::format_address;
use issuer_core::keychain::address_of;
use issuer_core::{Codec, CoreError, Id, ShortId};

const ASSET: Id = Id([0x42; 32]);

fn plan(secret: [u8; 32], recipients: &[ShortId]) -> DistributionPlan {
    DistributionPlan {
        network_id: 5,
        kind: PlanKind::Base,
        chain_id: Id([0x0c; 32]).to_string(),
        chain_alias: "X".to_string(),
        destination_chain: None,
        source_chain: None,
        secret_keys: vec![hex::encode(secret)],
        recipients: recipients
            .iter()
            .map(|addr| format_address("X", "fuji", addr.as_bytes()).unwrap())
            .collect(),
        outputs_per_address: 600,
        asset_id: ASSET.to_string(),
        amount_per_output: 1,
        fee_asset_id: None,
        fee_amount: 100,
    }
}

fn fast_config() -> CliConfig {
    CliConfig {
        confirm_delay_ms: 0,
        batch_interval_ms: 0,
        ..CliConfig::default()
    }
}

/// Tests distributing to several recipients across batches.
#[tokio::test]
async fn test_distribute_plan() {
    let codec = Codec::new(DEFAULT_MAX_SIZE).unwrap();
    let secret = [0x31; 32];
    let owner = address_of(&PublicKey::from(&SecretKey::from_bytes(&secret).unwrap()));

    let ledger = Ledger::new(codec.clone(), 1);
    ledger.fund(Id([0x01; 32]), ASSET, owner, 10_000, 1);

    let recipients = vec![ShortId([0x0b; 20]), ShortId([0x0a; 20])];
    let receipts = distribute::send(&ledger, &codec, &fast_config(), &plan(secret, &recipients))
        .await
        .unwrap();

    let sent: Vec<usize> = receipts.iter().map(|r| r.num_sent).collect();
    assert_eq!(sent, vec![1000, 1200]);
    assert!(receipts[1].change_address.starts_with("X-fuji1"));
    for recipient in &recipients {
        assert_eq!(ledger.balance(ASSET, *recipient), 600);
    }
    assert_eq!(ledger.balance(ASSET, owner), 10_000 - 1_200 - 200);
}

#[tokio::test]
async fn test_duplicate_recipient_is_refused() {
    let codec = Codec::new(DEFAULT_MAX_SIZE).unwrap();
    let ledger = Ledger::new(codec.clone(), 0);
    let recipient = ShortId([0x0b; 20]);

    let result = distribute::send(
        &ledger,
        &codec,
        &fast_config(),
        &plan([0x32; 32], &[recipient, recipient]),
    )
    .await;

    assert!(matches!(
        result,
        Err(CliError::CoreError(CoreError::DuplicateAddress))
    ));
    assert!(ledger.issued().is_empty());
}

#[tokio::test]
async fn test_plan_without_keys_is_refused() {
    let codec = Codec::new(DEFAULT_MAX_SIZE).unwrap();
    let ledger = Ledger::new(codec.clone(), 0);
    let mut plan = plan([0x33; 32], &[ShortId([0x0b; 20])]);
    plan.secret_keys.clear();

    let result = distribute::send(&ledger, &codec, &fast_config(), &plan).await;
    assert!(matches!(result, Err(CliError::InvalidPlan(_))));
}
