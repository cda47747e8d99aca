//! End-to-end scenarios for the ledger and the validation workflow.

use std::sync::Arc;

use serde_json::json;

use deepchain::store::{MemoryStore, RecordKey, RecordStore, SqliteStore};
use deepchain::{
    Block, ChainReport, ConfirmOutcome, Keypair, Ledger, Notary, ValidationRequest, GENESIS_BODY,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn fresh_ledger() -> (Arc<MemoryStore>, Ledger<MemoryStore>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::open(store.clone()).await.unwrap();
    (store, ledger)
}

/// Rewrite a stored block in place, bypassing the ledger.
async fn tamper_block<S, F>(store: &S, height: u64, mutate: F)
where
    S: RecordStore,
    F: FnOnce(&mut Block),
{
    let bytes = store.get(&RecordKey::Height(height)).await.unwrap();
    let mut block: Block = serde_json::from_slice(&bytes).unwrap();
    mutate(&mut block);
    store
        .put(&RecordKey::Height(height), &serde_json::to_vec(&block).unwrap())
        .await
        .unwrap();
}

// ─────────────────────────────────────────────────────────────────────────
// Chain scenarios
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_on_empty_store_produces_height_zero() {
    // A bare ledger without the automatic genesis: the first append IS
    // the genesis block.
    let ledger = Ledger::new(Arc::new(MemoryStore::new()));

    let a = ledger.append(json!("A")).await.unwrap();
    assert_eq!(a.height, 0);
    assert_eq!(a.previous_hash, "");

    let b = ledger.append(json!("B")).await.unwrap();
    let c = ledger.append(json!("C")).await.unwrap();
    assert_eq!(b.height, 1);
    assert_eq!(c.height, 2);

    let block0 = ledger.block_at(0).await.unwrap();
    let block1 = ledger.block_at(1).await.unwrap();
    assert_eq!(block1.previous_hash, block0.hash);

    assert_eq!(ledger.validate().await.unwrap(), ChainReport::NoErrors);
}

#[tokio::test]
async fn genesis_created_once_and_only_once() {
    let (store, ledger) = fresh_ledger().await;
    assert_eq!(ledger.height().await.unwrap(), 0);
    assert_eq!(ledger.block_at(0).await.unwrap().body, json!(GENESIS_BODY));

    ledger.append(json!("payload")).await.unwrap();

    // Reopening over the populated store must not re-create genesis.
    let reopened = Ledger::open(store).await.unwrap();
    assert_eq!(reopened.height().await.unwrap(), 1);
    assert_eq!(reopened.block_at(0).await.unwrap().body, json!(GENESIS_BODY));
}

#[tokio::test]
async fn every_link_holds_after_appends() {
    let (_store, ledger) = fresh_ledger().await;
    for i in 0..5 {
        ledger.append(json!(format!("payload {i}"))).await.unwrap();
    }

    let height = ledger.height().await.unwrap() as u64;
    for i in 1..=height {
        let prev = ledger.block_at(i - 1).await.unwrap();
        let curr = ledger.block_at(i).await.unwrap();
        assert_eq!(curr.previous_hash, prev.hash, "link broken at {i}");
    }

    let chain = ledger.blocks().await.unwrap();
    assert_eq!(chain.len(), height as usize + 1);
}

#[tokio::test]
async fn untampered_chains_validate_clean() {
    let (_store, ledger) = fresh_ledger().await;
    for _ in 0..8 {
        let body = json!({ "value": rand::random::<u32>() });
        ledger.append(body).await.unwrap();
    }

    let report = ledger.validate().await.unwrap();
    assert!(report.is_clean());
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!(["No errors detected"])
    );
}

#[tokio::test]
async fn tampered_body_fails_integrity_pass() {
    let (store, ledger) = fresh_ledger().await;
    for i in 0..4 {
        ledger.append(json!(format!("payload {i}"))).await.unwrap();
    }

    tamper_block(store.as_ref(), 2, |block| {
        block.body = json!("induced corruption");
    })
    .await;

    let report = ledger.validate().await.unwrap();
    assert_eq!(report.faulty_heights(), &[2]);
}

#[tokio::test]
async fn tampered_hash_fails_link_pass_at_earlier_index() {
    let (store, ledger) = fresh_ledger().await;
    for i in 0..4 {
        ledger.append(json!(format!("payload {i}"))).await.unwrap();
    }

    // Overwrite block 1's hash without touching block 2's previousHash:
    // the link pass flags height 1, and so does the integrity pass; the
    // union still reports the single height.
    tamper_block(store.as_ref(), 1, |block| {
        block.hash = "00".repeat(32);
    })
    .await;

    let report = ledger.validate().await.unwrap();
    assert!(report.faulty_heights().contains(&1));
    assert!(!report.faulty_heights().contains(&0));
}

#[tokio::test]
async fn missing_block_is_a_fault_not_an_abort() {
    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::new(store.clone());
    for i in 0..3 {
        ledger.append(json!(format!("payload {i}"))).await.unwrap();
    }

    // Simulate a lost record by overwriting height 1 with garbage that no
    // longer decodes as a block.
    store
        .put(&RecordKey::Height(1), b"not a block")
        .await
        .unwrap();

    let report = ledger.validate().await.unwrap();
    assert!(report.faulty_heights().contains(&1));
    // Heights around the damage are still validated.
    assert!(!report.faulty_heights().contains(&2));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_appends_never_share_a_height() {
    let (_store, ledger) = fresh_ledger().await;
    let ledger = Arc::new(ledger);

    let mut handles = Vec::new();
    for i in 0..8 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.append(json!(format!("task {i}"))).await.unwrap().height
        }));
    }

    let mut heights = Vec::new();
    for handle in handles {
        heights.push(handle.await.unwrap());
    }
    heights.sort_unstable();

    // Genesis is height 0; the eight appends take exactly 1..=8.
    assert_eq!(heights, (1..=8).collect::<Vec<u64>>());
    assert!(ledger.validate().await.unwrap().is_clean());
}

#[tokio::test]
async fn sqlite_chain_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chaindata.db");

    let appended = {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let ledger = Ledger::open(store).await.unwrap();
        ledger.append(json!({"star": {"ra": "16h 29m"}})).await.unwrap()
    };

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let ledger = Ledger::open(store).await.unwrap();

    assert_eq!(ledger.height().await.unwrap(), 1);
    assert_eq!(ledger.block_at(1).await.unwrap(), appended);
    assert!(ledger.validate().await.unwrap().is_clean());
}

#[tokio::test]
async fn decimal_address_never_disturbs_chain_height() {
    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::open(store.clone()).await.unwrap();
    let notary = Notary::new(store);

    ledger.append(json!("payload")).await.unwrap();
    assert_eq!(ledger.height().await.unwrap(), 1);

    // An address that is itself a decimal string lands in the request key
    // space, not the chain key space.
    let request = notary.create_or_refresh("5").await.unwrap();
    assert_eq!(request.address, "5");

    assert_eq!(ledger.height().await.unwrap(), 1);
    let next = ledger.append(json!("next")).await.unwrap();
    assert_eq!(next.height, 2);
    assert!(ledger.validate().await.unwrap().is_clean());
}

// ─────────────────────────────────────────────────────────────────────────
// Validation-request scenarios
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resubmit_before_expiry_refreshes_request() {
    let store = Arc::new(MemoryStore::new());
    let notary = Notary::new(store);

    let first = notary.create_or_refresh("addr1").await.unwrap();
    let second = notary.create_or_refresh("addr1").await.unwrap();

    assert_eq!(second.address, "addr1");
    assert!(
        second.request_time_stamp.parse::<i64>().unwrap()
            >= first.request_time_stamp.parse::<i64>().unwrap()
    );
    assert_eq!(
        second.message,
        format!("addr1:{}:starRegistry", second.request_time_stamp)
    );
    // The window restarts from the remaining time, never above the default.
    assert!(second.validation_window <= first.validation_window);
}

#[tokio::test]
async fn resubmit_after_expiry_invalidates_request() {
    let store = Arc::new(MemoryStore::new());
    let notary = Notary::new(store.clone());

    // Store a request whose one-second window elapsed long ago.
    let mut stale = ValidationRequest::new("addr1");
    stale.validation_window = 1;
    stale.request_time_stamp = "1532296090".to_string();
    store
        .put(
            &RecordKey::Address("addr1".to_string()),
            &serde_json::to_vec(&stale).unwrap(),
        )
        .await
        .unwrap();

    let result = notary.create_or_refresh("addr1").await.unwrap();
    assert_eq!(result.address, "");

    // The invalidated record now reads as absent, so the next request
    // starts a fresh window.
    let renewed = notary.create_or_refresh("addr1").await.unwrap();
    assert_eq!(renewed.address, "addr1");
    assert_eq!(renewed.validation_window, 300);
}

#[tokio::test]
async fn confirm_expired_request_reports_expiry() {
    let store = Arc::new(MemoryStore::new());
    let notary = Notary::new(store.clone());

    let keypair = Keypair::generate();
    let address = keypair.address();

    let mut stale = ValidationRequest::new(&address);
    stale.validation_window = 1;
    stale.request_time_stamp = "1532296090".to_string();
    store
        .put(
            &RecordKey::Address(address.clone()),
            &serde_json::to_vec(&stale).unwrap(),
        )
        .await
        .unwrap();

    let signature = keypair.sign(&stale.message);
    let outcome = notary.confirm(&address, &signature.to_hex()).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Expired);
}

// ─────────────────────────────────────────────────────────────────────────
// Full workflow
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_sign_confirm_then_append() {
    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::open(store.clone()).await.unwrap();
    let notary = Notary::new(store);

    let keypair = Keypair::generate();
    let address = keypair.address();

    let request = notary.create_or_refresh(&address).await.unwrap();
    let signature = keypair.sign(&request.message);

    let outcome = notary.confirm(&address, &signature.to_hex()).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Confirmed(_)));

    let body = json!({ "address": address, "star": { "dec": "68d", "ra": "16h" } });
    let block = ledger.append(body).await.unwrap();
    assert_eq!(block.height, 1);

    // The request record shares the store with the chain but never
    // disturbs the derived height.
    assert_eq!(ledger.height().await.unwrap(), 1);
    assert!(ledger.validate().await.unwrap().is_clean());
}
