//! End-to-end integration tests across both domains.
//!
//! These tests exercise the full transfer lifecycle:
//! Source (append, commit) -> Relay -> Destination (root, withdrawals,
//! bonded settlement)
//!
//! They verify that the pieces work together in realistic scenarios:
//! direct withdrawals, replay, forged proofs, bonded advances settled after
//! the fact, root exhaustion, unordered at-least-once delivery, and
//! serialized concurrent access.

use bondbridge_merkle::transfer_proof;
use bondbridge_settlement::{
    BonderBalance, DestinationBridge, InMemoryPayouts, LedgerExecutor,
};
use bondbridge_source::{InMemoryRelay, SourceBridge};
use bondbridge_types::*;
use ed25519_dalek::SigningKey;
use rand::seq::SliceRandom;

const SRC: DomainId = DomainId(1);
const DEST: DomainId = DomainId(2);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Helper: both domains wired through an in-memory relay.
struct BridgePipeline {
    source: SourceBridge<InMemoryRelay>,
    dest: DestinationBridge<InMemoryPayouts>,
    bonder_key: SigningKey,
    relayer: AccountId,
}

impl BridgePipeline {
    fn new() -> Self {
        init_tracing();
        let bonder_key = SigningKey::from_bytes(&[42u8; 32]);
        let dest_config = DestinationConfig {
            domain_id: DEST,
            bonder: BonderConfig::new(AccountId([0xB0; 32]), &bonder_key.verifying_key()),
        };
        Self {
            source: SourceBridge::new(SourceConfig::new(SRC, vec![DEST]), InMemoryRelay::new())
                .unwrap(),
            dest: DestinationBridge::new(dest_config, InMemoryPayouts::new()).unwrap(),
            bonder_key,
            relayer: AccountId([0xEE; 32]),
        }
    }

    fn send(&mut self, amount: u128) -> Transfer {
        let transfer = Transfer::dummy(DEST, amount);
        self.source.append(&transfer).unwrap();
        transfer
    }

    fn commit(&mut self) -> CommitmentEvent {
        self.source.commit(DEST).unwrap()
    }

    /// Deliver every payload in flight, oldest first.
    fn deliver_all(&mut self) -> Vec<Result<RootHash>> {
        self.source
            .relay_mut()
            .drain_for(DEST)
            .into_iter()
            .map(|msg| self.dest.receive_commitment(&msg.payload))
            .collect()
    }

    fn withdraw(&mut self, event: &CommitmentEvent, transfer: &Transfer) -> Result<TransferId> {
        let index = event.position(&transfer.id()).unwrap();
        let proof = transfer_proof(&event.transfer_ids, index).unwrap();
        self.dest
            .withdraw_direct(transfer, event.root, &proof, &self.relayer)
    }

    fn bond(&mut self, transfer: &Transfer) -> Result<TransferId> {
        let request = BondRequest::new(transfer.clone()).sign(&self.bonder_key);
        self.dest.bond_withdrawal(&request)
    }
}

// =========================================================================
// Scenario A: commit, deliver, withdraw, replay
// =========================================================================

#[test]
fn direct_withdrawal_then_replay_is_rejected() {
    let mut p = BridgePipeline::new();
    let transfers: Vec<Transfer> = (0..3).map(|_| p.send(300)).collect();
    let event = p.commit();
    assert_eq!(event.amount, 900);

    let delivered = p.deliver_all();
    assert_eq!(delivered, vec![Ok(event.root)]);
    assert_eq!(p.dest.get_root(&event.root).total, 900);

    let id = p.withdraw(&event, &transfers[0]).unwrap();
    assert_eq!(id, transfers[0].id());
    assert_eq!(p.dest.get_root(&event.root).amount_withdrawn, 300);
    assert_eq!(p.dest.payouts().balance(&transfers[0].recipient), 300);

    let err = p.withdraw(&event, &transfers[0]).unwrap_err();
    assert_eq!(err, BridgeError::AlreadySpent(id));
    assert_eq!(p.dest.get_root(&event.root).amount_withdrawn, 300);
    assert_eq!(p.dest.payouts().balance(&transfers[0].recipient), 300);
}

// =========================================================================
// Scenario B: proof against a different root
// =========================================================================

#[test]
fn proof_from_another_batch_is_invalid() {
    let mut p = BridgePipeline::new();
    let first = p.send(100);
    let first_event = p.commit();
    let _second = p.send(200);
    let second_event = p.commit();
    p.deliver_all();

    // Honest proof for `first`, claimed against the second root.
    let proof = transfer_proof(&first_event.transfer_ids, 0).unwrap();
    let err = p
        .dest
        .withdraw_direct(&first, second_event.root, &proof, &p.relayer)
        .unwrap_err();
    assert_eq!(err, BridgeError::InvalidProof(first.id()));

    assert_eq!(p.dest.get_root(&second_event.root).amount_withdrawn, 0);
    assert_eq!(p.dest.get_root(&first_event.root).amount_withdrawn, 0);
    assert!(!p.dest.is_transfer_spent(&first.id()));
    assert_eq!(p.dest.payouts().total_paid(), 0);
}

// =========================================================================
// Scenario C: bond before the root exists, settle after it arrives
// =========================================================================

#[test]
fn bond_before_root_then_settle_restores_bonder() {
    let mut p = BridgePipeline::new();
    p.dest.stake(2_000).unwrap();
    let before = p.dest.bonder_balance();

    let transfer = p.send(500);
    let event = p.commit();

    // Root still in flight.
    let id = p.bond(&transfer).unwrap();
    assert_eq!(p.dest.get_bonded_amount(&id), 500);
    assert_eq!(
        p.dest.bonder_balance(),
        BonderBalance {
            credit: 2_000,
            debit: 500
        }
    );
    assert_eq!(p.dest.payouts().balance(&transfer.recipient), 500);
    assert_eq!(
        p.dest.settle_bonded_batch(&event.transfer_ids),
        Err(BridgeError::RootNotFound(event.root))
    );

    p.deliver_all();
    assert_eq!(p.dest.settle_bonded_batch(&event.transfer_ids), Ok(event.root));

    assert_eq!(p.dest.get_bonded_amount(&id), 0);
    assert_eq!(p.dest.get_root(&event.root).amount_withdrawn, 500);
    let after = p.dest.bonder_balance();
    assert_eq!(after.credit, before.credit + 500);
    assert_eq!(after.available(), before.available());
    p.dest.verify_conservation().unwrap();

    // The bonded transfer cannot also be withdrawn directly.
    assert_eq!(
        p.withdraw(&event, &transfer),
        Err(BridgeError::AlreadySpent(id))
    );
}

// =========================================================================
// Scenario D: root exhaustion
// =========================================================================

#[test]
fn withdrawals_stop_at_root_total() {
    let mut p = BridgePipeline::new();
    let a = p.send(300);
    let b = p.send(200);
    let c = p.send(1);
    let event = p.commit();

    // The destination trusts the committed total; record one that covers
    // only the first two transfers.
    p.source.relay_mut().drain_for(DEST);
    p.dest.set_total(event.root, 500).unwrap();

    p.withdraw(&event, &a).unwrap();
    p.withdraw(&event, &b).unwrap();
    assert!(p.dest.get_root(&event.root).is_exhausted());

    let err = p.withdraw(&event, &c).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::WithdrawalExceedsTotal {
            total: 500,
            withdrawn: 500,
            requested: 1,
            ..
        }
    ));
    assert!(!p.dest.is_transfer_spent(&c.id()));
    assert_eq!(p.dest.available_to_withdraw(&event.root), 0);
}

// =========================================================================
// Relay delivery semantics
// =========================================================================

#[test]
fn out_of_order_and_repeated_delivery() {
    let mut p = BridgePipeline::new();
    let a = p.send(10);
    let first = p.commit();
    let b = p.send(20);
    let second = p.commit();

    // Newest first, then the oldest twice.
    let newest = p.source.relay_mut().pop_newest().unwrap();
    let oldest = *p.source.relay().peek(0).unwrap();
    assert_eq!(p.dest.receive_commitment(&newest.payload), Ok(second.root));
    assert_eq!(p.dest.receive_commitment(&oldest.payload), Ok(first.root));
    assert_eq!(
        p.dest.receive_commitment(&oldest.payload),
        Err(BridgeError::RootAlreadySet(first.root))
    );
    assert_eq!(p.dest.get_root(&first.root).total, 10);

    p.withdraw(&first, &a).unwrap();
    p.withdraw(&second, &b).unwrap();
    p.dest.verify_conservation().unwrap();
}

#[test]
fn empty_commit_is_rejected_at_destination() {
    let mut p = BridgePipeline::new();
    let event = p.commit();
    assert!(event.is_degenerate());
    assert_eq!(p.deliver_all(), vec![Err(BridgeError::ZeroTotal)]);
    assert!(!p.dest.get_root(&event.root).is_set());
}

// =========================================================================
// Mixed paths and invariants
// =========================================================================

#[test]
fn mixed_bonded_and_direct_exhaust_root_exactly() {
    let mut p = BridgePipeline::new();
    p.dest.stake(1_000).unwrap();
    let transfers: Vec<Transfer> = [400, 250, 350].into_iter().map(|a| p.send(a)).collect();
    let event = p.commit();

    p.bond(&transfers[1]).unwrap();
    p.deliver_all();
    p.withdraw(&event, &transfers[0]).unwrap();
    p.withdraw(&event, &transfers[2]).unwrap();
    p.dest.settle_bonded_batch(&event.transfer_ids).unwrap();

    let root = p.dest.get_root(&event.root);
    assert_eq!(root.amount_withdrawn, 1_000);
    assert!(root.is_exhausted());
    assert_eq!(p.dest.bonder_balance().available(), 1_000);
    p.dest.verify_conservation().unwrap();
}

#[test]
fn bonder_cannot_overextend() {
    let mut p = BridgePipeline::new();
    p.dest.stake(600).unwrap();
    let a = p.send(400);
    let b = p.send(300);
    p.commit();

    p.bond(&a).unwrap();
    assert!(matches!(
        p.bond(&b),
        Err(BridgeError::InsufficientBonderBalance {
            credit: 600,
            debit: 400,
            requested: 300
        })
    ));
    assert_eq!(p.dest.get_bonded_amount(&b.id()), 0);
    assert_eq!(p.dest.payouts().balance(&b.recipient), 0);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Direct(usize),
    Bond(usize),
    Settle,
}

#[test]
fn root_bound_holds_under_any_interleaving() {
    let mut rng = rand::thread_rng();
    for _ in 0..64 {
        let mut p = BridgePipeline::new();
        p.dest.stake(10_000).unwrap();
        let transfers: Vec<Transfer> = [100, 200, 300, 400].into_iter().map(|a| p.send(a)).collect();
        let event = p.commit();
        p.source.relay_mut().drain_for(DEST);
        // Understated total: not every transfer can be paid.
        p.dest.set_total(event.root, 600).unwrap();

        let mut steps: Vec<Step> = (0..4)
            .flat_map(|i| [Step::Direct(i), Step::Bond(i)])
            .chain([Step::Settle, Step::Settle])
            .collect();
        steps.shuffle(&mut rng);

        for step in steps {
            let _ = match step {
                Step::Direct(i) => p.withdraw(&event, &transfers[i]).map(|_| ()),
                Step::Bond(i) => p.bond(&transfers[i]).map(|_| ()),
                Step::Settle => p.dest.settle_bonded_batch(&event.transfer_ids).map(|_| ()),
            };
            let root = p.dest.get_root(&event.root);
            assert!(root.amount_withdrawn <= root.total, "{step:?} broke the root bound");
            p.dest.verify_conservation().unwrap();
        }

        // Every transfer paid at most once.
        for t in &transfers {
            let paid = p.dest.payouts().balance(&t.recipient);
            assert!(paid == 0 || paid == t.amount, "{} paid {paid}", t.id());
        }
    }
}

// =========================================================================
// Serialized concurrent access
// =========================================================================

#[tokio::test]
async fn concurrent_withdrawals_pay_once() {
    let mut p = BridgePipeline::new();
    let transfer = p.send(300);
    let event = p.commit();
    p.deliver_all();

    let relayer = p.relayer;
    let (exec, task) = LedgerExecutor::spawn(p.dest);
    let proof = transfer_proof(&event.transfer_ids, 0).unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let exec = exec.clone();
        let transfer = transfer.clone();
        let proof = proof.clone();
        let root = event.root;
        handles.push(tokio::spawn(async move {
            exec.run(move |dest| dest.withdraw_direct(&transfer, root, &proof, &relayer))
                .await
        }));
    }

    let mut paid = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => paid += 1,
            Err(err) => assert_eq!(err, BridgeError::AlreadySpent(transfer.id())),
        }
    }
    assert_eq!(paid, 1);

    drop(exec);
    let dest = task.await.unwrap();
    assert_eq!(dest.payouts().balance(&transfer.recipient), 300);
    assert_eq!(dest.get_root(&event.root).amount_withdrawn, 300);
}

#[tokio::test]
async fn executor_orders_bond_and_settlement() {
    let mut p = BridgePipeline::new();
    let transfer = p.send(500);
    let event = p.commit();
    let payload = p.source.relay_mut().pop_oldest().unwrap().payload;
    let request = BondRequest::new(transfer.clone()).sign(&p.bonder_key);

    let (exec, task) = LedgerExecutor::spawn(p.dest);
    exec.run(|dest| dest.stake(500)).await.unwrap();
    exec.run(move |dest| dest.bond_withdrawal(&request)).await.unwrap();
    exec.run(move |dest| dest.receive_commitment(&payload)).await.unwrap();
    let ids = event.transfer_ids.clone();
    exec.run(move |dest| dest.settle_bonded_batch(&ids)).await.unwrap();

    let balance = exec.execute(|dest| dest.bonder_balance()).await.unwrap();
    assert_eq!(balance.available(), 500);

    drop(exec);
    let dest = task.await.unwrap();
    dest.verify_conservation().unwrap();
}
