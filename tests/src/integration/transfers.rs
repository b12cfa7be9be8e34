//! # Transfer Scenarios
//!
//! Signed single-chain envelopes moving coins between accounts:
//!
//! ```text
//! TxStd[TransferTx] ──DeliverTx──→ AccountAuthenticator (nonce + sig)
//!                                        │
//!                                        ↓
//!                          cache scope ── TransferTx::exec ── write back on success
//! ```
//!
//! ## Test Categories
//!
//! 1. **Happy Path**: sequential transfers with increasing nonces
//! 2. **Replay**: stale nonces rejected without touching balances
//! 3. **Atomicity**: failed payloads leave no writes behind
//! 4. **Binding**: signatures commit to content and origin chain

#[cfg(test)]
mod tests {
    use crate::fixtures::{genesis_state, NoteTx, TestChain, TransferTx};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::CodeType;
    use std::sync::Arc;

    const CHAIN: &str = "qbase";

    fn funded_chain(accounts: usize, coins: u64) -> (TestChain, Vec<Ed25519KeyPair>) {
        let keys: Vec<Ed25519KeyPair> = (0..accounts).map(|_| Ed25519KeyPair::generate()).collect();
        let balances: Vec<_> = keys.iter().map(|k| (k.address(), coins)).collect();
        let mut chain = TestChain::new(CHAIN);
        chain.start(genesis_state(&balances, &[]));
        (chain, keys)
    }

    // =========================================================================
    // HAPPY PATH AND REPLAY
    // =========================================================================

    #[test]
    fn test_sequential_transfers_then_stale_nonces() {
        let (mut chain, keys) = funded_chain(10, 5500);
        let sender = &keys[0];
        let receiver = keys[1].address();

        for round in 1..=9u64 {
            let nonce = round.min(5);
            let tx = chain.transfer(sender, nonce, receiver, 1000);
            let result = chain.block(&[tx]).remove(0);

            if round <= 5 {
                assert!(result.is_ok(), "round {round}: {}", result.log);
                assert_eq!(chain.coins(&sender.address()), 5500 - 1000 * round);
                assert_eq!(chain.coins(&receiver), 5500 + 1000 * round);
            } else {
                assert_eq!(
                    result.code,
                    CodeType::InvalidSequence.as_u32(),
                    "round {round}"
                );
                assert_eq!(chain.coins(&sender.address()), 500);
                assert_eq!(chain.coins(&receiver), 10500);
            }
        }

        let account = chain.account(&sender.address()).unwrap();
        assert_eq!(account.base.nonce, 5);
        assert_eq!(account.base.public_key, Some(sender.public_key()));
        for key in &keys[2..] {
            assert_eq!(chain.coins(&key.address()), 5500);
        }
    }

    #[test]
    fn test_nonce_gap_is_rejected() {
        let (mut chain, keys) = funded_chain(2, 100);

        let tx = chain.transfer(&keys[0], 2, keys[1].address(), 10);
        let result = chain.block(&[tx]).remove(0);

        assert_eq!(result.code, CodeType::InvalidSequence.as_u32());
        assert_eq!(chain.coins(&keys[0].address()), 100);
        assert_eq!(chain.account(&keys[0].address()).unwrap().base.nonce, 0);
    }

    #[test]
    fn test_several_transfers_in_one_block() {
        let (mut chain, keys) = funded_chain(3, 100);
        let txs = vec![
            chain.transfer(&keys[0], 1, keys[2].address(), 10),
            chain.transfer(&keys[1], 1, keys[2].address(), 20),
            chain.transfer(&keys[0], 2, keys[2].address(), 30),
        ];

        let results = chain.block(&txs);

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(chain.coins(&keys[0].address()), 60);
        assert_eq!(chain.coins(&keys[1].address()), 80);
        assert_eq!(chain.coins(&keys[2].address()), 160);
    }

    // =========================================================================
    // ATOMICITY
    // =========================================================================

    #[test]
    fn test_insufficient_funds_leaves_balances() {
        let (mut chain, keys) = funded_chain(2, 100);

        let tx = chain.transfer(&keys[0], 1, keys[1].address(), 101);
        let result = chain.block(&[tx]).remove(0);

        assert_eq!(result.code, CodeType::InsufficientFunds.as_u32());
        assert_eq!(chain.coins(&keys[0].address()), 100);
        assert_eq!(chain.coins(&keys[1].address()), 100);
        // Authentication ran in the block scope, so the nonce is consumed.
        assert_eq!(chain.account(&keys[0].address()).unwrap().base.nonce, 1);

        let retry = chain.transfer(&keys[0], 2, keys[1].address(), 100);
        assert!(chain.block(&[retry]).remove(0).is_ok());
        assert_eq!(chain.coins(&keys[1].address()), 200);
    }

    #[test]
    fn test_failing_payload_discards_earlier_payloads() {
        let mut chain = TestChain::new(CHAIN);
        chain.start(genesis_state(&[], &[]));
        let tx = chain.tx_std(vec![
            Arc::new(NoteTx::new("first", "kept?")),
            Arc::new(NoteTx::rejecting("second")),
        ]);
        let bytes = chain.encode(&tx);

        let result = chain.block(&[bytes]).remove(0);

        assert!(!result.is_ok());
        assert!(result.events.is_empty());
        assert_eq!(chain.note("first"), None);
        assert_eq!(chain.note("second"), None);
    }

    #[test]
    fn test_failed_tx_does_not_affect_neighbours() {
        let mut chain = TestChain::new(CHAIN);
        chain.start(genesis_state(&[], &[]));
        let bad = chain.encode(&chain.tx_std(vec![Arc::new(NoteTx::rejecting("bad"))]));
        let good = chain.encode(&chain.tx_std(vec![Arc::new(NoteTx::new("good", "yes"))]));

        let results = chain.block(&[bad, good]);

        assert!(!results[0].is_ok());
        assert!(results[1].is_ok());
        assert_eq!(chain.note("bad"), None);
        assert_eq!(chain.note("good").as_deref(), Some("yes"));
    }

    // =========================================================================
    // SIGNATURE BINDING
    // =========================================================================

    #[test]
    fn test_tampered_amount_is_unauthorized() {
        let (mut chain, keys) = funded_chain(2, 100);
        let mut tx = chain.tx_std(vec![Arc::new(TransferTx {
            from: keys[0].address(),
            to: keys[1].address(),
            amount: 1,
        })]);
        tx.add_signature(&keys[0], 1, "");
        tx.itxs = vec![Arc::new(TransferTx {
            from: keys[0].address(),
            to: keys[1].address(),
            amount: 99,
        })];
        let bytes = chain.encode(&tx);

        let result = chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(chain.coins(&keys[1].address()), 100);
        assert_eq!(chain.account(&keys[0].address()).unwrap().base.nonce, 0);
    }

    #[test]
    fn test_missing_signature_is_unauthorized() {
        let (mut chain, keys) = funded_chain(2, 100);
        let tx = chain.tx_std(vec![Arc::new(TransferTx {
            from: keys[0].address(),
            to: keys[1].address(),
            amount: 1,
        })]);
        let bytes = chain.encode(&tx);

        let result = chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(chain.coins(&keys[0].address()), 100);
    }

    #[test]
    fn test_signature_for_another_origin_fails_locally() {
        let (mut chain, keys) = funded_chain(2, 100);
        let mut tx = chain.tx_std(vec![Arc::new(TransferTx {
            from: keys[0].address(),
            to: keys[1].address(),
            amount: 1,
        })]);
        tx.add_signature(&keys[0], 1, "qstar");
        let bytes = chain.encode(&tx);

        let result = chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(chain.coins(&keys[1].address()), 100);
    }
}
