//! # Lifecycle Scenarios
//!
//! Genesis, mempool admission and restarts over a shared database:
//!
//! ```text
//! InitChain ──→ Commit(v1) ──→ [BeginBlock → DeliverTx* → EndBlock → Commit]*
//!                   │                                        │
//!                   ↓                                        ↓
//!            check lineage (CheckTx)              check lineage rebuilt
//!
//! restart: BaseApp::new over the same MemDb → load_latest_version / load_version
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::{genesis_state, NoteTx, TestChain};
    use qb_08_baseabci::{AppError, RequestInitChain, RequestQuery};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::CodeType;
    use std::sync::Arc;

    const LOCAL: &str = "qbase";

    // =========================================================================
    // GENESIS
    // =========================================================================

    #[test]
    fn test_genesis_accounts_are_committed_as_version_one() {
        let keys: Vec<Ed25519KeyPair> = (0..3).map(|_| Ed25519KeyPair::generate()).collect();
        let balances: Vec<_> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.address(), 100 * (i as u64 + 1)))
            .collect();
        let mut chain = TestChain::new(LOCAL);

        chain.start(genesis_state(&balances, &[]));

        assert_eq!(chain.height(), 1);
        assert_eq!(chain.app.info().last_block_height, 1);
        for (addr, coins) in &balances {
            let account = chain.account(addr).unwrap();
            assert_eq!(account.coins, *coins);
            assert_eq!(account.base.nonce, 0);
            assert!(account.base.public_key.is_none());
        }
    }

    #[test]
    fn test_genesis_registers_trusted_relayer() {
        let relayer = Ed25519KeyPair::generate();
        let mut chain = TestChain::new(LOCAL);
        chain.start(genesis_state(&[], &[("qstar", &relayer.public_key())]));

        let res = chain.app.query(RequestQuery {
            path: "/store/qcp/key".into(),
            data: qb_05_qcp::build_in_pubkey_key("qstar"),
            height: 0,
        });

        assert!(res.is_ok(), "{}", res.log);
        assert!(!res.value.is_empty());
    }

    #[test]
    fn test_bad_genesis_account_fails_init_chain() {
        let mut chain = TestChain::new(LOCAL);
        chain.app.load_latest_version().unwrap();
        let app_state = serde_json::json!({
            "accounts": [{ "address": "not-hex", "coins": 1 }]
        });

        let res = chain.app.init_chain(RequestInitChain {
            chain_id: LOCAL.into(),
            app_state_bytes: serde_json::to_vec(&app_state).unwrap(),
            ..Default::default()
        });

        assert!(matches!(res, Err(AppError::InitChain(msg)) if msg.contains("not-hex")));
    }

    // =========================================================================
    // CHECK LINEAGE
    // =========================================================================

    #[test]
    fn test_check_tx_never_touches_committed_state() {
        let sender = Ed25519KeyPair::generate();
        let receiver = Ed25519KeyPair::generate().address();
        let mut chain = TestChain::new(LOCAL);
        chain.start(genesis_state(&[(sender.address(), 100)], &[]));
        let first = chain.transfer(&sender, 1, receiver, 10);

        assert!(chain.check(&first).is_ok());
        // The check lineage already consumed nonce 1.
        assert_eq!(chain.check(&first).code, CodeType::InvalidSequence.as_u32());
        let second = chain.transfer(&sender, 2, receiver, 10);
        assert!(chain.check(&second).is_ok());

        chain.block(&[]);
        assert_eq!(chain.coins(&sender.address()), 100);
        assert_eq!(chain.account(&sender.address()).unwrap().base.nonce, 0);

        // Commit rebuilt the check lineage from committed state.
        assert!(chain.check(&first).is_ok());
        assert!(chain.block(&[first]).remove(0).is_ok());
        assert_eq!(chain.coins(&receiver), 10);
        assert!(chain.check(&second).is_ok());
    }

    #[test]
    fn test_check_tx_rejects_what_delivery_rejects() {
        let mut chain = TestChain::new(LOCAL);
        chain.start(genesis_state(&[], &[]));
        let empty_key = chain.encode(&chain.tx_std(vec![Arc::new(NoteTx::new("", "x"))]));

        assert_eq!(chain.check(&empty_key).code, CodeType::TxDecode.as_u32());
        assert_eq!(chain.check(b"not a transaction").code, CodeType::TxDecode.as_u32());
    }

    // =========================================================================
    // RESTART
    // =========================================================================

    fn chain_with_three_blocks() -> (TestChain, Vec<Vec<u8>>) {
        let mut chain = TestChain::new(LOCAL);
        chain.start(genesis_state(&[], &[]));
        let mut hashes = vec![chain.app.last_commit_id().hash.to_vec()];
        for i in 0..3 {
            let tx = chain.encode(&chain.tx_std(vec![Arc::new(NoteTx::new(
                "counter",
                &i.to_string(),
            ))]));
            assert!(chain.block(&[tx]).remove(0).is_ok());
            hashes.push(chain.app.last_commit_id().hash.to_vec());
        }
        (chain, hashes)
    }

    #[test]
    fn test_restart_loads_latest_version() {
        let (chain, hashes) = chain_with_three_blocks();
        assert_eq!(chain.height(), 4);

        let mut restarted = TestChain::with_db(LOCAL, chain.db(), None);
        restarted.app.load_latest_version().unwrap();

        assert_eq!(restarted.height(), 4);
        assert_eq!(restarted.app.last_commit_id(), chain.app.last_commit_id());
        assert_eq!(restarted.app.info().last_block_app_hash, hashes[3]);
        assert_eq!(restarted.note("counter").as_deref(), Some("2"));

        let tx = restarted.encode(&restarted.tx_std(vec![Arc::new(NoteTx::new("counter", "3"))]));
        assert!(restarted.block(&[tx]).remove(0).is_ok());
        assert_eq!(restarted.height(), 5);
        assert_eq!(restarted.note("counter").as_deref(), Some("3"));
    }

    #[test]
    fn test_restart_at_earlier_version() {
        let (chain, hashes) = chain_with_three_blocks();

        let mut restarted = TestChain::with_db(LOCAL, chain.db(), None);
        restarted.app.load_version(2).unwrap();

        assert_eq!(restarted.height(), 2);
        assert_eq!(restarted.app.info().last_block_app_hash, hashes[1]);
        assert_eq!(restarted.note("counter").as_deref(), Some("0"));
    }

    #[test]
    fn test_identical_histories_share_app_hash() {
        let (a, hashes_a) = chain_with_three_blocks();
        let (b, hashes_b) = chain_with_three_blocks();

        assert_eq!(hashes_a, hashes_b);
        assert_eq!(a.app.last_commit_id(), b.app.last_commit_id());
        assert_ne!(hashes_a[0], hashes_a[1]);
    }

    #[test]
    fn test_loading_unknown_version_fails() {
        let (chain, _) = chain_with_three_blocks();
        let mut restarted = TestChain::with_db(LOCAL, chain.db(), None);

        assert!(restarted.app.load_version(9).is_err());
    }
}
