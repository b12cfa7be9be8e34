//! # Outbound Cross-Chain Scenarios
//!
//! Payloads on `qbase` emitting messages for other chains:
//!
//! ```text
//! TxStd[SendTx] ──exec──→ TxQcp skeleton (to, TxStd)
//!                               │ from, height, tx index, is_result filled
//!                               ↓
//!             sequence/out/<to> += 1, signed, tx/out/<to>/<seq> archived
//!                               │
//!                               ↓
//!                     message event (qcp-to, qcp-sequence, qcp-hash)
//! ```
//!
//! ## Test Categories
//!
//! 1. **Allocation**: per-destination, gap-free, starting at 1
//! 2. **Archive**: stored messages carry routing data and signature
//! 3. **Atomicity**: a failed envelope allocates nothing

#[cfg(test)]
mod tests {
    use crate::fixtures::{genesis_state, NoteTx, SendTx, TestChain};
    use qb_05_qcp::{gen_qcp_tx_hash, ATTRIBUTE_KEY_MODULE, EVENT_MODULE, SEQUENCE, TO};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::CodeType;
    use std::sync::Arc;

    const LOCAL: &str = "qbase";

    fn signed_chain() -> (TestChain, Ed25519KeyPair) {
        let signer = Ed25519KeyPair::generate();
        let mut chain = TestChain::with_signer(LOCAL, &signer);
        chain.start(genesis_state(&[], &[]));
        (chain, signer)
    }

    fn send(chain: &TestChain, to: &str, key: &str) -> Vec<u8> {
        chain.encode(&chain.tx_std(vec![Arc::new(SendTx::new(to, key, "hello"))]))
    }

    // =========================================================================
    // ALLOCATION
    // =========================================================================

    #[test]
    fn test_sequences_are_allocated_in_order() {
        let (mut chain, signer) = signed_chain();
        let txs: Vec<Vec<u8>> = (1..=3).map(|i| send(&chain, "qstar", &format!("n{i}"))).collect();

        let results = chain.block(&txs);

        assert_eq!(chain.out_sequence("qstar"), 3);
        for (i, result) in results.iter().enumerate() {
            let seq = i as u64 + 1;
            assert!(result.is_ok(), "{}", result.log);

            let event = result
                .events
                .iter()
                .find(|e| e.attribute(ATTRIBUTE_KEY_MODULE) == Some(EVENT_MODULE.as_bytes()))
                .expect("qcp message event");
            assert_eq!(event.attribute(TO), Some(&b"qstar"[..]));
            assert_eq!(event.attribute(SEQUENCE), Some(seq.to_string().as_bytes()));

            let out = chain.out_tx("qstar", seq).expect("archived");
            assert_eq!(out.sequence, seq);
            assert_eq!(out.from, LOCAL);
            assert_eq!(out.to, "qstar");
            assert_eq!(out.tx_std.chain_id, "qstar");
            assert_eq!(out.block_height, 2);
            assert_eq!(out.tx_index, i as i64);
            assert!(!out.is_result);
            assert!(out.verify_signature(&signer.public_key()).is_ok());
            assert_eq!(
                event.attribute("qcp-hash"),
                Some(gen_qcp_tx_hash(&out).as_bytes())
            );
        }
        assert!(chain.out_tx("qstar", 4).is_none());
    }

    #[test]
    fn test_destinations_have_independent_counters() {
        let (mut chain, _) = signed_chain();
        let txs = vec![
            send(&chain, "qstar", "a"),
            send(&chain, "qmoon", "b"),
            send(&chain, "qstar", "c"),
        ];

        chain.block(&txs);
        let later = send(&chain, "qmoon", "d");
        chain.block(&[later]);

        assert_eq!(chain.out_sequence("qstar"), 2);
        assert_eq!(chain.out_sequence("qmoon"), 2);
        assert_eq!(chain.out_tx("qmoon", 2).unwrap().block_height, 3);
    }

    #[test]
    fn test_check_tx_allocates_nothing() {
        let (mut chain, _) = signed_chain();
        let tx = send(&chain, "qstar", "a");

        assert!(chain.check(&tx).is_ok());
        chain.block(&[]);

        assert_eq!(chain.out_sequence("qstar"), 0);
        assert!(chain.out_tx("qstar", 1).is_none());
    }

    // =========================================================================
    // ATOMICITY AND VALIDATION
    // =========================================================================

    #[test]
    fn test_failed_envelope_rolls_back_allocation() {
        let (mut chain, _) = signed_chain();
        let tx = chain.tx_std(vec![
            Arc::new(SendTx::new("qstar", "a", "hello")),
            Arc::new(NoteTx::rejecting("b")),
        ]);
        let bytes = chain.encode(&tx);

        let result = chain.block(&[bytes]).remove(0);

        assert!(!result.is_ok());
        assert_eq!(chain.out_sequence("qstar"), 0);
        assert!(chain.out_tx("qstar", 1).is_none());

        let retry = send(&chain, "qstar", "a");
        chain.block(&[retry]);
        assert_eq!(chain.out_sequence("qstar"), 1);
    }

    #[test]
    fn test_send_to_self_is_rejected() {
        let (mut chain, _) = signed_chain();
        let tx = send(&chain, LOCAL, "a");

        assert_eq!(chain.check(&tx).code, CodeType::TxDecode.as_u32());
        let result = chain.block(&[tx]).remove(0);

        assert_eq!(result.code, CodeType::TxDecode.as_u32());
        assert_eq!(chain.out_sequence(LOCAL), 0);
    }

    #[test]
    fn test_without_signer_messages_are_archived_unsigned() {
        let mut chain = TestChain::new(LOCAL);
        chain.start(genesis_state(&[], &[]));
        let tx = send(&chain, "qstar", "a");

        let result = chain.block(&[tx]).remove(0);

        assert!(result.is_ok(), "{}", result.log);
        let out = chain.out_tx("qstar", 1).unwrap();
        assert!(out.sig.signature.is_empty());
        assert!(out.sig.pubkey.is_none());
    }
}
