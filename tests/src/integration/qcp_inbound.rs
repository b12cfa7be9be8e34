//! # Inbound Cross-Chain Scenarios
//!
//! Messages relayed from `qstar` into `qbase`:
//!
//! ```text
//! qstar relayer ──TxQcp(seq n)──→ [qbase DeliverTx]
//!                                    │ seq == in + 1, trusted signature
//!                                    ↓
//!                            in sequence = n (block scope)
//!                                    │
//!                                    ↓
//!                            wrapped TxStd runs as Remote
//!                                    │
//!                                    ↓
//!                 QcpTxResult ──archived as tx/out/qstar/<m>──→ relayed back
//! ```
//!
//! ## Test Categories
//!
//! 1. **Round Trip**: every accepted message is answered exactly once
//! 2. **Ordering**: sequences are gap-free and never replayed
//! 3. **Trust**: only the configured relayer key is accepted
//! 4. **Results**: notifications reach the application handler

#[cfg(test)]
mod tests {
    use crate::fixtures::{genesis_state, NoteTx, SendTx, TestChain, TransferTx};
    use qb_04_txs::{QcpTxResult, TxStd};
    use qb_05_qcp::{SEQUENCE, TO};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{Address, CodeType};
    use std::sync::Arc;

    const LOCAL: &str = "qbase";
    const REMOTE: &str = "qstar";

    struct Setup {
        chain: TestChain,
        signer: Ed25519KeyPair,
        relayer: Ed25519KeyPair,
    }

    fn setup(accounts: &[(Address, u64)]) -> Setup {
        let signer = Ed25519KeyPair::generate();
        let relayer = Ed25519KeyPair::generate();
        let mut chain = TestChain::with_signer(LOCAL, &signer);
        chain.start(genesis_state(
            accounts,
            &[(REMOTE, &relayer.public_key())],
        ));
        Setup {
            chain,
            signer,
            relayer,
        }
    }

    impl Setup {
        fn note_message(&self, sequence: u64) -> Vec<u8> {
            let key = format!("remote/{sequence}");
            let tx_std = self
                .chain
                .tx_std(vec![Arc::new(NoteTx::new(&key, "from qstar"))]);
            let tx = self.chain.inbound(REMOTE, sequence, &self.relayer, tx_std);
            self.chain.encode_qcp(&tx)
        }
    }

    fn reply_payload(chain: &TestChain, sequence: u64) -> QcpTxResult {
        let out = chain.out_tx(REMOTE, sequence).expect("archived reply");
        assert!(out.is_result);
        out.tx_std.itxs[0]
            .as_any()
            .downcast_ref::<QcpTxResult>()
            .expect("reply carries a QcpTxResult")
            .clone()
    }

    // =========================================================================
    // ROUND TRIP
    // =========================================================================

    #[test]
    fn test_nine_messages_nine_replies() {
        let mut s = setup(&[]);
        let txs: Vec<Vec<u8>> = (1..=9).map(|seq| s.note_message(seq)).collect();

        let results = s.chain.block(&txs);

        for (i, result) in results.iter().enumerate() {
            assert!(result.is_ok(), "message {}: {}", i + 1, result.log);
        }
        assert_eq!(s.chain.in_sequence(REMOTE), 9);
        assert_eq!(s.chain.out_sequence(REMOTE), 9);
        for seq in 1..=9u64 {
            assert_eq!(s.chain.note(&format!("remote/{seq}")).as_deref(), Some("from qstar"));
        }
    }

    #[test]
    fn test_reply_is_signed_and_routed_back() {
        let mut s = setup(&[]);
        let tx = s.note_message(1);

        let result = s.chain.block(&[tx]).remove(0);
        assert!(result.is_ok(), "{}", result.log);

        let out = s.chain.out_tx(REMOTE, 1).unwrap();
        assert_eq!(out.from, LOCAL);
        assert_eq!(out.to, REMOTE);
        assert_eq!(out.sequence, 1);
        assert_eq!(out.block_height, 2);
        assert_eq!(out.tx_std.chain_id, REMOTE);
        assert_eq!(out.tx_std.max_gas, 0);
        assert!(out.verify_signature(&s.signer.public_key()).is_ok());

        let reply = reply_payload(&s.chain, 1);
        assert_eq!(reply.code, 0);
        assert_eq!(reply.qcp_original_sequence, 1);

        let message = result
            .events
            .iter()
            .find(|e| e.attribute(TO) == Some(REMOTE.as_bytes()))
            .expect("reply event");
        assert_eq!(message.attribute(SEQUENCE), Some(&b"1"[..]));
    }

    #[test]
    fn test_failed_payload_is_still_answered() {
        let mut s = setup(&[]);
        let tx_std = s.chain.tx_std(vec![Arc::new(NoteTx::rejecting("remote/x"))]);
        let tx = s.chain.inbound(REMOTE, 1, &s.relayer, tx_std);
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(s.chain.note("remote/x"), None);
        assert_eq!(s.chain.in_sequence(REMOTE), 1);
        let reply = reply_payload(&s.chain, 1);
        assert_eq!(reply.code, CodeType::Unauthorized.as_u32());
        assert_eq!(reply.qcp_original_sequence, 1);
    }

    #[test]
    fn test_payload_message_to_origin_is_not_the_reply() {
        let mut s = setup(&[]);
        let tx_std = s.chain.tx_std(vec![Arc::new(SendTx::new(REMOTE, "k", "echo"))]);
        let tx = s.chain.inbound(REMOTE, 1, &s.relayer, tx_std);
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert!(result.is_ok(), "{}", result.log);
        assert_eq!(s.chain.in_sequence(REMOTE), 1);
        assert_eq!(s.chain.out_sequence(REMOTE), 2);
        assert!(!s.chain.out_tx(REMOTE, 1).unwrap().is_result);

        let reply = reply_payload(&s.chain, 2);
        assert_eq!(reply.code, 0);
        assert_eq!(reply.qcp_original_sequence, 1);
        let sequences: Vec<_> = result
            .events
            .iter()
            .filter(|e| e.attribute(TO) == Some(REMOTE.as_bytes()))
            .filter_map(|e| e.attribute(SEQUENCE))
            .collect();
        assert_eq!(sequences, vec![&b"1"[..], &b"2"[..]]);
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    #[test]
    fn test_sequence_gap_is_rejected() {
        let mut s = setup(&[]);
        let txs = vec![s.note_message(1), s.note_message(2), s.note_message(4)];

        let results = s.chain.block(&txs);

        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert_eq!(results[2].code, CodeType::InvalidSequence.as_u32());
        assert_eq!(s.chain.in_sequence(REMOTE), 2);
        assert_eq!(s.chain.out_sequence(REMOTE), 2);
        assert_eq!(s.chain.note("remote/4"), None);

        let retry = vec![s.note_message(3), s.note_message(4)];
        let results = s.chain.block(&retry);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(s.chain.in_sequence(REMOTE), 4);
    }

    #[test]
    fn test_replayed_sequence_is_rejected() {
        let mut s = setup(&[]);
        let tx = s.note_message(1);
        assert!(s.chain.block(&[tx.clone()]).remove(0).is_ok());

        assert_eq!(s.chain.check(&tx).code, CodeType::InvalidSequence.as_u32());
        let result = s.chain.block(&[tx]).remove(0);

        assert_eq!(result.code, CodeType::InvalidSequence.as_u32());
        assert_eq!(s.chain.in_sequence(REMOTE), 1);
        assert_eq!(s.chain.out_sequence(REMOTE), 1);
    }

    #[test]
    fn test_check_tx_does_not_advance_in_sequence() {
        let mut s = setup(&[]);
        let tx = s.note_message(1);

        for _ in 0..3 {
            assert!(s.chain.check(&tx).is_ok());
        }
        s.chain.block(&[]);
        assert_eq!(s.chain.in_sequence(REMOTE), 0);
        assert_eq!(s.chain.out_sequence(REMOTE), 0);

        assert!(s.chain.block(&[tx]).remove(0).is_ok());
        assert_eq!(s.chain.in_sequence(REMOTE), 1);
    }

    // =========================================================================
    // TRUST
    // =========================================================================

    #[test]
    fn test_untrusted_relayer_is_rejected() {
        let mut s = setup(&[]);
        let intruder = Ed25519KeyPair::generate();
        let tx_std = s.chain.tx_std(vec![Arc::new(NoteTx::new("k", "v"))]);
        let tx = s.chain.inbound(REMOTE, 1, &intruder, tx_std);
        let bytes = s.chain.encode_qcp(&tx);

        assert_eq!(s.chain.check(&bytes).code, CodeType::InvalidPubKey.as_u32());
        let result = s.chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::InvalidPubKey.as_u32());
        assert_eq!(s.chain.in_sequence(REMOTE), 0);
        assert_eq!(s.chain.out_sequence(REMOTE), 0);
        assert_eq!(s.chain.note("k"), None);
    }

    #[test]
    fn test_tampered_message_fails_verification() {
        let mut s = setup(&[]);
        let tx_std = s.chain.tx_std(vec![Arc::new(NoteTx::new("k", "v"))]);
        let mut tx = s.chain.inbound(REMOTE, 1, &s.relayer, tx_std);
        tx.extends = "altered".into();
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(s.chain.in_sequence(REMOTE), 0);
    }

    #[test]
    fn test_unknown_chain_passes_check_but_not_delivery() {
        let mut s = setup(&[]);
        let stranger = Ed25519KeyPair::generate();
        let tx_std = s.chain.tx_std(vec![Arc::new(NoteTx::new("k", "v"))]);
        let tx = s.chain.inbound("nowhere", 1, &stranger, tx_std);
        let bytes = s.chain.encode_qcp(&tx);

        assert!(s.chain.check(&bytes).is_ok());
        let result = s.chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::InvalidPubKey.as_u32());
        assert_eq!(s.chain.in_sequence("nowhere"), 0);
        assert_eq!(s.chain.out_sequence("nowhere"), 0);
    }

    #[test]
    fn test_message_for_another_chain_is_rejected() {
        let mut s = setup(&[]);
        let tx_std = s.chain.tx_std(vec![Arc::new(NoteTx::new("k", "v"))]);
        let mut tx = s.chain.inbound(REMOTE, 1, &s.relayer, tx_std);
        tx.to = "elsewhere".into();
        tx.sign(&s.relayer);
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::TxDecode.as_u32());
        assert_eq!(s.chain.in_sequence(REMOTE), 0);
    }

    // =========================================================================
    // RESULTS AND REMOTE SIGNERS
    // =========================================================================

    #[test]
    fn test_result_notification_reaches_handler() {
        let mut s = setup(&[]);
        let answer = QcpTxResult {
            code: 0,
            qcp_original_sequence: 7,
            ..Default::default()
        };
        let mut tx = s.chain.inbound(
            REMOTE,
            1,
            &s.relayer,
            TxStd::new(Arc::new(answer), LOCAL, 0),
        );
        tx.is_result = true;
        tx.sign(&s.relayer);
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert!(result.is_ok(), "{}", result.log);
        assert_eq!(s.chain.note("qcp-result/7").as_deref(), Some("0"));
        assert_eq!(s.chain.in_sequence(REMOTE), 1);
        assert_eq!(s.chain.out_sequence(REMOTE), 0);
    }

    #[test]
    fn test_remote_signed_transfer() {
        let owner = Ed25519KeyPair::generate();
        let payee = Ed25519KeyPair::generate().address();
        let mut s = setup(&[(owner.address(), 50)]);
        let mut tx_std = s.chain.tx_std(vec![Arc::new(TransferTx {
            from: owner.address(),
            to: payee,
            amount: 20,
        })]);
        tx_std.add_signature(&owner, 1, REMOTE);
        let tx = s.chain.inbound(REMOTE, 1, &s.relayer, tx_std);
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert!(result.is_ok(), "{}", result.log);
        assert_eq!(s.chain.coins(&owner.address()), 30);
        assert_eq!(s.chain.coins(&payee), 20);
        assert_eq!(reply_payload(&s.chain, 1).code, 0);

        // The same origin binding is not accepted from a local submitter.
        let mut local = s.chain.tx_std(vec![Arc::new(TransferTx {
            from: owner.address(),
            to: payee,
            amount: 20,
        })]);
        local.add_signature(&owner, 2, REMOTE);
        let bytes = s.chain.encode(&local);
        let result = s.chain.block(&[bytes]).remove(0);
        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(s.chain.coins(&payee), 20);
    }

    #[test]
    fn test_bare_result_payload_is_unauthorized() {
        let mut s = setup(&[]);
        let answer = QcpTxResult::default();
        let tx_std = TxStd::new(Arc::new(answer), LOCAL, 0);
        let tx = s.chain.inbound(REMOTE, 1, &s.relayer, tx_std);
        let bytes = s.chain.encode_qcp(&tx);

        let result = s.chain.block(&[bytes]).remove(0);

        assert_eq!(result.code, CodeType::Unauthorized.as_u32());
        assert_eq!(s.chain.in_sequence(REMOTE), 1);
    }
}
