//! Event tagging for persisted outbound messages.

use qb_04_txs::TxQcp;
use shared_crypto::sha256;
use shared_types::Event;

/// Event kind used for message tags.
pub const EVENT_TYPE_MESSAGE: &str = "message";
/// Attribute naming the emitting module.
pub const ATTRIBUTE_KEY_MODULE: &str = "module";
/// Module name.
pub const EVENT_MODULE: &str = "qcp";
/// Origin chain attribute.
pub const FROM: &str = "qcp-from";
/// Destination chain attribute.
pub const TO: &str = "qcp-to";
/// Sequence attribute.
pub const SEQUENCE: &str = "qcp-sequence";
/// Message hash attribute.
pub const HASH: &str = "qcp-hash";

/// Hex SHA-256 of the message's signature bytes.
pub fn gen_qcp_tx_hash(tx: &TxQcp) -> String {
    hex::encode(sha256(&tx.sign_data()))
}

/// `message` event describing a persisted outbound `TxQcp`.
pub fn qcp_event(tx: &TxQcp) -> Event {
    Event::new(EVENT_TYPE_MESSAGE)
        .with_attribute(ATTRIBUTE_KEY_MODULE, EVENT_MODULE)
        .with_attribute(FROM, &tx.from)
        .with_attribute(TO, &tx.to)
        .with_attribute(SEQUENCE, tx.sequence.to_string())
        .with_attribute(HASH, gen_qcp_tx_hash(tx))
}
