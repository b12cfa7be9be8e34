//! # Application Container
//!
//! Configuration and the wiring of the key/value application onto
//! `BaseApp`.

pub mod config;

pub use config::NodeConfig;

use crate::kvstore::{KvMapper, KvStoreTx, KV_MAPPER_NAME, KV_STORE_TX_TAG};
use qb_03_context::Context;
use qb_08_baseabci::{AppConfig, AppError, BaseApp, RequestQuery};
use shared_types::TxError;
use std::sync::Arc;

/// Build the unloaded key/value application described by `config`.
pub fn build_app(config: &NodeConfig) -> Result<BaseApp, AppError> {
    let mut app_config = AppConfig::named(config.app_name.as_str());
    if let Some(seed) = config.qcp_signer_seed {
        app_config = app_config.with_qcp_signer_seed(seed);
    }

    let mut app = BaseApp::in_memory(app_config)?;
    let codec = app.codec().clone();
    app.register_mapper(Arc::new(KvMapper::new(codec)))?;
    app.register_itx::<KvStoreTx>(KV_STORE_TX_TAG)?;
    app.register_custom_query_handler(kv_query)?;
    Ok(app)
}

/// `custom/kv/<key>`: the stored value, empty when unset.
fn kv_query(ctx: &Context, path: &[String], _req: &RequestQuery) -> Result<Vec<u8>, TxError> {
    match path {
        [namespace, key] if namespace == KV_MAPPER_NAME => {
            let value = ctx.require_mapper::<KvMapper>(KV_MAPPER_NAME)?.get(key)?;
            Ok(value.unwrap_or_default().into_bytes())
        }
        _ => Err(TxError::UnknownRequest(format!(
            "unknown custom query: {}",
            path.join("/")
        ))),
    }
}
