//! Query routing.

use super::BaseApp;
use crate::domain::{RequestQuery, ResponseQuery};
use crate::VERSION;
use qb_01_store::MultiStore;
use qb_03_context::Context;
use shared_types::TxError;

/// Path segments without the leading empty one.
fn split_path(path: &str) -> Vec<String> {
    let mut parts: Vec<String> = path.split('/').map(str::to_string).collect();
    if parts.first().is_some_and(|p| p.is_empty()) {
        parts.remove(0);
    }
    parts
}

impl BaseApp {
    /// Dispatch on the first path segment: `app`, `store` or `custom`.
    pub fn query(&self, req: RequestQuery) -> ResponseQuery {
        let path = split_path(&req.path);
        match path.first().map(String::as_str) {
            None | Some("") => TxError::UnknownRequest("no query path provided".into()).into(),
            Some("app") => self.query_app(&path),
            Some("store") => self.query_store(&path, &req),
            Some("custom") => self.query_custom(&path, &req),
            Some(other) => TxError::UnknownRequest(format!("unknown query path: {other}")).into(),
        }
    }

    fn query_app(&self, path: &[String]) -> ResponseQuery {
        match path.get(1).map(String::as_str) {
            Some("version") => {
                ResponseQuery::ok(VERSION.as_bytes().to_vec(), self.last_block_height())
            }
            Some(other) => TxError::UnknownRequest(format!("unknown app query: {other}")).into(),
            None => TxError::UnknownRequest("expected app/version".into()).into(),
        }
    }

    fn query_store(&self, path: &[String], req: &RequestQuery) -> ResponseQuery {
        let store_path = format!("/{}", path[1..].join("/"));
        match self.cms.query(&store_path, &req.data, req.height) {
            Ok((value, height)) => ResponseQuery::ok(value, height),
            Err(err) => TxError::UnknownRequest(err.to_string()).into(),
        }
    }

    /// Runs the handler over a fresh cache of the last committed version.
    fn query_custom(&self, path: &[String], req: &RequestQuery) -> ResponseQuery {
        let Some(handler) = &self.custom_query_handler else {
            return TxError::UnknownRequest("CustomQueryHandler not registered".into()).into();
        };
        let header = self
            .check_state
            .as_ref()
            .map(|s| s.ctx.block_header().clone())
            .unwrap_or_default();
        let ctx = Context::new(
            self.cms.cache_multi_store(),
            header,
            true,
            self.codec.clone(),
            self.mappers.clone(),
        );
        match handler(&ctx, &path[1..], req) {
            Ok(value) => ResponseQuery::ok(value, self.last_block_height()),
            Err(err) => err.into(),
        }
    }
}
