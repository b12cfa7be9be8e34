//! # Codec
//!
//! One explicit instance is built at start-up and shared by every component.
//! Concrete types go through bincode. Trait-object values are decoded by
//! tag: the application registers, per interface, a decoder that rebuilds
//! the concrete type behind it.

use crate::errors::CodecError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

type Decoder<I> = Arc<dyn Fn(&Codec, &[u8]) -> Result<Arc<I>, CodecError> + Send + Sync>;

/// Encoder/decoder with an interface registry.
#[derive(Default)]
pub struct Codec {
    decoders: RwLock<HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>>,
}

impl Codec {
    /// Empty codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a concrete value.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode a concrete value.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    /// Register the decoder for `tag` under interface `I` (usually `dyn Trait`).
    pub fn register_interface<I, F>(&self, tag: &str, decoder: F) -> Result<(), CodecError>
    where
        I: ?Sized + 'static,
        F: Fn(&Codec, &[u8]) -> Result<Arc<I>, CodecError> + Send + Sync + 'static,
    {
        let key = (TypeId::of::<I>(), tag.to_string());
        let mut decoders = self.decoders.write();
        if decoders.contains_key(&key) {
            return Err(CodecError::DuplicateTag {
                interface: type_name::<I>(),
                tag: tag.to_string(),
            });
        }
        let decoder: Decoder<I> = Arc::new(decoder);
        decoders.insert(key, Box::new(decoder));
        Ok(())
    }

    /// Whether `tag` is registered for interface `I`.
    pub fn is_registered<I: ?Sized + 'static>(&self, tag: &str) -> bool {
        self.decoders
            .read()
            .contains_key(&(TypeId::of::<I>(), tag.to_string()))
    }

    /// Decode a value of interface `I` whose concrete type is named by `tag`.
    pub fn decode_interface<I: ?Sized + 'static>(
        &self,
        tag: &str,
        bytes: &[u8],
    ) -> Result<Arc<I>, CodecError> {
        let decoder = {
            let decoders = self.decoders.read();
            decoders
                .get(&(TypeId::of::<I>(), tag.to_string()))
                .and_then(|d| d.downcast_ref::<Decoder<I>>())
                .cloned()
                .ok_or_else(|| CodecError::UnknownTag {
                    interface: type_name::<I>(),
                    tag: tag.to_string(),
                })?
        };
        decoder(self, bytes)
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("registered", &self.decoders.read().len())
            .finish()
    }
}
