use crate::domain::KvGasConfig;
use crate::ports::{KvPairs, KvStore};
use shared_types::GasMeter;
use std::sync::Arc;

/// `KvStore` wrapper that charges every access to a gas meter.
///
/// Consumption is recorded even past the limit; the transaction boundary
/// turns an exceeded meter into an out-of-gas result.
pub struct GasKvStore {
    parent: Arc<dyn KvStore>,
    meter: GasMeter,
    config: KvGasConfig,
}

impl GasKvStore {
    /// Wrap `parent`, charging `meter`.
    pub fn new(parent: Arc<dyn KvStore>, meter: GasMeter, config: KvGasConfig) -> Self {
        Self {
            parent,
            meter,
            config,
        }
    }
}

impl KvStore for GasKvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.meter.record(self.config.read_cost_flat, "ReadFlat");
        let value = self.parent.get(key);
        if let Some(v) = &value {
            self.meter
                .record(self.config.read_cost_per_byte * v.len() as u64, "ReadPerByte");
        }
        value
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.meter.record(self.config.write_cost_flat, "WriteFlat");
        self.meter.record(
            self.config.write_cost_per_byte * value.len() as u64,
            "WritePerByte",
        );
        self.parent.set(key, value);
    }

    fn delete(&self, key: &[u8]) {
        self.meter.record(self.config.delete_cost, "Delete");
        self.parent.delete(key);
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> KvPairs {
        let items = self.parent.iterate_prefix(prefix);
        for (_, v) in &items {
            self.meter.record(self.config.iter_next_cost_flat, "IterNextFlat");
            self.meter
                .record(self.config.read_cost_per_byte * v.len() as u64, "ValuePerByte");
        }
        items
    }
}
