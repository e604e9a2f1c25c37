//! Exclusión mutua por batería / vehículo
//!
//! Las operaciones que verifican un estado y luego escriben se ejecutan
//! con los candados de las entidades afectadas. Operaciones sobre
//! baterías distintas no se bloquean entre sí.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Entidad protegida por un candado
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    Battery(i64),
    Vehicle(i64),
}

type LockTable = HashMap<LockKey, Arc<AsyncMutex<()>>>;

#[derive(Clone, Default)]
pub struct KeyedLocks {
    table: Arc<Mutex<LockTable>>,
}

/// Candados tomados; se liberan al salir de alcance
pub struct KeyedGuard {
    guards: Vec<OwnedMutexGuard<()>>,
    table: Arc<Mutex<LockTable>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toma los candados de `keys` siempre en el mismo orden (ordenados),
    /// para que dos operaciones con claves solapadas no se interbloqueen.
    pub async fn acquire(&self, keys: &[LockKey]) -> KeyedGuard {
        let mut keys = keys.to_vec();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let mutex = self.entry(key);
            guards.push(mutex.lock_owned().await);
            debug!("🔒 lock tomado: {:?}", key);
        }

        KeyedGuard {
            guards,
            table: self.table.clone(),
        }
    }

    fn entry(&self, key: LockKey) -> Arc<AsyncMutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.entry(key).or_default().clone()
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Drop for KeyedGuard {
    fn drop(&mut self) {
        self.guards.clear();
        // Entradas sin otros interesados se descartan
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }
}
