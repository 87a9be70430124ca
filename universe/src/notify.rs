//! Change notifications.
//!
//! Observers register callbacks that run synchronously on the thread that
//! made the change, after the change is visible to readers.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mechanics::{Cargo, PortStatus};

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A set of registered callbacks for events of type `E`.
pub struct Listeners<E> {
    entries: RwLock<Vec<(ListenerId, Callback<E>)>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId::new();
        self.entries.write().push((id, Arc::new(callback)));
        id
    }

    /// Returns true if the listener was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    /// Deliver `event` to every listener registered at the time of the call.
    /// The registry lock is not held while callbacks run.
    pub fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = self
            .entries
            .read()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Observable properties of the model, each with its previous and new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    /// The sector array was allocated.
    DatabaseInitialized { sectors: u32 },
    /// A model was loaded from a snapshot.
    DatabaseLoaded { sectors: u32 },
    /// Some displayed attribute of a sector changed.
    SectorUpdated { sector: u32 },
    /// New directed edges, as `(from, to)` pairs.
    WarpsDiscovered { warps: Vec<(u32, u32)> },
    HubDiscovered { sector: u32 },
    PortStatusChanged {
        sector: u32,
        previous: Option<PortStatus>,
        current: PortStatus,
    },
    ShipSector { previous: Option<u32>, current: u32 },
    ShipCargo { cargo: Cargo, previous: i32, current: i32 },
    ShipFighters { previous: i32, current: i32 },
    ShipShields { previous: i32, current: i32 },
    ShipHolds { previous: i32, current: i32 },
    YouXp { previous: i32, current: i32 },
    YouAlign { previous: i32, current: i32 },
    YouCredits { previous: i64, current: i64 },
    YouTurns { previous: i32, current: i32 },
}

/// Key identifying which property a [`StateChange`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKey {
    DatabaseInitialized,
    DatabaseLoaded,
    SectorUpdated,
    WarpsDiscovered,
    HubDiscovered,
    PortStatusChanged,
    ShipSector,
    ShipCargo,
    ShipFighters,
    ShipShields,
    ShipHolds,
    YouXp,
    YouAlign,
    YouCredits,
    YouTurns,
}

impl StateChange {
    pub fn key(&self) -> ChangeKey {
        match self {
            StateChange::DatabaseInitialized { .. } => ChangeKey::DatabaseInitialized,
            StateChange::DatabaseLoaded { .. } => ChangeKey::DatabaseLoaded,
            StateChange::SectorUpdated { .. } => ChangeKey::SectorUpdated,
            StateChange::WarpsDiscovered { .. } => ChangeKey::WarpsDiscovered,
            StateChange::HubDiscovered { .. } => ChangeKey::HubDiscovered,
            StateChange::PortStatusChanged { .. } => ChangeKey::PortStatusChanged,
            StateChange::ShipSector { .. } => ChangeKey::ShipSector,
            StateChange::ShipCargo { .. } => ChangeKey::ShipCargo,
            StateChange::ShipFighters { .. } => ChangeKey::ShipFighters,
            StateChange::ShipShields { .. } => ChangeKey::ShipShields,
            StateChange::ShipHolds { .. } => ChangeKey::ShipHolds,
            StateChange::YouXp { .. } => ChangeKey::YouXp,
            StateChange::YouAlign { .. } => ChangeKey::YouAlign,
            StateChange::YouCredits { .. } => ChangeKey::YouCredits,
            StateChange::YouTurns { .. } => ChangeKey::YouTurns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let listeners: Listeners<u32> = Listeners::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let a = seen.clone();
        listeners.subscribe(move |n| a.lock().push(*n));
        let b = seen.clone();
        listeners.subscribe(move |n| b.lock().push(*n * 10));

        listeners.emit(&4);
        assert_eq!(*seen.lock(), vec![4, 40]);
    }

    #[test]
    fn test_unsubscribe() {
        let listeners: Listeners<u32> = Listeners::new();
        let id = listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 1);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let listeners: Arc<Listeners<u32>> = Arc::new(Listeners::new());
        let inner = listeners.clone();
        listeners.subscribe(move |_| {
            inner.subscribe(|_| {});
        });
        listeners.emit(&1);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_change_keys() {
        let change = StateChange::YouTurns {
            previous: 10,
            current: 9,
        };
        assert_eq!(change.key(), ChangeKey::YouTurns);
    }
}
