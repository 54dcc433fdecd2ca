// src/engine/registry.rs

//! Page-lifetime registry of mounted assessment instances.
//!
//! At most one instance is active unless an instance opts into multiples.
//! The registry is a cheap cloneable handle; every admitted instance holds a
//! [`Registration`] that releases its slot when dropped and observes whether
//! a sweep has removed it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug)]
struct Entry {
    id: Uuid,
    allow_multiple: bool,
    active: watch::Sender<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    /// In mount order.
    entries: Arc<Mutex<Vec<Entry>>>,
}

/// Slot held by one mounted instance.
#[derive(Debug)]
pub struct Registration {
    id: Uuid,
    registry: InstanceRegistry,
    active: watch::Receiver<bool>,
}

impl Registration {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// `false` once the instance was swept or released.
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, entries: &mut Vec<Entry>, allow_multiple: bool) -> Registration {
        let id = Uuid::new_v4();
        let (active, observer) = watch::channel(true);
        entries.push(Entry {
            id,
            allow_multiple,
            active,
        });
        Registration {
            id,
            registry: self.clone(),
            active: observer,
        }
    }

    /// Registers a new instance, or refuses it when another instance is
    /// already active and nobody allows multiples.
    pub fn admit(&self, allow_multiple: bool) -> Option<Registration> {
        let mut entries = self.lock();
        let any_allows_multiple = entries.iter().any(|e| e.allow_multiple);
        if !entries.is_empty() && !allow_multiple && !any_allows_multiple {
            tracing::warn!("Duplicate assessment instance refused");
            return None;
        }
        Some(self.register(&mut entries, allow_multiple))
    }

    /// Registers an instance that arrived without going through [`admit`],
    /// e.g. one mounted late. The next [`sweep`] decides whether it stays.
    ///
    /// [`admit`]: InstanceRegistry::admit
    /// [`sweep`]: InstanceRegistry::sweep
    pub fn attach(&self, allow_multiple: bool) -> Registration {
        let mut entries = self.lock();
        self.register(&mut entries, allow_multiple)
    }

    /// Keeps only the first instance when no active instance allows
    /// multiples. Removed instances are told so through their registration.
    /// Returns the ids that were removed.
    pub fn sweep(&self) -> Vec<Uuid> {
        let mut entries = self.lock();
        if entries.len() <= 1 || entries.iter().any(|e| e.allow_multiple) {
            return Vec::new();
        }
        let removed: Vec<Uuid> = entries
            .drain(1..)
            .map(|e| {
                e.active.send_replace(false);
                e.id
            })
            .collect();
        tracing::debug!("Swept {} duplicate assessment instance(s)", removed.len());
        removed
    }

    /// Sweeps every `period` for as long as the registry or any registration
    /// is alive.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let entries: Weak<Mutex<Vec<Entry>>> = Arc::downgrade(&self.entries);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let Some(entries) = entries.upgrade() else {
                    break;
                };
                InstanceRegistry { entries }.sweep();
            }
        })
    }

    pub fn release(&self, id: Uuid) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| {
            if e.id == id {
                e.active.send_replace(false);
            }
            e.id != id
        });
        entries.len() != before
    }

    pub fn is_active(&self, id: Uuid) -> bool {
        self.lock().iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_instance_is_refused_by_default() {
        let registry = InstanceRegistry::new();
        let first = registry.admit(false).unwrap();
        assert!(registry.admit(false).is_none());
        assert!(registry.is_active(first.id()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn opting_in_allows_multiples() {
        let registry = InstanceRegistry::new();
        let _first = registry.admit(false).unwrap();
        let second = registry.admit(true).unwrap();
        // once any active instance allows multiples, others get in too
        let third = registry.admit(false).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.sweep().is_empty());

        assert!(registry.release(second.id()));
        assert!(!second.is_active());
        assert!(registry.is_active(third.id()));
    }

    #[test]
    fn sweep_removes_late_duplicates() {
        let registry = InstanceRegistry::new();
        let first = registry.admit(false).unwrap();
        let late_a = registry.attach(false);
        let late_b = registry.attach(false);

        let removed = registry.sweep();
        assert_eq!(removed, vec![late_a.id(), late_b.id()]);
        assert!(first.is_active());
        assert!(!late_a.is_active());
        assert!(!late_b.is_active());
        assert!(!registry.is_active(late_a.id()));
        assert!(registry.sweep().is_empty());
    }

    #[test]
    fn dropping_a_registration_frees_the_slot() {
        let registry = InstanceRegistry::new();
        let first = registry.admit(false).unwrap();
        drop(first);
        assert!(registry.is_empty());
        assert!(registry.admit(false).is_some());
    }

    #[tokio::test]
    async fn sweeper_removes_late_arrivals() {
        let registry = InstanceRegistry::new();
        let first = registry.admit(false).unwrap();
        let sweeper = registry.spawn_sweeper(Duration::from_millis(5));

        let late = registry.attach(false);
        for _ in 0..100 {
            if !late.is_active() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(!late.is_active());
        assert!(first.is_active());
        assert_eq!(registry.len(), 1);
        sweeper.abort();
    }
}
