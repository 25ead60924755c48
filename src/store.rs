//! Reservation and saved-space stores
//!
//! Each store is an insertion-ordered set of spaces keyed by id. Consumers
//! get the store injected and can subscribe to snapshots of its contents.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::ReservationConfig;
use crate::models::ParkingSpace;

/// Insertion-ordered, id-deduplicated collection of spaces
#[derive(Debug)]
pub struct SpaceStore {
    label: &'static str,
    spaces: Vec<ParkingSpace>,
    changes: watch::Sender<Vec<ParkingSpace>>,
}

impl SpaceStore {
    /// Empty store; `label` only shows up in logs
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            label,
            spaces: Vec::new(),
            changes,
        }
    }

    /// Append `space` unless its id is already present. Returns whether the
    /// store changed.
    pub fn add(&mut self, space: ParkingSpace) -> bool {
        if self.has(&space.id) {
            debug!(store = self.label, "Space already present: {}", space.name);
            return false;
        }
        info!(store = self.label, "Added space: {}", space.name);
        self.spaces.push(space);
        self.publish();
        true
    }

    /// Remove the space with `id`. Returns whether the store changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.spaces.len();
        self.spaces.retain(|s| s.id != id);
        let removed = self.spaces.len() != before;
        if removed {
            info!(store = self.label, "Removed space: {}", id);
            self.publish();
        }
        removed
    }

    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.spaces.iter().any(|s| s.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ParkingSpace> {
        self.spaces.iter().find(|s| s.id == id)
    }

    /// Current contents in insertion order
    #[must_use]
    pub fn list(&self) -> &[ParkingSpace] {
        &self.spaces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// Receiver that observes a snapshot after every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ParkingSpace>> {
        self.changes.subscribe()
    }

    fn publish(&self) {
        self.changes.send_replace(self.spaces.clone());
    }
}

/// A reservation waiting for its confirmation delay. Waiting borrows only
/// this value, so the stores stay usable in the meantime.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReservation {
    pub space: ParkingSpace,
    delay: Duration,
}

impl PendingReservation {
    /// Sleep for the simulated confirmation delay
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// A user's reservations and bookmarks, two independent stores
#[derive(Debug)]
pub struct UserSpaces {
    pub reservations: SpaceStore,
    pub saved: SpaceStore,
    reserving: HashSet<String>,
    reservation_delay: Duration,
}

impl Default for UserSpaces {
    fn default() -> Self {
        Self::new(&ReservationConfig::default())
    }
}

impl UserSpaces {
    #[must_use]
    pub fn new(config: &ReservationConfig) -> Self {
        Self::with_delay(config.delay())
    }

    #[must_use]
    pub fn with_delay(reservation_delay: Duration) -> Self {
        Self {
            reservations: SpaceStore::new("reservations"),
            saved: SpaceStore::new("saved"),
            reserving: HashSet::new(),
            reservation_delay,
        }
    }

    /// Start reserving `space`. Returns `None` when it is already reserved
    /// or a reservation for it is in flight.
    pub fn begin_reservation(&mut self, space: ParkingSpace) -> Option<PendingReservation> {
        if self.reservations.has(&space.id) || self.reserving.contains(&space.id) {
            debug!("Already reserved or reserving: {}", space.name);
            return None;
        }
        info!("Reserving: {}", space.name);
        self.reserving.insert(space.id.clone());
        Some(PendingReservation {
            space,
            delay: self.reservation_delay,
        })
    }

    /// Confirm a pending reservation. Returns whether the store changed.
    pub fn complete_reservation(&mut self, pending: PendingReservation) -> bool {
        self.reserving.remove(&pending.space.id);
        self.reservations.add(pending.space)
    }

    /// Whether a reservation for `id` is waiting on its delay
    #[must_use]
    pub fn is_reserving(&self, id: &str) -> bool {
        self.reserving.contains(id)
    }

    /// Reserve a space after the simulated confirmation delay. Already
    /// reserved spaces return `false` without waiting.
    pub async fn reserve(&mut self, space: ParkingSpace) -> bool {
        let Some(pending) = self.begin_reservation(space) else {
            return false;
        };
        pending.wait().await;
        self.complete_reservation(pending)
    }

    pub fn save(&mut self, space: ParkingSpace) -> bool {
        self.saved.add(space)
    }

    #[must_use]
    pub fn is_reserved(&self, id: &str) -> bool {
        self.reservations.has(id)
    }

    #[must_use]
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.has(id)
    }
}
