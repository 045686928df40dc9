//! # Change Feed
//!
//! The database platform pushes a notification whenever a watched table
//! changes. Those notifications are republished here as [`ChangeEvent`]s so
//! that caches and other consumers can react without knowing the transport.
//!
//! ```
//! use salonsync_core::events::{ChangeEvent, ChangeFeed, ChangeKind, Table};
//!
//! let feed = ChangeFeed::new();
//! let subscription = feed.on_change(|event| println!("{} changed", event.table));
//! feed.publish(&ChangeEvent::new(Table::Bookings, ChangeKind::Insert));
//! subscription.unsubscribe();
//! ```

use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError, Weak,
    },
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tables whose changes affect cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Bookings,
    StaffShifts,
    LocationHours,
    LoyaltySettings,
    LoyaltyWallets,
    Memberships,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::Bookings => "bookings",
            Table::StaffShifts => "staff_shifts",
            Table::LocationHours => "location_hours",
            Table::LoyaltySettings => "loyalty_settings",
            Table::LoyaltyWallets => "loyalty_wallets",
            Table::Memberships => "memberships",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    /// Calendar day touched by the change, when the row has one.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ChangeEvent {
    pub fn new(table: Table, kind: ChangeKind) -> Self {
        Self {
            table,
            kind,
            location_id: None,
            date: None,
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn at_location(mut self, location_id: Uuid) -> Self {
        self.location_id = Some(location_id);
        self
    }
}

type Handler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;
type Handlers = Mutex<BTreeMap<u64, Handler>>;

/// Publish/subscribe hub for [`ChangeEvent`]s. Cloning shares the same hub.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    handlers: Arc<Handlers>,
    next_id: Arc<AtomicU64>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` and returns the handle that removes it again.
    pub fn on_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(handler));

        Subscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    /// Delivers `event` to every handler registered at the time of the call,
    /// in registration order, and returns how many handlers received it.
    ///
    /// A handler removed by an earlier handler during the same delivery is
    /// skipped and not counted.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        // Snapshot so handlers may subscribe or unsubscribe while running.
        let handlers: Vec<(u64, Handler)> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, handler)| (*id, handler.clone()))
            .collect();

        tracing::debug!(
            "Publishing {:?} on {} to {} handler(s)",
            event.kind,
            event.table,
            handlers.len()
        );

        let mut delivered = 0;
        for (id, handler) in handlers {
            let registered = self
                .handlers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&id);
            if registered {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`ChangeFeed::on_change`].
///
/// Dropping the handle keeps the handler registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    handlers: Weak<Handlers>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(handlers) = self.handlers.upgrade() {
            handlers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}
