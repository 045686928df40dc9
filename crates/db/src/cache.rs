//! # Query Cache
//!
//! [`QueryCache`] memoizes fetched rows by request key on top of
//! `moka::future::Cache`. Entries expire after a fixed TTL and the cache holds
//! a bounded number of keys. Concurrent requests for the same key share one
//! in-flight fetch; a failed fetch is not remembered, so the next caller tries
//! again.
//!
//! [`CachedStore`] wraps any provider implementation with one cache per
//! query. Wallet balances and memberships are always read through because
//! they change with every checkout. [`CachedStore::watch`] hooks the caches
//! up to a [`ChangeFeed`] so that backend notifications evict stale entries.

use std::{fmt, future::Future, hash::Hash, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::eyre;
use moka::future::Cache;
use salonsync_core::{
    errors::{TimeError, TimeResult},
    events::{ChangeEvent, ChangeFeed, Subscription, Table},
    models::{
        hours::{BookingInterval, LocationHours, ShiftInterval},
        loyalty::{LoyaltySettings, Membership},
    },
    providers::{BookingProvider, LocationHoursProvider, LoyaltyProvider, ShiftProvider},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Keys kept per cache before the least useful ones are evicted.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// TTL cache with in-flight de-duplication.
pub struct QueryCache<K, V> {
    entries: Cache<K, V>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self { entries }
    }

    /// Returns the cached value for `key`, running `fetch` when there is no
    /// fresh value and no fetch already in flight. Every caller waiting on a
    /// failed fetch receives the same shared error.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        self.entries
            .try_get_with(key, async {
                debug!("Query cache miss, fetching");
                fetch().await
            })
            .await
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.invalidate(key).await;
    }

    /// Evicts every entry whose key matches `predicate`.
    pub fn invalidate_where<P>(&self, predicate: P)
    where
        P: Fn(&K) -> bool + Send + Sync + 'static,
    {
        if let Err(err) = self.entries.invalidate_entries_if(move |key, _| predicate(key)) {
            warn!("Predicate invalidation failed, clearing cache: {}", err);
            self.entries.invalidate_all();
        }
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries after pending expirations and evictions are applied.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> fmt::Debug for QueryCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

/// Recovers an owned error from one shared by every caller of a failed fetch.
fn shared_error(err: Arc<TimeError>) -> TimeError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| match shared.as_ref() {
        TimeError::NotFound(msg) => TimeError::NotFound(msg.clone()),
        TimeError::Validation(msg) => TimeError::Validation(msg.clone()),
        TimeError::Authentication(msg) => TimeError::Authentication(msg.clone()),
        TimeError::Authorization(msg) => TimeError::Authorization(msg.clone()),
        TimeError::Unavailable(msg) => TimeError::Unavailable(msg.clone()),
        TimeError::Database(report) => TimeError::Database(eyre!("{}", report)),
        TimeError::Internal(source) => TimeError::Internal(source.to_string().into()),
    })
}

type HoursKey = (Uuid, u8);
type ShiftsKey = (Uuid, NaiveDate, Vec<Uuid>);
type BookingsKey = (Uuid, NaiveDate, Vec<Uuid>);

#[derive(Debug)]
struct StoreCaches {
    hours: QueryCache<HoursKey, Option<LocationHours>>,
    shifts: QueryCache<ShiftsKey, Vec<ShiftInterval>>,
    bookings: QueryCache<BookingsKey, Vec<BookingInterval>>,
    loyalty_settings: QueryCache<(), Option<LoyaltySettings>>,
}

impl StoreCaches {
    fn new(ttl: Duration) -> Self {
        Self {
            hours: QueryCache::new(ttl),
            shifts: QueryCache::new(ttl),
            bookings: QueryCache::new(ttl),
            loyalty_settings: QueryCache::new(ttl),
        }
    }

    fn apply(&self, event: &ChangeEvent) {
        let changed_date = event.date;
        let changed_location = event.location_id;

        match event.table {
            // Staff scoped entries hold bookings from every location.
            Table::Bookings => self.bookings.invalidate_where(move |(location_id, date, staff)| {
                changed_date.is_none_or(|changed| changed == *date)
                    && (!staff.is_empty()
                        || changed_location.is_none_or(|changed| changed == *location_id))
            }),
            // A shift may run past midnight into the next day.
            Table::StaffShifts => self.shifts.invalidate_where(move |(location_id, date, _)| {
                changed_date
                    .is_none_or(|changed| *date == changed || changed.succ_opt() == Some(*date))
                    && changed_location.is_none_or(|changed| changed == *location_id)
            }),
            Table::LocationHours => self.hours.invalidate_where(move |(location_id, _)| {
                changed_location.is_none_or(|changed| changed == *location_id)
            }),
            Table::LoyaltySettings => self.loyalty_settings.clear(),
            Table::LoyaltyWallets | Table::Memberships => {}
        }
    }
}

/// Provider wrapper that caches reads of the inner store.
#[derive(Debug, Clone)]
pub struct CachedStore<S> {
    inner: S,
    caches: Arc<StoreCaches>,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            caches: Arc::new(StoreCaches::new(ttl)),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Evicts cache entries affected by each event published on `feed`.
    pub fn watch(&self, feed: &ChangeFeed) -> Subscription {
        let caches = Arc::clone(&self.caches);
        feed.on_change(move |event| {
            info!("Invalidating cached {} after {:?}", event.table, event.kind);
            caches.apply(event);
        })
    }

    /// Drops every cached row.
    pub fn clear(&self) {
        self.caches.hours.clear();
        self.caches.shifts.clear();
        self.caches.bookings.clear();
        self.caches.loyalty_settings.clear();
    }
}

#[async_trait]
impl<S: LocationHoursProvider> LocationHoursProvider for CachedStore<S> {
    async fn location_hours(
        &self,
        location_id: Uuid,
        day_of_week: u8,
    ) -> TimeResult<Option<LocationHours>> {
        self.caches
            .hours
            .get_or_fetch((location_id, day_of_week), || {
                self.inner.location_hours(location_id, day_of_week)
            })
            .await
            .map_err(shared_error)
    }
}

#[async_trait]
impl<S: ShiftProvider> ShiftProvider for CachedStore<S> {
    async fn shifts_for(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        staff_ids: &[Uuid],
    ) -> TimeResult<Vec<ShiftInterval>> {
        self.caches
            .shifts
            .get_or_fetch((location_id, date, staff_ids.to_vec()), || {
                self.inner.shifts_for(location_id, date, staff_ids)
            })
            .await
            .map_err(shared_error)
    }
}

#[async_trait]
impl<S: BookingProvider> BookingProvider for CachedStore<S> {
    async fn bookings_for(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        staff_ids: &[Uuid],
    ) -> TimeResult<Vec<BookingInterval>> {
        self.caches
            .bookings
            .get_or_fetch((location_id, date, staff_ids.to_vec()), || {
                self.inner.bookings_for(location_id, date, staff_ids)
            })
            .await
            .map_err(shared_error)
    }
}

#[async_trait]
impl<S: LoyaltyProvider> LoyaltyProvider for CachedStore<S> {
    async fn loyalty_settings(&self) -> TimeResult<Option<LoyaltySettings>> {
        self.caches
            .loyalty_settings
            .get_or_fetch((), || self.inner.loyalty_settings())
            .await
            .map_err(shared_error)
    }

    async fn wallet_balance(&self, customer_id: Uuid) -> TimeResult<i64> {
        self.inner.wallet_balance(customer_id).await
    }

    async fn active_membership(&self, customer_id: Uuid) -> TimeResult<Option<Membership>> {
        self.inner.active_membership(customer_id).await
    }
}
