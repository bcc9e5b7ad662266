//! PortLedger - Reconciles live cluster ports with manual reservations.
//!
//! The ledger owns both tables behind one `RwLock`:
//!
//! - `list_all` takes the read side, so listings run concurrently.
//! - `reserve` takes the write side for its whole check, insert and
//!   persist sequence, so two reservations of the same port are
//!   serialized and the second one sees the first.
//! - `replace_live_snapshot` takes the write side only for the pointer
//!   swap; the refresher queries the cluster before calling it.
//!
//! A reservation is committed only once the table has been saved: the
//! new table is saved first and installed in memory afterwards. The
//! commit runs on a spawned task, so dropping the caller's future does
//! not abandon it halfway.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::allocation::{
    resolve_port, CollisionReason, LiveSnapshot, PortRange, PortRecord, ReservationError,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{ReservationTable, ReservationTableError, Reservations};

struct LedgerState {
    live: Arc<LiveSnapshot>,
    reservations: Reservations,
}

impl LedgerState {
    fn resolve(&self, port: u16) -> PortRecord {
        resolve_port(port, self.live.get(port), self.reservations.get(&port))
    }
}

/// Single authority over node port ownership.
pub struct PortLedger {
    range: PortRange,
    table: Arc<dyn ReservationTable>,
    state: Arc<RwLock<LedgerState>>,
}

impl PortLedger {
    /// Creates a ledger with an empty live snapshot and the given
    /// reservations, which are assumed to match what `table` holds.
    pub fn new(
        range: PortRange,
        table: Arc<dyn ReservationTable>,
        reservations: Reservations,
    ) -> Self {
        Self {
            range,
            table,
            state: Arc::new(RwLock::new(LedgerState {
                live: Arc::new(LiveSnapshot::empty()),
                reservations,
            })),
        }
    }

    /// Creates a ledger from whatever `table` currently stores.
    pub async fn load(
        range: PortRange,
        table: Arc<dyn ReservationTable>,
    ) -> Result<Self, ReservationTableError> {
        let reservations = table.load().await?;
        let outside = reservations
            .keys()
            .filter(|port| !range.contains(**port))
            .count();
        if outside > 0 {
            tracing::warn!(
                count = outside,
                min = range.min(),
                max = range.max(),
                "Stored reservations outside the configured range are kept but not listed"
            );
        }
        tracing::info!(count = reservations.len(), "Reservation table loaded");
        Ok(Self::new(range, table, reservations))
    }

    pub fn range(&self) -> PortRange {
        self.range
    }

    /// Every port in the range, ascending, each resolved live > manual > free.
    pub async fn list_all(&self) -> Vec<PortRecord> {
        let state = self.state.read().await;
        self.range.iter().map(|port| state.resolve(port)).collect()
    }

    /// Resolved record for a single port.
    pub async fn get(&self, port: u16) -> Result<PortRecord, ReservationError> {
        let port = self.range.check(i64::from(port))?;
        Ok(self.state.read().await.resolve(port))
    }

    /// Reserves `port` for `name`.
    ///
    /// The commit runs on its own task and finishes even if the caller
    /// stops waiting, so a timed-out request still ends with memory and
    /// storage in agreement.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if the port is outside the configured range
    /// - `Collision` if the port is already live or reserved; carries the
    ///   current owner
    /// - `Persistence` if the table could not be saved; nothing is reserved
    pub async fn reserve(&self, port: u16, name: &str) -> Result<PortRecord, ReservationError> {
        let port = self.range.check(i64::from(port))?;

        let state = Arc::clone(&self.state);
        let table = Arc::clone(&self.table);
        let owner = name.to_string();

        tokio::spawn(commit_reservation(state, table, port, owner))
            .await
            .map_err(|e| ReservationError::Persistence(format!("reservation task failed: {e}")))?
    }

    /// Installs a new live snapshot, dropping the previous one whole.
    pub async fn replace_live_snapshot(&self, snapshot: LiveSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write().await;
        state.live = snapshot;
    }

    /// The live snapshot currently in effect.
    pub async fn live_snapshot(&self) -> Arc<LiveSnapshot> {
        Arc::clone(&self.state.read().await.live)
    }

    /// Copy of the in-memory reservation table.
    pub async fn reservations(&self) -> Reservations {
        self.state.read().await.reservations.clone()
    }
}

/// Check, save, then install. The in-memory table only changes after the
/// save succeeded, under the same write guard.
async fn commit_reservation(
    state: Arc<RwLock<LedgerState>>,
    table: Arc<dyn ReservationTable>,
    port: u16,
    owner: String,
) -> Result<PortRecord, ReservationError> {
    let mut state = state.write().await;

    let current = state.resolve(port);
    if let Some(reason) = CollisionReason::from_status(current.status) {
        tracing::warn!(
            port,
            requested_by = %owner,
            current_owner = %current.owner,
            %reason,
            "Reservation refused"
        );
        return Err(ReservationError::Collision {
            port,
            reason,
            current_owner: current.owner,
        });
    }

    let record = PortRecord::reserved(port, owner.as_str(), Timestamp::now());
    let mut next = state.reservations.clone();
    next.insert(port, record.clone());

    if let Err(e) = table.save(&next).await {
        tracing::error!(port, error = %e, "Reservation not committed, table not persisted");
        return Err(ReservationError::Persistence(e.to_string()));
    }
    state.reservations = next;

    tracing::info!(port, owner = %owner, "Port reserved");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::adapters::storage::InMemoryReservationTable;
    use crate::domain::allocation::{
        build_live_snapshot, ClusterService, ExposureType, PortStatus, ServicePort,
    };

    fn small_range() -> PortRange {
        PortRange::new(30000, 30002).unwrap()
    }

    fn ledger_with(table: &InMemoryReservationTable) -> PortLedger {
        PortLedger::new(small_range(), Arc::new(table.clone()), Reservations::new())
    }

    fn snapshot_with(port: u16, ns: &str, name: &str) -> LiveSnapshot {
        let svc = ClusterService::new(
            ns,
            name,
            ExposureType::NodePort,
            vec![ServicePort::with_node_port(port)],
        );
        build_live_snapshot(&[svc], Timestamp::now())
    }

    #[tokio::test]
    async fn list_all_covers_every_port_in_order() {
        let ledger = ledger_with(&InMemoryReservationTable::new());

        let records = ledger.list_all().await;

        let ports: Vec<u16> = records.iter().map(|r| r.port).collect();
        assert_eq!(ports, vec![30000, 30001, 30002]);
        assert!(records.iter().all(PortRecord::is_free));
        assert!(records.iter().all(|r| r.owner == "-"));
    }

    #[tokio::test]
    async fn reserve_free_port_shows_as_reserved() {
        let ledger = ledger_with(&InMemoryReservationTable::new());

        let record = ledger.reserve(30001, "foo").await.unwrap();

        assert_eq!(record.status, PortStatus::ReservedManual);
        let records = ledger.list_all().await;
        assert_eq!(records[0], PortRecord::free(30000));
        assert_eq!(records[1].status, PortStatus::ReservedManual);
        assert_eq!(records[1].owner, "foo");
        assert_eq!(records[2], PortRecord::free(30002));
    }

    #[tokio::test]
    async fn reserve_persists_before_returning() {
        let table = InMemoryReservationTable::new();
        let ledger = ledger_with(&table);

        ledger.reserve(30002, "bar").await.unwrap();

        let stored = table.stored().await;
        assert_eq!(stored.get(&30002).unwrap().owner, "bar");
        assert_eq!(table.save_count(), 1);
    }

    #[tokio::test]
    async fn reserve_live_port_collides_with_live_owner() {
        let ledger = ledger_with(&InMemoryReservationTable::new());
        ledger
            .replace_live_snapshot(snapshot_with(30000, "shop", "web"))
            .await;

        let err = ledger.reserve(30000, "intruder").await.unwrap_err();

        assert_eq!(
            err,
            ReservationError::Collision {
                port: 30000,
                reason: CollisionReason::OccupiedLive,
                current_owner: "shop/web".to_string(),
            }
        );
        assert!(ledger.reservations().await.is_empty());
    }

    #[tokio::test]
    async fn reserve_twice_collides_with_first_owner() {
        let ledger = ledger_with(&InMemoryReservationTable::new());
        ledger.reserve(30001, "first").await.unwrap();

        let err = ledger.reserve(30001, "second").await.unwrap_err();

        assert_eq!(
            err,
            ReservationError::Collision {
                port: 30001,
                reason: CollisionReason::ReservedManual,
                current_owner: "first".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn reserve_out_of_range_is_rejected_without_side_effects() {
        let table = InMemoryReservationTable::new();
        let ledger = ledger_with(&table);

        let err = ledger.reserve(40000, "foo").await.unwrap_err();

        assert!(matches!(err, ReservationError::OutOfRange { port: 40000, .. }));
        assert!(ledger.reservations().await.is_empty());
        assert_eq!(table.save_count(), 0);
    }

    #[tokio::test]
    async fn failed_persist_rolls_back() {
        let table = InMemoryReservationTable::new();
        table.set_fail_writes(true);
        let ledger = ledger_with(&table);

        let err = ledger.reserve(30001, "foo").await.unwrap_err();

        assert!(matches!(err, ReservationError::Persistence(_)));
        assert!(ledger.reservations().await.is_empty());
        assert!(ledger.list_all().await[1].is_free());

        table.set_fail_writes(false);
        ledger.reserve(30001, "foo").await.unwrap();
    }

    #[tokio::test]
    async fn abandoned_reserve_still_commits_consistently() {
        let table = InMemoryReservationTable::new();
        table.set_save_delay(Duration::from_millis(200)).await;
        let ledger = ledger_with(&table);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), ledger.reserve(30001, "foo")).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;

        let stored = table.stored().await;
        assert_eq!(ledger.reservations().await, stored);
        assert_eq!(stored.get(&30001).unwrap().owner, "foo");
        assert_eq!(ledger.get(30001).await.unwrap().status, PortStatus::ReservedManual);
    }

    #[tokio::test]
    async fn abandoned_failing_reserve_leaves_nothing_behind() {
        let table = InMemoryReservationTable::new();
        table.set_save_delay(Duration::from_millis(100)).await;
        table.set_fail_writes(true);
        let ledger = ledger_with(&table);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), ledger.reserve(30002, "bar")).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(ledger.reservations().await.is_empty());
        assert!(table.stored().await.is_empty());
        assert!(ledger.get(30002).await.unwrap().is_free());
    }

    #[tokio::test]
    async fn live_wins_over_existing_reservation() {
        let ledger = ledger_with(&InMemoryReservationTable::new());
        ledger.reserve(30001, "planned").await.unwrap();

        ledger
            .replace_live_snapshot(snapshot_with(30001, "prod", "api"))
            .await;

        let record = ledger.get(30001).await.unwrap();
        assert_eq!(record.status, PortStatus::OccupiedLive);
        assert_eq!(record.owner, "prod/api");
        assert!(ledger.reservations().await.contains_key(&30001));
    }

    #[tokio::test]
    async fn snapshot_replacement_is_wholesale() {
        let ledger = ledger_with(&InMemoryReservationTable::new());
        ledger
            .replace_live_snapshot(snapshot_with(30000, "a", "one"))
            .await;
        ledger
            .replace_live_snapshot(snapshot_with(30002, "b", "two"))
            .await;

        let records = ledger.list_all().await;
        assert!(records[0].is_free());
        assert_eq!(records[2].owner, "b/two");
        assert_eq!(ledger.live_snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn load_restores_persisted_reservations() {
        let table = InMemoryReservationTable::new();
        {
            let ledger = ledger_with(&table);
            ledger.reserve(30002, "kept").await.unwrap();
        }

        let reloaded = PortLedger::load(small_range(), Arc::new(table.clone()))
            .await
            .unwrap();

        let record = reloaded.get(30002).await.unwrap();
        assert_eq!(record.status, PortStatus::ReservedManual);
        assert_eq!(record.owner, "kept");
    }

    #[tokio::test]
    async fn get_out_of_range_fails() {
        let ledger = ledger_with(&InMemoryReservationTable::new());
        assert!(matches!(
            ledger.get(29999).await,
            Err(ReservationError::OutOfRange { .. })
        ));
    }
}
