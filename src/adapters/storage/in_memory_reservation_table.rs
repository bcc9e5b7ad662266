//! In-Memory Reservation Table Adapter
//!
//! Keeps the "persisted" table in memory. Useful for testing; writes can
//! be made to fail or to stall on demand to exercise rollback and
//! cancellation paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::ports::{ReservationTable, ReservationTableError, Reservations};

/// In-memory storage for the reservation table
#[derive(Debug, Clone, Default)]
pub struct InMemoryReservationTable {
    stored: Arc<RwLock<Reservations>>,
    fail_writes: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
    save_delay: Arc<RwLock<Duration>>,
}

impl InMemoryReservationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table that already holds `reservations`
    pub fn with_reservations(reservations: Reservations) -> Self {
        Self {
            stored: Arc::new(RwLock::new(reservations)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every save by `delay` before it takes effect
    pub async fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.write().await = delay;
    }

    /// Snapshot of what was last saved
    pub async fn stored(&self) -> Reservations {
        self.stored.read().await.clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReservationTable for InMemoryReservationTable {
    async fn load(&self) -> Result<Reservations, ReservationTableError> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, reservations: &Reservations) -> Result<(), ReservationTableError> {
        let delay = *self.save_delay.read().await;
        if !delay.is_zero() {
            sleep(delay).await;
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ReservationTableError::IoError(
                "simulated write failure".to_string(),
            ));
        }
        *self.stored.write().await = reservations.clone();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::PortRecord;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn test_save_then_load() {
        let table = InMemoryReservationTable::new();
        let mut reservations = Reservations::new();
        reservations.insert(30001, PortRecord::reserved(30001, "foo", Timestamp::now()));

        table.save(&reservations).await.unwrap();

        assert_eq!(table.load().await.unwrap(), reservations);
        assert_eq!(table.save_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_save_keeps_previous_content() {
        let mut reservations = Reservations::new();
        reservations.insert(30001, PortRecord::reserved(30001, "foo", Timestamp::now()));
        let table = InMemoryReservationTable::with_reservations(reservations.clone());
        table.set_fail_writes(true);

        let result = table.save(&Reservations::new()).await;

        assert!(result.is_err());
        assert_eq!(table.stored().await, reservations);
        assert_eq!(table.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delayed_save_lands_after_delay() {
        let table = InMemoryReservationTable::new();
        table.set_save_delay(Duration::from_millis(50)).await;
        let mut reservations = Reservations::new();
        reservations.insert(30001, PortRecord::reserved(30001, "foo", Timestamp::now()));

        let started = tokio::time::Instant::now();
        table.save(&reservations).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(table.stored().await, reservations);
    }
}
