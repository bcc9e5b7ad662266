//! Inclusive span of node ports the ledger accounts for.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::errors::ReservationError;

/// Lowest port of the default Kubernetes NodePort range.
pub const DEFAULT_MIN_PORT: u16 = 30000;

/// Highest port of the default Kubernetes NodePort range.
pub const DEFAULT_MAX_PORT: u16 = 32767;

/// Inclusive `[min, max]` port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    min: u16,
    max: u16,
}

impl PortRange {
    /// Creates a range, rejecting zero or inverted bounds.
    pub fn new(min: u16, max: u16) -> Result<Self, ValidationError> {
        if min == 0 {
            return Err(ValidationError::out_of_range(
                "min_port",
                1,
                i64::from(u16::MAX),
                0,
            ));
        }
        if min > max {
            return Err(ValidationError::out_of_range(
                "max_port",
                i64::from(min),
                i64::from(u16::MAX),
                i64::from(max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Number of ports in the range.
    pub fn len(&self) -> usize {
        usize::from(self.max - self.min) + 1
    }

    /// A valid range always holds at least one port.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.min..=self.max).contains(&port)
    }

    /// Ports in ascending order.
    pub fn iter(&self) -> RangeInclusive<u16> {
        self.min..=self.max
    }

    /// Narrows an arbitrary integer to a port inside this range.
    ///
    /// Accepts `i64` so values that do not even fit a `u16` are reported
    /// as out of range rather than as a parse failure.
    pub fn check(&self, port: i64) -> Result<u16, ReservationError> {
        u16::try_from(port)
            .ok()
            .filter(|p| self.contains(*p))
            .ok_or(ReservationError::OutOfRange {
                port,
                min: self.min,
                max: self.max,
            })
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PORT,
            max: DEFAULT_MAX_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_kubernetes_node_port_range() {
        let range = PortRange::default();
        assert_eq!(range.min(), 30000);
        assert_eq!(range.max(), 32767);
        assert_eq!(range.len(), 2768);
    }

    #[test]
    fn single_port_range_is_allowed() {
        let range = PortRange::new(30000, 30000).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![30000]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(PortRange::new(30002, 30000).is_err());
    }

    #[test]
    fn zero_min_is_rejected() {
        assert!(PortRange::new(0, 10).is_err());
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let range = PortRange::new(30000, 30002).unwrap();
        assert!(!range.contains(29999));
        assert!(range.contains(30000));
        assert!(range.contains(30002));
        assert!(!range.contains(30003));
    }

    #[test]
    fn check_accepts_ports_inside_range() {
        let range = PortRange::new(30000, 30002).unwrap();
        assert_eq!(range.check(30001).unwrap(), 30001);
    }

    #[test]
    fn check_rejects_ports_outside_range() {
        let range = PortRange::new(30000, 30002).unwrap();
        for port in [-1, 0, 29999, 30003, 70000] {
            match range.check(port) {
                Err(ReservationError::OutOfRange { port: p, min, max }) => {
                    assert_eq!(p, port);
                    assert_eq!((min, max), (30000, 30002));
                }
                other => panic!("expected OutOfRange for {port}, got {other:?}"),
            }
        }
    }
}
