use std::fmt::Debug;

use crate::domain::capacity_block::CapacityBlockState;
use crate::domain::utils::id::CapacityBlockId;
use crate::error::Result;

/// State of a single capacity reservation as returned by EC2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReservationInfo {
    pub capacity_reservation_id: CapacityBlockId,
    pub state: CapacityBlockState,
}

/// Query for the lifecycle state of capacity reservations.
///
/// Implementations may return fewer entries than requested ids.
pub trait CapacityReservationProvider: Debug {
    fn describe_capacity_reservations(&self, capacity_reservation_ids: &[CapacityBlockId]) -> Result<Vec<CapacityReservationInfo>>;
}
