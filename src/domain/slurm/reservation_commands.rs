use chrono::{DateTime, Utc};
use std::fmt::Debug;

use crate::domain::utils::id::SlurmReservationName;
use crate::error::Result;

/// A Slurm reservation as listed by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlurmReservation {
    pub name: SlurmReservationName,
    /// Expanded node names, never a hostlist expression.
    pub nodenames: Vec<String>,
}

/// Commands to manage Slurm reservations.
pub trait SlurmReservationCommands: Debug {
    fn exists(&self, name: &SlurmReservationName) -> Result<bool>;

    fn create(&self, name: &SlurmReservationName, start_time: DateTime<Utc>, nodenames: &[String]) -> Result<()>;

    /// Replaces the node list of an existing reservation.
    fn update(&self, name: &SlurmReservationName, nodenames: &[String]) -> Result<()>;

    fn delete(&self, name: &SlurmReservationName) -> Result<()>;

    fn list_all(&self) -> Result<Vec<SlurmReservation>>;
}
