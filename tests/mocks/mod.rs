#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use capacity_block_manager::domain::capacity_block::CapacityBlockState;
use capacity_block_manager::domain::clock::SystemClock;
use capacity_block_manager::domain::ec2::capacity_reservation_provider::{CapacityReservationInfo, CapacityReservationProvider};
use capacity_block_manager::domain::slurm::reservation_commands::{SlurmReservation, SlurmReservationCommands};
use capacity_block_manager::domain::utils::id::{CapacityBlockId, SlurmReservationName};
use capacity_block_manager::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MockClock {
    time: Arc<RwLock<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new() -> MockClock {
        MockClock { time: Arc::new(RwLock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())) }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut time = self.time.write().unwrap();
        *time = *time + TimeDelta::minutes(minutes);
    }
}

impl SystemClock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.read().unwrap()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockEc2 {
    states: Arc<Mutex<HashMap<String, CapacityBlockState>>>,
    requests: Arc<Mutex<Vec<Vec<String>>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockEc2 {
    pub fn set_state(&self, id: &str, state: CapacityBlockState) {
        self.states.lock().unwrap().insert(id.to_string(), state);
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl CapacityReservationProvider for MockEc2 {
    fn describe_capacity_reservations(&self, capacity_reservation_ids: &[CapacityBlockId]) -> Result<Vec<CapacityReservationInfo>> {
        self.requests.lock().unwrap().push(capacity_reservation_ids.iter().map(|id| id.to_string()).collect());

        if *self.fail.lock().unwrap() {
            return Err(Error::CapacityReservationQuery("Unable to connect to EC2".to_string()));
        }

        let states = self.states.lock().unwrap();
        Ok(capacity_reservation_ids
            .iter()
            .filter_map(|id| states.get(id.as_str()).map(|state| CapacityReservationInfo { capacity_reservation_id: id.clone(), state: *state }))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlurmCall {
    Exists(String),
    Create(String, Vec<String>),
    Update(String, Vec<String>),
    Delete(String),
    ListAll,
}

impl SlurmCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, SlurmCall::Create(..) | SlurmCall::Update(..) | SlurmCall::Delete(..))
    }
}

/// In-memory Slurm recording every call.
#[derive(Debug, Clone, Default)]
pub struct MockSlurm {
    reservations: Arc<Mutex<BTreeMap<String, Vec<String>>>>,
    calls: Arc<Mutex<Vec<SlurmCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MockSlurm {
    pub fn add_reservation(&self, name: &str, nodenames: &[&str]) {
        self.reservations.lock().unwrap().insert(name.to_string(), nodenames.iter().map(|n| n.to_string()).collect());
    }

    pub fn reservation(&self, name: &str) -> Option<Vec<String>> {
        self.reservations.lock().unwrap().get(name).cloned()
    }

    pub fn reservation_names(&self) -> Vec<String> {
        self.reservations.lock().unwrap().keys().cloned().collect()
    }

    /// Mutations of the given reservation fail from now on.
    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<SlurmCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<SlurmCall> {
        self.calls().into_iter().filter(SlurmCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: SlurmCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failing(&self, name: &SlurmReservationName) -> Result<()> {
        if self.failing.lock().unwrap().contains(name.as_str()) {
            return Err(Error::SlurmCommand { command: format!("scontrol ... ReservationName={}", name), message: "Requested nodes are busy".to_string() });
        }
        Ok(())
    }
}

impl SlurmReservationCommands for MockSlurm {
    fn exists(&self, name: &SlurmReservationName) -> Result<bool> {
        self.record(SlurmCall::Exists(name.to_string()));
        Ok(self.reservations.lock().unwrap().contains_key(name.as_str()))
    }

    fn create(&self, name: &SlurmReservationName, _start_time: DateTime<Utc>, nodenames: &[String]) -> Result<()> {
        self.record(SlurmCall::Create(name.to_string(), nodenames.to_vec()));
        self.check_failing(name)?;
        self.reservations.lock().unwrap().insert(name.to_string(), nodenames.to_vec());
        Ok(())
    }

    fn update(&self, name: &SlurmReservationName, nodenames: &[String]) -> Result<()> {
        self.record(SlurmCall::Update(name.to_string(), nodenames.to_vec()));
        self.check_failing(name)?;
        self.reservations.lock().unwrap().insert(name.to_string(), nodenames.to_vec());
        Ok(())
    }

    fn delete(&self, name: &SlurmReservationName) -> Result<()> {
        self.record(SlurmCall::Delete(name.to_string()));
        self.check_failing(name)?;
        self.reservations.lock().unwrap().remove(name.as_str());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<SlurmReservation>> {
        self.record(SlurmCall::ListAll);
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .map(|(name, nodenames)| SlurmReservation { name: SlurmReservationName::new(name.as_str()), nodenames: nodenames.clone() })
            .collect())
    }
}
