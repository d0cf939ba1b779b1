use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::api::fleet_config_dto::FleetConfigDto;
use crate::api::manager_config_dto::DEFAULT_UPDATE_PERIOD_MINUTES;
use crate::domain::capacity_block::CapacityBlockState;
use crate::domain::clock::SystemClock;
use crate::domain::ec2::capacity_reservation_provider::CapacityReservationProvider;
use crate::domain::manager::{
    CapacityBlocks, cloud_refresh::update_capacity_blocks_from_ec2, fleet_projection::capacity_blocks_from_config,
    leftover_sweeper::cleanup_leftover_slurm_reservations, node_binding::associate_nodenames_to_capacity_blocks,
    reconciler::update_slurm_reservation,
};
use crate::domain::slurm::reservation_commands::SlurmReservationCommands;
use crate::domain::slurm::slurm_node::SlurmNode;
use crate::domain::utils::id::{CapacityBlockId, SlurmReservationName};
use crate::error::{Error, Result};

/// Keeps the Slurm reservations of the cluster in line with the state of its Capacity Blocks.
///
/// Nodes of a Capacity Block that is not `active` are put in a Slurm reservation so that no
/// job is scheduled on them (and they are not considered unhealthy). Once EC2 reports the
/// Capacity Block as `active` the reservation is deleted.
///
/// The manager is driven by the caller's control loop through [`CapacityBlockManager::get_reserved_nodenames`]
/// and only talks to EC2 and Slurm once per update period.
#[derive(Debug)]
pub struct CapacityBlockManager {
    fleet_config: FleetConfigDto,
    update_period: TimeDelta,
    ec2_client: Box<dyn CapacityReservationProvider>,
    slurm_commands: Box<dyn SlurmReservationCommands>,
    clock: Arc<dyn SystemClock>,

    capacity_blocks: CapacityBlocks,
    capacity_blocks_update_time: Option<DateTime<Utc>>,
    reserved_nodenames: Vec<String>,
}

impl CapacityBlockManager {
    pub fn new(
        fleet_config: FleetConfigDto,
        ec2_client: Box<dyn CapacityReservationProvider>,
        slurm_commands: Box<dyn SlurmReservationCommands>,
        clock: Arc<dyn SystemClock>,
    ) -> Self {
        CapacityBlockManager {
            fleet_config,
            update_period: TimeDelta::minutes(DEFAULT_UPDATE_PERIOD_MINUTES),
            ec2_client,
            slurm_commands,
            clock,
            capacity_blocks: CapacityBlocks::new(),
            capacity_blocks_update_time: None,
            reserved_nodenames: Vec::new(),
        }
    }

    pub fn with_update_period(mut self, update_period: TimeDelta) -> Self {
        self.update_period = update_period;
        self
    }

    /// Returns the nodes kept out of scheduling because their Capacity Block is not active.
    ///
    /// On the first call and whenever the update period is over, the Capacity Blocks are
    /// re-read from the fleet config and EC2 and the Slurm reservations are updated.
    /// Otherwise the list of the last successful update is returned without any call.
    ///
    /// # Errors
    /// Any error of the update. The previous list stays cached and the update is
    /// attempted again on the next call.
    pub fn get_reserved_nodenames(&mut self, nodes: &[SlurmNode]) -> Result<Vec<String>> {
        let now = self.clock.now();

        if self.is_time_to_update(now) {
            let (capacity_blocks, reserved_nodenames) = self.update_capacity_blocks(nodes, now)?;

            self.capacity_blocks = capacity_blocks;
            self.reserved_nodenames = reserved_nodenames;
            self.capacity_blocks_update_time = Some(now);
        }

        Ok(self.reserved_nodenames.clone())
    }

    fn is_time_to_update(&self, now: DateTime<Utc>) -> bool {
        match self.capacity_blocks_update_time {
            None => true,
            Some(update_time) => now.signed_duration_since(update_time) > self.update_period,
        }
    }

    /// Builds the new Capacity Block snapshot and the reserved nodes without touching the cached ones.
    fn update_capacity_blocks(&self, nodes: &[SlurmNode], now: DateTime<Utc>) -> Result<(CapacityBlocks, Vec<String>)> {
        let mut capacity_blocks = capacity_blocks_from_config(&self.fleet_config)?;
        update_capacity_blocks_from_ec2(&mut capacity_blocks, self.ec2_client.as_ref())?;
        associate_nodenames_to_capacity_blocks(&mut capacity_blocks, nodes);

        let slurm_reservations = self.slurm_commands.list_all()?;
        let listed_reservations: HashMap<SlurmReservationName, Vec<String>> =
            slurm_reservations.iter().map(|reservation| (reservation.name.clone(), reservation.nodenames.clone())).collect();

        let mut reserved_nodenames = Vec::new();
        let mut failures = Vec::new();

        for capacity_block in capacity_blocks.values() {
            match update_slurm_reservation(capacity_block, &listed_reservations, self.slurm_commands.as_ref(), now) {
                Ok(nodenames) => reserved_nodenames.extend(nodenames),
                Err(e) => {
                    log::error!("Unable to update Slurm reservation {} for Capacity Block {}: {}", capacity_block.slurm_reservation_name(), capacity_block.id, e);
                    failures.push(format!("{}: {}", capacity_block.slurm_reservation_name(), e));
                }
            }
        }

        failures.extend(cleanup_leftover_slurm_reservations(&slurm_reservations, &capacity_blocks, self.slurm_commands.as_ref()));

        if !failures.is_empty() {
            return Err(Error::SlurmReservationSync(failures));
        }

        Ok((capacity_blocks, reserved_nodenames))
    }

    /// Capacity Blocks of the last successful update.
    pub fn capacity_blocks(&self) -> &CapacityBlocks {
        &self.capacity_blocks
    }

    /// Configured Capacity Blocks that EC2 did not report in the last successful update.
    ///
    /// Their nodes stay reserved until EC2 reports them as active.
    pub fn unobserved_capacity_blocks(&self) -> Vec<&CapacityBlockId> {
        self.capacity_blocks.values().filter(|capacity_block| capacity_block.state() == CapacityBlockState::Unknown).map(|capacity_block| &capacity_block.id).collect()
    }

    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.capacity_blocks_update_time
    }
}
