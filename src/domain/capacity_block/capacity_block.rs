use crate::domain::capacity_block::capacity_block_state::CapacityBlockState;
use crate::domain::slurm::slurm_node::SlurmNode;
use crate::domain::utils::id::{CapacityBlockId, ComputeResourceName, QueueName, SlurmReservationName};

/// Prefix of every Slurm reservation owned by the capacity block manager.
///
/// Reservations created by a previous process are recognized by this prefix only,
/// so changing it orphans every existing reservation.
pub const SLURM_RESERVATION_NAME_PREFIX: &str = "pcluster-";

/// A Capacity Block from the fleet config together with its EC2 state
/// and the Slurm nodes backed by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityBlock {
    pub id: CapacityBlockId,
    pub queue_name: QueueName,
    pub compute_resource_name: ComputeResourceName,
    state: CapacityBlockState,
    nodenames: Vec<String>,
}

impl CapacityBlock {
    pub fn new(id: CapacityBlockId, queue_name: QueueName, compute_resource_name: ComputeResourceName) -> Self {
        CapacityBlock { id, queue_name, compute_resource_name, state: CapacityBlockState::Unknown, nodenames: Vec::new() }
    }

    pub fn state(&self) -> CapacityBlockState {
        self.state
    }

    pub fn set_state(&mut self, state: CapacityBlockState) {
        self.state = state;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_usable()
    }

    pub fn nodenames(&self) -> &[String] {
        &self.nodenames
    }

    pub fn add_nodename(&mut self, nodename: impl Into<String>) {
        self.nodenames.push(nodename.into());
    }

    pub fn clear_nodenames(&mut self) {
        self.nodenames.clear();
    }

    pub fn does_node_belong_to(&self, node: &SlurmNode) -> bool {
        node.queue_name == self.queue_name && node.compute_resource_name == self.compute_resource_name
    }

    pub fn slurm_reservation_name(&self) -> SlurmReservationName {
        slurm_reservation_name_for(&self.id)
    }
}

fn slurm_reservation_name_for(id: &CapacityBlockId) -> SlurmReservationName {
    SlurmReservationName::new(format!("{}{}", SLURM_RESERVATION_NAME_PREFIX, id))
}

/// Recovers the Capacity Block id from a Slurm reservation name, `None` if the
/// reservation is not owned by the manager.
pub fn id_from_slurm_reservation_name(slurm_reservation_name: &str) -> Option<CapacityBlockId> {
    slurm_reservation_name.strip_prefix(SLURM_RESERVATION_NAME_PREFIX).filter(|id| !id.is_empty()).map(CapacityBlockId::new)
}
