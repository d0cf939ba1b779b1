pub mod capacity_block_manager;
pub mod cloud_refresh;
pub mod fleet_projection;
pub mod leftover_sweeper;
pub mod node_binding;
pub mod reconciler;

pub use capacity_block_manager::CapacityBlockManager;

use std::collections::BTreeMap;

use crate::domain::capacity_block::CapacityBlock;
use crate::domain::utils::id::CapacityBlockId;

/// Capacity Blocks of one refresh cycle, ordered by id.
pub type CapacityBlocks = BTreeMap<CapacityBlockId, CapacityBlock>;
