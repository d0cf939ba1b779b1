pub mod capacity_block;
pub mod capacity_block_state;

pub use capacity_block::{CapacityBlock, SLURM_RESERVATION_NAME_PREFIX};
pub use capacity_block_state::CapacityBlockState;
