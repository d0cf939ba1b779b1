pub mod capacity_block;
pub mod clock;
pub mod ec2;
pub mod manager;
pub mod slurm;
pub mod utils;
