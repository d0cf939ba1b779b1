pub mod hostlist;
pub mod node_inventory;
pub mod reservation_commands;
pub mod scontrol;
pub mod slurm_node;
