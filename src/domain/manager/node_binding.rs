use std::collections::HashMap;

use crate::domain::manager::CapacityBlocks;
use crate::domain::slurm::slurm_node::SlurmNode;
use crate::domain::utils::id::{CapacityBlockId, ComputeResourceName, QueueName};

/// Associates every node to the Capacity Block of its queue and compute resource.
///
/// Node lists of the previous cycle are dropped first. If two Capacity Blocks share the
/// same queue/compute resource, the one with the lowest id gets the nodes. Nodes of
/// other compute resources are ignored.
pub fn associate_nodenames_to_capacity_blocks(capacity_blocks: &mut CapacityBlocks, nodes: &[SlurmNode]) {
    let mut index: HashMap<(&QueueName, &ComputeResourceName), CapacityBlockId> = HashMap::new();
    for capacity_block in capacity_blocks.values() {
        index.entry((&capacity_block.queue_name, &capacity_block.compute_resource_name)).or_insert_with(|| capacity_block.id.clone());
    }

    let mut assignments: Vec<(CapacityBlockId, &SlurmNode)> = Vec::new();
    for node in nodes {
        if let Some(capacity_block_id) = index.get(&(&node.queue_name, &node.compute_resource_name)) {
            assignments.push((capacity_block_id.clone(), node));
        }
    }
    drop(index);

    for capacity_block in capacity_blocks.values_mut() {
        capacity_block.clear_nodenames();
    }

    for (capacity_block_id, node) in assignments {
        if let Some(capacity_block) = capacity_blocks.get_mut(&capacity_block_id) {
            debug_assert!(capacity_block.does_node_belong_to(node));
            capacity_block.add_nodename(node.name.as_str());
        }
    }
}
