use crate::api::fleet_config_dto::{ComputeResourceConfigDto, FleetConfigDto};
use crate::domain::capacity_block::CapacityBlock;
use crate::domain::manager::CapacityBlocks;
use crate::domain::utils::id::{CapacityBlockId, ComputeResourceName, QueueName};
use crate::error::{Error, Result};

/// Collects the Capacity Blocks targeted by the queues/compute resources of the fleet config.
///
/// # Errors
/// `Error::MissingCapacityReservationId` if a `capacity-block` compute resource has no
/// `CapacityReservationId`. The fleet config is written by the cluster config parser,
/// so this is a broken contract and no fallback is guessed.
pub fn capacity_blocks_from_config(fleet_config: &FleetConfigDto) -> Result<CapacityBlocks> {
    let mut capacity_blocks = CapacityBlocks::new();
    log::info!("Retrieving Capacity Block reservation information from fleet config.");

    for (queue_name, queue_config) in fleet_config {
        for (compute_resource_name, compute_resource_config) in queue_config {
            if !compute_resource_config.is_capacity_block() {
                continue;
            }

            let capacity_block_id = capacity_reservation_id(queue_name, compute_resource_name, compute_resource_config)?;
            let capacity_block = CapacityBlock::new(
                capacity_block_id.clone(),
                QueueName::new(queue_name.as_str()),
                ComputeResourceName::new(compute_resource_name.as_str()),
            );

            if let Some(previous) = capacity_blocks.insert(capacity_block_id, capacity_block) {
                log::warn!(
                    "Capacity Block {} is configured for both {}/{} and {}/{}. Using {}/{}.",
                    previous.id,
                    previous.queue_name,
                    previous.compute_resource_name,
                    queue_name,
                    compute_resource_name,
                    queue_name,
                    compute_resource_name
                );
            }
        }
    }

    Ok(capacity_blocks)
}

fn capacity_reservation_id(queue_name: &str, compute_resource_name: &str, config: &ComputeResourceConfigDto) -> Result<CapacityBlockId> {
    match &config.capacity_reservation_id {
        Some(id) => Ok(CapacityBlockId::new(id.as_str())),
        None => {
            log::error!("Unable to retrieve CapacityReservationId from compute resource info: {:?}", config);
            Err(Error::MissingCapacityReservationId { queue: queue_name.to_string(), compute_resource: compute_resource_name.to_string() })
        }
    }
}
