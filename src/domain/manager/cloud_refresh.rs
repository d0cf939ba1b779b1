use crate::domain::capacity_block::CapacityBlockState;
use crate::domain::ec2::capacity_reservation_provider::CapacityReservationProvider;
use crate::domain::manager::CapacityBlocks;
use crate::domain::utils::id::CapacityBlockId;
use crate::error::Result;

/// Merges the EC2 state of every Capacity Block into `capacity_blocks` with a single query.
///
/// Capacity Blocks missing from the EC2 response keep their current state, which is
/// `unknown` for a fresh snapshot.
pub fn update_capacity_blocks_from_ec2(capacity_blocks: &mut CapacityBlocks, ec2_client: &dyn CapacityReservationProvider) -> Result<()> {
    if capacity_blocks.is_empty() {
        return Ok(());
    }

    let capacity_block_ids: Vec<CapacityBlockId> = capacity_blocks.keys().cloned().collect();
    log::info!(
        "Retrieving updated Capacity Block reservation information from EC2 for {}",
        capacity_block_ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(",")
    );

    let capacity_reservations_info = ec2_client.describe_capacity_reservations(&capacity_block_ids)?;

    for info in capacity_reservations_info {
        match capacity_blocks.get_mut(&info.capacity_reservation_id) {
            Some(capacity_block) => capacity_block.set_state(info.state),
            None => log::warn!("EC2 returned info for Capacity Block {} which was not requested. Ignoring it.", info.capacity_reservation_id),
        }
    }

    for capacity_block in capacity_blocks.values().filter(|capacity_block| capacity_block.state() == CapacityBlockState::Unknown) {
        log::warn!(
            "Capacity Block {} of {}/{} was not found in EC2. Its nodes stay reserved until EC2 reports it active.",
            capacity_block.id,
            capacity_block.queue_name,
            capacity_block.compute_resource_name
        );
    }

    Ok(())
}
