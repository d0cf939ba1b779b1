use crate::domain::capacity_block::capacity_block::id_from_slurm_reservation_name;
use crate::domain::manager::CapacityBlocks;
use crate::domain::slurm::reservation_commands::{SlurmReservation, SlurmReservationCommands};

/// Deletes Slurm reservations created for Capacity Blocks that are no longer in the fleet config.
///
/// Reservations not following the naming convention are never touched. A failed delete
/// does not stop the cleanup, the failures are returned as messages.
pub fn cleanup_leftover_slurm_reservations(
    slurm_reservations: &[SlurmReservation],
    capacity_blocks: &CapacityBlocks,
    slurm_commands: &dyn SlurmReservationCommands,
) -> Vec<String> {
    let mut failures = Vec::new();

    for slurm_reservation in slurm_reservations {
        let Some(capacity_block_id) = id_from_slurm_reservation_name(slurm_reservation.name.as_str()) else {
            log::debug!("Slurm reservation {} is not managed by ParallelCluster. Skipping it.", slurm_reservation.name);
            continue;
        };

        if capacity_blocks.contains_key(&capacity_block_id) {
            continue;
        }

        log::info!(
            "Found leftover slurm reservation {} for nodes {}. Related Capacity Block {} is no longer in the cluster configuration. Deleting the slurm reservation.",
            slurm_reservation.name,
            slurm_reservation.nodenames.join(","),
            capacity_block_id
        );

        if let Err(e) = slurm_commands.delete(&slurm_reservation.name) {
            log::error!("Unable to delete leftover slurm reservation {}: {}", slurm_reservation.name, e);
            failures.push(format!("{}: {}", slurm_reservation.name, e));
        }
    }

    failures
}
