use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::capacity_block::CapacityBlock;
use crate::domain::slurm::reservation_commands::SlurmReservationCommands;
use crate::domain::utils::id::SlurmReservationName;
use crate::error::Result;

/// What has to happen to the Slurm reservation of a Capacity Block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    Create,
    Update,
    Delete,
    Nothing,
}

impl fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ReservationAction::Create => "Creating related",
            ReservationAction::Update => "Updating existing related",
            ReservationAction::Delete => "Deleting related",
            ReservationAction::Nothing => "Nothing to do for",
        };
        f.write_str(description)
    }
}

/// Decides the action for a Capacity Block.
///
/// `current_nodenames` is the node list of the existing reservation if known, it is
/// only used to skip updates that would not change anything.
pub fn decide_action(is_usable: bool, nodenames: &[String], reservation_exists: bool, current_nodenames: Option<&[String]>) -> ReservationAction {
    // A reservation without nodes cannot exist in Slurm, nothing is withheld.
    if is_usable || nodenames.is_empty() {
        return if reservation_exists { ReservationAction::Delete } else { ReservationAction::Nothing };
    }

    if !reservation_exists {
        return ReservationAction::Create;
    }

    match current_nodenames {
        Some(current) if same_nodes(current, nodenames) => ReservationAction::Nothing,
        _ => ReservationAction::Update,
    }
}

fn same_nodes(left: &[String], right: &[String]) -> bool {
    left.iter().collect::<HashSet<_>>() == right.iter().collect::<HashSet<_>>()
}

/// Creates, updates or deletes the Slurm reservation of the Capacity Block according to its state.
///
/// Returns the nodes kept out of scheduling by the reservation, empty if the Capacity Block is active.
pub fn update_slurm_reservation(
    capacity_block: &CapacityBlock,
    listed_reservations: &HashMap<SlurmReservationName, Vec<String>>,
    slurm_commands: &dyn SlurmReservationCommands,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let slurm_reservation_name = capacity_block.slurm_reservation_name();
    let nodenames = capacity_block.nodenames();

    let reservation_exists = slurm_commands.exists(&slurm_reservation_name)?;
    let current_nodenames = listed_reservations.get(&slurm_reservation_name).map(Vec::as_slice);

    let action = decide_action(capacity_block.is_active(), nodenames, reservation_exists, current_nodenames);

    log::info!(
        "Capacity Block reservation {} is in state {}. {} Slurm reservation {} for nodes {}.",
        capacity_block.id,
        capacity_block.state(),
        action,
        slurm_reservation_name,
        nodenames.join(",")
    );

    match action {
        ReservationAction::Create => slurm_commands.create(&slurm_reservation_name, now, nodenames)?,
        ReservationAction::Update => slurm_commands.update(&slurm_reservation_name, nodenames)?,
        ReservationAction::Delete => slurm_commands.delete(&slurm_reservation_name)?,
        ReservationAction::Nothing => {}
    }

    if capacity_block.is_active() { Ok(Vec::new()) } else { Ok(nodenames.to_vec()) }
}
