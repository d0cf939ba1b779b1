use std::sync::Arc;

use chrono::TimeDelta;

use crate::api::manager_config_dto::ManagerConfigDto;
use crate::domain::clock::UtcClock;
use crate::domain::ec2::aws_cli_client::AwsCliEc2Client;
use crate::domain::manager::CapacityBlockManager;
use crate::domain::slurm::scontrol::ScontrolReservationCommands;
use crate::error::Result;
use crate::loader::parser::load_fleet_config;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Builds a manager talking to EC2 through the AWS CLI and to Slurm through `scontrol`.
pub fn generate_capacity_block_manager(config: &ManagerConfigDto) -> Result<CapacityBlockManager> {
    let fleet_config = load_fleet_config(&config.fleet_config_path)?;
    log::info!("Fleet config '{}' parsed successfully.", config.fleet_config_path);

    let ec2_client = AwsCliEc2Client::new(config.aws_cli_path.as_str(), config.region.as_str());
    let slurm_commands = ScontrolReservationCommands::new(config.scontrol_path.as_str(), config.reservation_user.as_str());

    let manager = CapacityBlockManager::new(fleet_config, Box::new(ec2_client), Box::new(slurm_commands), Arc::new(UtcClock))
        .with_update_period(TimeDelta::minutes(config.update_period_minutes));

    Ok(manager)
}
