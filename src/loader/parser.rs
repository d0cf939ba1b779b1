use serde::de::DeserializeOwned;
use std::fs;

use crate::api::{fleet_config_dto::FleetConfigDto, manager_config_dto::ManagerConfigDto};
use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are automatically converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    let parsed_data: T = serde_json::from_str(&data)?;
    Ok(parsed_data)
}

pub fn load_fleet_config(file_path: &str) -> Result<FleetConfigDto> {
    let fleet_config: FleetConfigDto = parse_json_file(file_path)?;
    log::debug!("Loaded fleet config with {} queues from '{}'.", fleet_config.len(), file_path);
    Ok(fleet_config)
}

pub fn load_manager_config(file_path: &str) -> Result<ManagerConfigDto> {
    parse_json_file(file_path)
}
