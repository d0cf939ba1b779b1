pub mod ec2_dto;
pub mod fleet_config_dto;
pub mod manager_config_dto;
