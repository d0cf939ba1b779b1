pub mod aws_cli_client;
pub mod capacity_reservation_provider;
