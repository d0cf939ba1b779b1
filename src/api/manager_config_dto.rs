use serde::{Deserialize, Serialize};

pub const DEFAULT_UPDATE_PERIOD_MINUTES: i64 = 10;
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;

/// Runtime settings of the capacity block manager daemon.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfigDto {
    pub region: String,
    pub fleet_config_path: String,

    /// Minutes between two refreshes of the Capacity Block info from EC2.
    #[serde(default = "default_update_period_minutes")]
    pub update_period_minutes: i64,

    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,

    #[serde(default = "default_scontrol_path")]
    pub scontrol_path: String,

    #[serde(default = "default_sinfo_path")]
    pub sinfo_path: String,

    #[serde(default = "default_aws_cli_path")]
    pub aws_cli_path: String,

    /// User owning the Slurm reservations.
    #[serde(default = "default_reservation_user")]
    pub reservation_user: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_update_period_minutes() -> i64 {
    DEFAULT_UPDATE_PERIOD_MINUTES
}

fn default_poll_interval_seconds() -> u64 {
    DEFAULT_POLL_INTERVAL_SECONDS
}

fn default_scontrol_path() -> String {
    "scontrol".to_string()
}

fn default_sinfo_path() -> String {
    "sinfo".to_string()
}

fn default_aws_cli_path() -> String {
    "aws".to_string()
}

fn default_reservation_user() -> String {
    "slurm".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}
