use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Compute resource {compute_resource} of queue {queue} has CapacityType capacity-block but no CapacityReservationId")]
    MissingCapacityReservationId { queue: String, compute_resource: String },

    #[error("Failed to retrieve capacity reservation info from EC2: {0}")]
    CapacityReservationQuery(String),

    #[error("Slurm command `{command}` failed: {message}")]
    SlurmCommand { command: String, message: String },

    #[error("Failed to synchronize Slurm reservations: {}", .0.join("; "))]
    SlurmReservationSync(Vec<String>),

    #[error("Node name {0} does not follow the <queue>-<st|dy>-<compute resource>-<index> convention")]
    InvalidNodeName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
