use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a Capacity Block reservation as reported by EC2.
///
/// Only [`CapacityBlockState::is_usable`] drives the Slurm reservation handling,
/// the remaining variants are kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapacityBlockState {
    PaymentPending,
    Pending,
    Active,
    Expired,
    PaymentFailed,

    /// No info from EC2 yet, or EC2 reported a state not listed above.
    #[default]
    Unknown,
}

impl CapacityBlockState {
    /// Returns true if the nodes of the Capacity Block can run jobs.
    pub fn is_usable(&self) -> bool {
        matches!(self, CapacityBlockState::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityBlockState::PaymentPending => "payment-pending",
            CapacityBlockState::Pending => "pending",
            CapacityBlockState::Active => "active",
            CapacityBlockState::Expired => "expired",
            CapacityBlockState::PaymentFailed => "payment-failed",
            CapacityBlockState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CapacityBlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapacityBlockState {
    type Err = String;

    fn from_str(state: &str) -> Result<CapacityBlockState, Self::Err> {
        match state {
            "payment-pending" => Ok(CapacityBlockState::PaymentPending),
            "pending" => Ok(CapacityBlockState::Pending),
            "active" => Ok(CapacityBlockState::Active),
            "expired" => Ok(CapacityBlockState::Expired),
            "payment-failed" => Ok(CapacityBlockState::PaymentFailed),
            "unknown" => Ok(CapacityBlockState::Unknown),
            _ => Err(state.to_string()),
        }
    }
}

impl From<&str> for CapacityBlockState {
    /// Lenient conversion used for EC2 responses.
    fn from(state: &str) -> Self {
        CapacityBlockState::from_str(state).unwrap_or_else(|unexpected| {
            log::warn!("Unexpected Capacity Block state {}. Handling it as unknown.", unexpected);
            CapacityBlockState::Unknown
        })
    }
}
