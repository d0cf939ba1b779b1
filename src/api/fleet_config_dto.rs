use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Value of `CapacityType` marking a compute resource backed by a Capacity Block.
pub const CAPACITY_BLOCK_CAPACITY_TYPE: &str = "capacity-block";

/// Value assumed when a compute resource does not declare a `CapacityType`.
pub const DEFAULT_CAPACITY_TYPE: &str = "on-demand";

/// Fleet configuration as written by the cluster config parser:
///
/// ```json
/// {
///     "my-queue": {
///         "my-compute-resource": {
///             "Api": "create-fleet",
///             "CapacityType": "on-demand|spot|capacity-block",
///             "Instances": [{ "InstanceType": "p4d.24xlarge" }],
///             "CapacityReservationId": "cr-0123456789abcdef0"
///         }
///     }
/// }
/// ```
pub type FleetConfigDto = BTreeMap<String, BTreeMap<String, ComputeResourceConfigDto>>;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputeResourceConfigDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_reservation_id: Option<String>,

    /// Api, Instances, Networking, ... are not used here but kept for logging.
    #[serde(flatten)]
    pub extra_fields: HashMap<String, serde_json::Value>,
}

impl ComputeResourceConfigDto {
    pub fn capacity_type(&self) -> &str {
        self.capacity_type.as_deref().unwrap_or(DEFAULT_CAPACITY_TYPE)
    }

    pub fn is_capacity_block(&self) -> bool {
        self.capacity_type() == CAPACITY_BLOCK_CAPACITY_TYPE
    }
}
