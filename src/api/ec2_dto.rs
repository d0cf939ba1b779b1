use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root response object of `aws ec2 describe-capacity-reservations --output json`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCapacityReservationsResponse {
    #[serde(default)]
    pub capacity_reservations: Vec<CapacityReservationDto>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityReservationDto {
    pub capacity_reservation_id: String,

    // payment-pending, pending, active, expired, payment-failed, ...
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Captures any attribute not listed above
    #[serde(flatten)]
    pub extra_fields: HashMap<String, serde_json::Value>,
}
