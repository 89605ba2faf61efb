//! Order Model

use serde::{Deserialize, Serialize};

/// Cluster provisioning order, as persisted locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    pub cluster_name: String,
    pub has_control_plane: bool,
    /// Monitoring storage in GiB
    pub monitoring_storage: i64,
    /// Image registry storage in GiB
    pub image_storage: i64,
    pub alerting: bool,
    /// Payment provider order id, set once a payment has been initiated
    #[serde(rename = "paypal_id", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "db", sqlx(rename = "paypal_id"))]
    pub correlation_id: Option<String>,
}

impl Order {
    /// Correlation id usable as a join key (absent or blank ids are not)
    pub fn join_key(&self) -> Option<&str> {
        self.correlation_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
