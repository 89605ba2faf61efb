//! Payment provider order detail and the reconciled listing entry

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::order::Order;

/// Order as reported by the payment provider
///
/// Only `id` matters for joining; everything else is passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOrderDetail {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderOrderDetail {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: None,
            intent: None,
            create_time: None,
            update_time: None,
            extra: Map::new(),
        }
    }
}

/// Local order paired with its provider detail, if one was resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub order: Order,
    pub detail: Option<ProviderOrderDetail>,
}

impl EnrichedOrder {
    pub fn is_enriched(&self) -> bool {
        self.detail.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "intent": "CAPTURE",
            "purchase_units": [{ "amount": { "currency_code": "EUR", "value": "42.00" } }],
            "links": []
        });
        let detail: ProviderOrderDetail = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(detail.id, "5O190127TN364715T");
        assert_eq!(detail.status.as_deref(), Some("COMPLETED"));
        assert!(detail.extra.contains_key("purchase_units"));

        assert_eq!(serde_json::to_value(&detail).unwrap(), raw);
    }

    #[test]
    fn test_detail_requires_id() {
        let raw = serde_json::json!({ "status": "CREATED" });
        assert!(serde_json::from_value::<ProviderOrderDetail>(raw).is_err());
    }

    #[test]
    fn test_missing_detail_serializes_as_null() {
        let order = Order {
            id: 9,
            user_id: "u".into(),
            cluster_name: "ab".into(),
            has_control_plane: false,
            monitoring_storage: 1,
            image_storage: 1,
            alerting: false,
            correlation_id: None,
        };
        let enriched = EnrichedOrder {
            order,
            detail: None,
        };
        assert!(!enriched.is_enriched());
        let json = serde_json::to_value(&enriched).unwrap();
        assert!(json["detail"].is_null());
        assert_eq!(json["order"]["id"], 9);
    }
}
