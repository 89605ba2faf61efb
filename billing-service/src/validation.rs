//! Order field rules
//!
//! Rules run through `validator`; every rule on every field is evaluated and
//! the failures are folded into one [`ValidationFailure`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use shared::Order;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

/// Lowercase alphanumerics and hyphens, alphanumeric at both ends (2+ chars)
static CLUSTER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").expect("cluster name pattern compiles")
});

/// 8-4-4-4-12 groups of ASCII alphanumerics (not limited to hex)
static UUID_SHAPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{8}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{12}$")
        .expect("uuid pattern compiles")
});

/// Order fields as accepted on create and update
///
/// Missing fields take their zero value and are then judged by the rules,
/// so an absent `cluster_name` fails validation rather than decoding.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct OrderForm {
    #[validate(regex(path = *UUID_SHAPED, code = "uuid"))]
    pub user_id: String,
    #[validate(
        regex(path = *CLUSTER_NAME, code = "isvalidclustername"),
        custom(function = "alphanumeric_edges")
    )]
    pub cluster_name: String,
    pub has_control_plane: bool,
    pub monitoring_storage: i64,
    pub image_storage: i64,
    pub alerting: bool,
    #[serde(rename = "paypal_id")]
    pub correlation_id: Option<String>,
}

impl OrderForm {
    pub fn into_order(self, id: i64) -> Order {
        Order {
            id,
            user_id: self.user_id,
            cluster_name: self.cluster_name,
            has_control_plane: self.has_control_plane,
            monitoring_storage: self.monitoring_storage,
            image_storage: self.image_storage,
            alerting: self.alerting,
            correlation_id: self.correlation_id,
        }
    }
}

/// All fields that broke at least one rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("One or more parameters do not match the required format: {}", fields.join(", "))]
pub struct ValidationFailure {
    /// Failing field names, sorted
    pub fields: Vec<String>,
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        Self { fields }
    }
}

/// Run every rule against `form`
pub fn check(form: &OrderForm) -> Result<(), ValidationFailure> {
    form.validate().map_err(ValidationFailure::from)
}

pub fn is_valid_cluster_name(value: &str) -> bool {
    CLUSTER_NAME.is_match(value)
}

pub fn is_uuid_shaped(value: &str) -> bool {
    UUID_SHAPED.is_match(value)
}

/// First code point is a Unicode letter or digit
pub fn starts_with_alphanumeric(value: &str) -> bool {
    value.chars().next().is_some_and(char::is_alphanumeric)
}

/// Last code point is a Unicode letter or digit
pub fn ends_with_alphanumeric(value: &str) -> bool {
    value.chars().next_back().is_some_and(char::is_alphanumeric)
}

fn alphanumeric_edges(value: &str) -> Result<(), ValidationError> {
    if !starts_with_alphanumeric(value) {
        return Err(ValidationError::new("startswithalphanum")
            .with_message(Cow::Borrowed("must start with a letter or digit")));
    }
    if !ends_with_alphanumeric(value) {
        return Err(ValidationError::new("endswithalphanum")
            .with_message(Cow::Borrowed("must end with a letter or digit")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "12345678-1234-1234-1234-123456789012";

    fn form(user_id: &str, cluster_name: &str) -> OrderForm {
        OrderForm {
            user_id: user_id.into(),
            cluster_name: cluster_name.into(),
            monitoring_storage: 10,
            image_storage: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_cluster_names() {
        for ok in ["a1-b2", "abc", "ab", "0-0"] {
            assert!(is_valid_cluster_name(ok), "{ok} should pass");
        }
        for bad in ["-abc", "abc-", "AB", "a", "", "ab_c", "ab c"] {
            assert!(!is_valid_cluster_name(bad), "{bad} should fail");
        }
    }

    #[test]
    fn test_uuid_shaped() {
        assert!(is_uuid_shaped(USER));
        // Letters beyond hex are accepted.
        assert!(is_uuid_shaped("zzzzzzzz-ZZZZ-gggg-1234-abcdefghijkl"));
        assert!(!is_uuid_shaped("1234567-1234-1234-1234-123456789012"));
        assert!(!is_uuid_shaped("12345678-1234-1234-1234-1234567890123"));
        assert!(!is_uuid_shaped("12345678_1234_1234_1234_123456789012"));
        assert!(!is_uuid_shaped("12345678-1234-1234-1234-12345678901é"));
    }

    #[test]
    fn test_alphanumeric_edges_use_unicode_classes() {
        assert!(starts_with_alphanumeric("été"));
        assert!(ends_with_alphanumeric("x9"));
        assert!(ends_with_alphanumeric("naïve٣"));
        assert!(!starts_with_alphanumeric("_x"));
        assert!(!ends_with_alphanumeric("x-"));
        assert!(!starts_with_alphanumeric(""));
        assert!(!ends_with_alphanumeric(""));
    }

    #[test]
    fn test_alphanumeric_edges_error_codes() {
        assert_eq!(
            alphanumeric_edges("-a").unwrap_err().code,
            "startswithalphanum"
        );
        assert_eq!(alphanumeric_edges("a-").unwrap_err().code, "endswithalphanum");
        assert!(alphanumeric_edges("a-b").is_ok());
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(check(&form(USER, "a1-b2")).is_ok());
    }

    #[test]
    fn test_all_failing_fields_are_reported() {
        let failure = check(&form("not-a-uuid", "-abc")).unwrap_err();
        assert_eq!(failure.fields, vec!["cluster_name", "user_id"]);
        assert_eq!(
            failure.to_string(),
            "One or more parameters do not match the required format: cluster_name, user_id"
        );
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let form: OrderForm = serde_json::from_str("{}").unwrap();
        let failure = check(&form).unwrap_err();
        assert_eq!(failure.fields, vec!["cluster_name", "user_id"]);
    }

    #[test]
    fn test_into_order_carries_fields() {
        let mut f = form(USER, "abc");
        f.correlation_id = Some("PAY-9".into());
        let order = f.into_order(7);
        assert_eq!(order.id, 7);
        assert_eq!(order.cluster_name, "abc");
        assert_eq!(order.correlation_id.as_deref(), Some("PAY-9"));
    }

    #[test]
    fn test_form_ignores_incoming_id() {
        let f: OrderForm = serde_json::from_value(serde_json::json!({
            "id": 999,
            "user_id": USER,
            "cluster_name": "abc",
            "paypal_id": "PAY-1"
        }))
        .unwrap();
        assert_eq!(f.into_order(3).id, 3);
    }
}
