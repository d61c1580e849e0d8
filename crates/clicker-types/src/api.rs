use serde::{Deserialize, Serialize};

// Every request field is optional at the serde level. Presence is decided by
// `validation::required`, which also rejects empty strings and zero numbers.

// -- Users --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickRequest {
    pub user_id: Option<String>,
    pub click_reward: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTokensRequest {
    pub user_id: Option<String>,
    pub tokens: Option<i64>,
}

/// Snapshot of a user's counters, as returned by `GET /api/user/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub id: String,
    pub username: Option<String>,
    pub total_clicks: i64,
    pub total_tokens: i64,
}

// -- Boosts --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBoostRequest {
    pub user_id: Option<String>,
    pub boost_type: Option<String>,
    pub price: Option<i64>,
    /// Hours. Fractional values are allowed.
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBoostResponse {
    pub message: String,
    pub active_until: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBoostResponse {
    pub boost_type: String,
    pub active_until: String,
}

// -- Misc --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_use_camel_case_fields() {
        let req: BuyBoostRequest = serde_json::from_str(
            r#"{"userId":"u1","boostType":"double","price":50,"duration":1.5}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.boost_type.as_deref(), Some("double"));
        assert_eq!(req.price, Some(50));
        assert_eq!(req.duration, Some(1.5));
    }

    #[test]
    fn missing_and_null_fields_deserialize_as_none() {
        let req: RegisterRequest = serde_json::from_str(r#"{"userId":"u1","username":null}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert!(req.username.is_none());

        let req: ClickRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_id.is_none());
        assert!(req.click_reward.is_none());
    }

    #[test]
    fn buy_boost_response_serializes_active_until_in_camel_case() {
        let resp = BuyBoostResponse {
            message: "Boost double purchased".into(),
            active_until: "2025-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["activeUntil"], "2025-01-01T00:00:00.000Z");
    }
}
