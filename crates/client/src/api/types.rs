//! Wire types for the meal planner backend.

use meal_planner_core::{SettingsTheme, UserId, UserRole};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error body returned by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// `POST /login` body.
///
/// The backend names the field `password_hash` but expects the plain password.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// `POST /login` response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// `POST /createUser` body.
#[derive(Serialize)]
pub struct CreateUserRequest<'a> {
    pub username: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub rol: UserRole,
}

/// A user account as returned by the `/users` and `/usuarios` endpoints.
///
/// The wire format carries `password_hash`; it is never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub roles: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// `PATCH /usuarios/{id}` body. Absent fields are left unchanged.
#[derive(Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub rol: Option<String>,
}

/// Partial profile update. `user_id` cannot be changed.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<String>,
}

impl ProfileUpdate {
    /// True if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.rol.is_none()
    }
}

/// Per-user application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub theme: SettingsTheme,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub notifications: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: SettingsTheme::default(),
            language: default_language(),
            model: String::new(),
            notifications: false,
        }
    }
}

fn default_language() -> String {
    "es".to_string()
}

/// Partial settings update.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<SettingsTheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
}

/// A purchasable subscription plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// `POST /api/purchase` body.
#[derive(Serialize)]
pub struct PurchaseRequest<'a> {
    pub plan: &'a str,
}

/// `GET /api/user/status` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_user_ignores_password_hash() {
        let json = r#"{
            "user_id": 7,
            "email": "a@b.com",
            "username": "ana",
            "full_name": "Ana B",
            "password_hash": "$2b$12$secret",
            "roles": "admin",
            "created_at": "2024-01-01",
            "updated_at": "2024-01-02"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, UserId::new(7));
        assert_eq!(user.roles.as_deref(), Some("admin"));
        assert!(!format!("{user:?}").contains("secret"));
    }

    #[test]
    fn test_plan_price_from_number() {
        let plan: SubscriptionPlan = serde_json::from_str(
            r#"{"id":"pro","name":"Pro","price":10.5,"benefits":["Plans"]}"#,
        )
        .unwrap();
        assert_eq!(plan.price, Decimal::from_str("10.5").unwrap());
        assert_eq!(plan.benefits, vec!["Plans".to_string()]);
    }

    #[test]
    fn test_status_plan_optional() {
        let status: SubscriptionStatus = serde_json::from_str(r#"{"premium":true}"#).unwrap();
        assert!(status.premium);
        assert!(status.plan.is_none());
    }

    #[test]
    fn test_partial_updates_skip_unset_fields() {
        let update = ProfileUpdate {
            full_name: Some("Ana B".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"full_name":"Ana B"}"#
        );

        let settings = SettingsUpdate {
            theme: Some(SettingsTheme::Dark),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"theme":"dark"}"#
        );

        assert_eq!(serde_json::to_string(&UserUpdate::default()).unwrap(), "{}");
    }

    #[test]
    fn test_settings_defaults() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.theme, SettingsTheme::System);
    }
}
