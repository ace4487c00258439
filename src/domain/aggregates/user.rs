//! User Aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub type UserId = u64;

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// Shown for reviews and orders whose author no longer exists.
pub const UNKNOWN_AVATAR: &str = "https://ui-avatars.com/api/?name=Unknown&background=ccc&color=000";

/// A shopper or administrator. The password is held in plain text: this
/// is a mock account store, not an authentication boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub avatar: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: NaiveDate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role { Admin, #[default] Customer }

impl User {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
    pub fn matches(&self, email: &str, password: &str) -> bool { self.email == email && self.password == password }

    pub fn register(id: UserId, registration: Registration, created_at: NaiveDate) -> Self {
        let avatar = avatar_url(&registration.name, "random", "fff");
        Self {
            id, name: registration.name, email: registration.email, password: registration.password,
            role: Role::Customer, avatar, phone: registration.phone, address: None, city: None,
            country: None, zip_code: None, created_at,
        }
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        self.name = update.name;
        self.email = update.email;
        self.phone = update.phone;
        self.address = update.address;
        self.city = update.city;
        self.country = update.country;
        self.zip_code = update.zip_code;
    }
}

/// Builds an avatar URL for a display name.
pub fn avatar_url(name: &str, background: &str, color: &str) -> String {
    let encoded: String = name.bytes()
        .map(|b| if b.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&b) { char::from(b).to_string() } else { format!("%{b:02X}") })
        .collect();
    format!("{AVATAR_SERVICE}?name={encoded}&background={background}&color={color}")
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(custom = "must_accept")]
    pub agree_to_terms: bool,
}

fn must_accept(agreed: &bool) -> Result<(), ValidationError> {
    if *agreed { Ok(()) } else { Err(ValidationError::new("terms_not_accepted")) }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
    #[validate(must_match = "new_password")]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            name: "Sok Dara".into(), email: "dara@example.com".into(), password: "secret1".into(),
            confirm_password: "secret1".into(), phone: None, agree_to_terms: true,
        }
    }

    #[test]
    fn test_registration_validation() {
        assert!(registration().validate().is_ok());
        let mut r = registration();
        r.confirm_password = "other".into();
        r.agree_to_terms = false;
        r.email = "not-an-email".into();
        let errors = r.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("confirm_password"));
        assert!(fields.contains_key("agree_to_terms"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_register_defaults_to_customer() {
        let user = User::register(3, registration(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.avatar, "https://ui-avatars.com/api/?name=Sok%20Dara&background=random&color=fff");
        assert!(user.matches("dara@example.com", "secret1"));
        assert!(!user.matches("dara@example.com", "secret"));
    }

    #[test]
    fn test_password_never_serialized() {
        let user = User::register(3, registration(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "customer");
        assert_eq!(json["createdAt"], "2025-01-01");
    }
}
