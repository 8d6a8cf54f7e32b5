use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validators::{
    validate_display_name, validate_email, validate_password, validate_person_name, FieldErrors,
};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            display_name: user.display_name,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Profile plus the freshly issued token, returned by signup and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Validated signup; the password is still plaintext until hashed
#[derive(Debug, Clone)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

impl Signup {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            email: self.email,
            password_hash,
            display_name: self.display_name,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SignupPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl SignupPayload {
    pub fn into_signup(self, min_password_length: usize) -> Result<Signup, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.require("email", self.email, |v| validate_email(&v));
        let password = errors.require("password", self.password, |v| {
            validate_password(&v, min_password_length)
        });
        let display_name =
            errors.require("display_name", self.display_name, |v| validate_display_name(&v));
        let first_name = errors.require("first_name", self.first_name, |v| {
            validate_person_name("first_name", &v)
        });
        let last_name = errors.require("last_name", self.last_name, |v| {
            validate_person_name("last_name", &v)
        });

        match (email, password, display_name, first_name, last_name) {
            (Some(email), Some(password), Some(display_name), Some(first_name), Some(last_name))
                if errors.is_empty() =>
            {
                Ok(Signup {
                    email,
                    password,
                    display_name,
                    first_name,
                    last_name,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    /// Only presence is checked; credentials are judged against the store
    pub fn into_credentials(self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.required("email", self.email);
        let password = errors.required("password", self.password);
        match (email, password) {
            (Some(email), Some(password)) => Ok((email.trim().to_lowercase(), password)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfilePayload {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfilePayload {
    pub fn into_patch(self) -> Result<UserPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = UserPatch {
            display_name: errors.optional(self.display_name, |v| validate_display_name(&v)),
            first_name: errors
                .optional(self.first_name, |v| validate_person_name("first_name", &v)),
            last_name: errors.optional(self.last_name, |v| validate_person_name("last_name", &v)),
        };
        errors.into_result().map(|_| patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SignupPayload {
        SignupPayload {
            email: Some("Pilot@Example.com".to_string()),
            password: Some("correct-horse".to_string()),
            display_name: Some("odiesturn".to_string()),
            first_name: Some("Odie".to_string()),
            last_name: Some("Sturn".to_string()),
        }
    }

    #[test]
    fn signup_normalizes_email() {
        let signup = payload().into_signup(8).unwrap();
        assert_eq!(signup.email, "pilot@example.com");
    }

    #[test]
    fn signup_reports_every_bad_field() {
        let errors = SignupPayload {
            password: Some("short".to_string()),
            first_name: Some("odie".to_string()),
            ..payload()
        }
        .into_signup(8)
        .unwrap_err();
        assert!(errors.contains("password"));
        assert!(errors.contains("first_name"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn profile_patch_only_checks_supplied_fields() {
        let patch = ProfilePayload {
            first_name: Some("Karl".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Karl"));
        assert!(patch.display_name.is_none());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            email: "a@b.co".to_string(),
            password_hash: "$argon2id$...".to_string(),
            display_name: "abcdef".to_string(),
            first_name: "Abc".to_string(),
            last_name: "Def".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
