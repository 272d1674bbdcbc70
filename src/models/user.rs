use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account that owns boards
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Normalized (trimmed, lower-cased) email, unique across users
    pub email: String,
    /// Argon2id PHC string (never serialized)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated identity making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// A login session, looked up by the SHA-256 hash of its bearer token
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Request to register a new account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request to log in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Credentials after validation
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self, min_password_length: usize) -> Result<Credentials, String> {
        let email = normalize_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Email and password required".to_string());
        }
        if self.password.chars().count() < min_password_length {
            return Err(format!(
                "Password must be at least {} characters long",
                min_password_length
            ));
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, String> {
        let email = normalize_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Email and password required".to_string());
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

/// Trim and lower-case an email, rejecting obviously malformed ones
pub fn normalize_email(email: &str) -> Result<String, String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err("Email and password required".to_string());
    }
    if email.contains('\0') {
        return Err("Invalid email address".to_string());
    }
    if email.len() > 254 {
        return Err("Email must be 254 characters or less".to_string());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err("Invalid email address".to_string()),
    }
}

/// Response after registering
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub message: String,
}

/// Response after logging in (token is only returned here)
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM ").unwrap(), "alice@example.com");
        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("alice@localhost").is_err());
        assert!(normalize_email("ali\0ce@example.com").is_err());
    }

    #[test]
    fn test_register_requires_password_length() {
        let req = RegisterRequest {
            email: "a@b.io".into(),
            password: "short".into(),
        };
        let err = req.validate(8).unwrap_err();
        assert!(err.contains("at least 8"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req = LoginRequest {
            email: "a@b.io".into(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
