use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user record as persisted by the store.
///
/// Deliberately does NOT implement `Serialize`: the password hash must never
/// reach a response body. Handlers expose users through [`PublicUser`].
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Unique, matched case-sensitively on login.
    pub username: String,
    pub password_hash: String,
}

/// The externally visible shape of a user: id and username only.
///
/// Used inside the login response and as the populated `creator` reference on
/// tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
}

impl User {
    /// Builds a new user record with a fresh id. The password must already be
    /// hashed by the caller.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_drops_hash() {
        let user = User::new("alice".to_string(), "$2b$12$fakehash".to_string());
        let public = user.public();

        assert_eq!(public.id, user.id);
        assert_eq!(public.username, "alice");

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("a".to_string(), "h".to_string());
        let b = User::new("b".to_string(), "h".to_string());
        assert_ne!(a.id, b.id);
    }
}
