pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;

// Re-export necessary items
pub use extractors::Identity;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims, SessionKeys};

/// Represents the payload for a signup request. Both fields are required and
/// must be non-empty; anything beyond that is the user's business.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

/// Represents the payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

/// Response body for a successful login: the session token plus the public
/// identity it is bound to.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            username: "alice".to_string(),
            password: "hunter2!".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_username = SignupRequest {
            username: "".to_string(),
            password: "hunter2!".to_string(),
        };
        assert!(empty_username.validate().is_err());

        let empty_password = SignupRequest {
            username: "alice".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            username: "alice".to_string(),
            password: "hunter2!".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = LoginRequest {
            username: "".to_string(),
            password: "".to_string(),
        };
        assert!(empty.validate().is_err());
    }
}
