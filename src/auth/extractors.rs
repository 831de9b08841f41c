use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The caller's verified identity, resolved once at the boundary by
/// `AuthMiddleware` and handed to handlers as an argument.
///
/// This is the only way handlers learn who is calling: there is no ambient
/// session state to consult. If the claims are missing from the request
/// extensions — the middleware did not run, or was misapplied — extraction
/// fails with 401 rather than guessing.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
}

impl FromRequest for Identity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(Identity {
                id: claims.sub,
                username: claims.name.clone(),
            })),
            None => {
                let err = AppError::Unauthorized(
                    "No verified session on request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
