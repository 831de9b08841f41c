use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest, SessionKeys,
        SignupRequest,
    },
    error::AppError,
    models::User,
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Sign up a new user
///
/// Hashes the password and inserts the user. The store enforces username
/// uniqueness atomically, so there is no separate existence check here — a
/// duplicate surfaces as `StoreError::UsernameTaken` and becomes a 409.
#[post("/signup")]
pub async fn signup(
    store: web::Data<dyn Store>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let signup_data = signup_data.into_inner();

    let password_hash = hash_password(&signup_data.password)?;
    let user = User::new(signup_data.username, password_hash);

    store.insert_user(user).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully!"
    })))
}

/// Log in
///
/// Authenticates by exact username match plus bcrypt verification and issues
/// a session token. An unknown username and a wrong password produce the
/// same generic 401, so the endpoint cannot be used to enumerate accounts.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    keys: web::Data<SessionKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = store.find_user_by_username(&login_data.username).await?;

    match user {
        Some(user) => {
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = generate_token(&keys, &user)?;
                Ok(HttpResponse::Ok().json(AuthResponse {
                    token,
                    user: user.public(),
                }))
            } else {
                Err(AppError::Unauthorized("Invalid username or password".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid username or password".into())),
    }
}
