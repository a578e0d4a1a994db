use crate::{
    auth::{
        ChangePasswordRequest, CredentialCodec, CurrentAccount, LoginForm, SignupRequest,
        TokenResponse, TokenService,
    },
    error::AppError,
    store::accounts,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

const LOGIN_FAILED: &str = "Incorrect email or password";

/// Register a new account
///
/// Returns the created account without its password hash.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<SqlitePool>,
    codec: web::Data<CredentialCodec>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    let account = accounts::create(
        &pool,
        &codec,
        &signup_data.email,
        &signup_data.username,
        &signup_data.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(account))
}

/// Login
///
/// Takes a form with `username` (the account email) and `password` and returns a
/// bearer token. Unknown email and wrong password produce the same 401.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    codec: web::Data<CredentialCodec>,
    tokens: web::Data<TokenService>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let account = accounts::authenticate(&pool, &codec, &form.username, &form.password).await?;

    match account {
        Some(account) => {
            let token = tokens.issue(&account.email, Some(tokens.default_ttl()))?;
            Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
        }
        None => {
            log::info!("rejected login attempt");
            Err(AppError::Unauthorized(LOGIN_FAILED.into()))
        }
    }
}

/// The account behind the bearer token.
#[get("/users/me")]
pub async fn me(current: CurrentAccount) -> impl Responder {
    HttpResponse::Ok().json(current.0)
}

#[post("/users/change-password")]
pub async fn change_password(
    pool: web::Data<SqlitePool>,
    codec: web::Data<CredentialCodec>,
    current: CurrentAccount,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    accounts::change_password(
        &pool,
        &codec,
        current.0.id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password changed successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthMiddleware;
    use crate::config::AuthSettings;
    use crate::db;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_signup_validation() {
        let pool = db::connect_in_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();
        let settings = AuthSettings::for_testing("secret");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(CredentialCodec::new(&settings)))
                .service(signup),
        )
        .await;

        for payload in [
            json!({ "email": "invalid-email", "username": "tester", "password": "password123" }),
            json!({ "email": "test@example.com", "username": "tester", "password": "short" }),
            json!({ "email": "test@example.com", "username": "no spaces", "password": "password123" }),
        ] {
            let req = test::TestRequest::post()
                .uri("/signup")
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[actix_rt::test]
    async fn test_me_requires_token() {
        let pool = db::connect_in_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();
        let settings = AuthSettings::for_testing("secret");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(TokenService::new(&settings)))
                .service(web::scope("/api").wrap(AuthMiddleware).service(me)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/users/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Not authenticated");
    }
}
