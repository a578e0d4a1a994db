//! Request extractors forming the authorization gate.
//!
//! A request moves through these states:
//!
//! 1. `AuthMiddleware` validates the bearer token and stores a [`BearerIdentity`].
//! 2. [`CurrentAccount`] resolves that identity to a stored account (401 otherwise).
//! 3. [`OwnerScope`] compares the account id with the route's `{user_id}` segment
//!    (403 otherwise).
//!
//! A handler receiving an `OwnerScope` is authorized for one repository call scoped
//! to `OwnerScope::owner_id`. The repository still filters by owner, which is the
//! authoritative check.

use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use crate::auth::middleware::BearerIdentity;
use crate::error::AppError;
use crate::models::Account;
use crate::store::accounts;

/// The account behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl CurrentAccount {
    async fn resolve(
        identity: Option<BearerIdentity>,
        pool: Option<web::Data<SqlitePool>>,
    ) -> Result<Self, AppError> {
        let BearerIdentity(email) = identity.ok_or_else(AppError::invalid_credentials)?;
        let pool = pool.ok_or_else(|| {
            AppError::InternalServerError("database pool missing from app data".into())
        })?;

        accounts::find_by_email(&pool, &email)
            .await?
            .map(CurrentAccount)
            .ok_or_else(|| {
                log::debug!("token subject no longer resolves to an account");
                AppError::invalid_credentials()
            })
    }
}

impl FromRequest for CurrentAccount {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<BearerIdentity>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        Box::pin(async move { Self::resolve(identity, pool).await.map_err(ActixError::from) })
    }
}

/// Proof that the authenticated account matches the route's `{user_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub owner_id: i64,
}

impl OwnerScope {
    /// The coarse ownership check: the caller may only address its own id.
    pub fn check(account: &Account, path_owner: i64) -> Result<Self, AppError> {
        if account.id != path_owner {
            return Err(AppError::Forbidden(
                "Not authorized to access these tasks".into(),
            ));
        }
        Ok(OwnerScope {
            owner_id: account.id,
        })
    }

    fn path_owner(req: &HttpRequest) -> Result<i64, AppError> {
        req.match_info()
            .get("user_id")
            .ok_or_else(|| AppError::InternalServerError("route has no {user_id}".into()))?
            .parse()
            .map_err(|_| AppError::BadRequest("user_id must be an integer".into()))
    }
}

impl FromRequest for OwnerScope {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<BearerIdentity>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        let path_owner = Self::path_owner(req);

        Box::pin(async move {
            let gate = async {
                let CurrentAccount(account) = CurrentAccount::resolve(identity, pool).await?;
                OwnerScope::check(&account, path_owner?)
            };
            gate.await.map_err(ActixError::from)
        })
    }
}
