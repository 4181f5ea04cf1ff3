//! # Request Extractors
//!
//! Actix extractors that run before a handler body:
//!
//! - [`AuthenticatedUser`] - any valid bearer token
//! - [`AdminUser`] - a valid bearer token with `is_admin`
//! - [`ValidJson`] / [`ValidQuery`] - deserialize, then [`Validate`]
//!
//! All of them are synchronous with respect to the database. Handlers open
//! their connection only after every extractor has succeeded.

use std::ops::Deref;
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::error::ApiError;
use crate::auth::{bearer_token, Claims};
use crate::models::Validate;
use crate::AppState;

fn verify_request(req: &HttpRequest) -> Result<Claims, ApiError> {
    let state = req.app_data::<web::Data<Arc<AppState>>>().ok_or_else(|| {
        error!("Application state is not registered");
        ApiError::Infrastructure("Server misconfigured".to_string())
    })?;

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = bearer_token(authorization)?;
    Ok(state.tokens.verify(token)?)
}

/// The caller of a route that needs any logged-in user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verify_request(req).map(AuthenticatedUser))
    }
}

/// The caller of an admin-only route.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = verify_request(req).and_then(|claims| {
            if claims.is_admin {
                Ok(AdminUser(claims))
            } else {
                debug!("{} is not an administrator", claims.sub);
                Err(ApiError::not_admin())
            }
        });
        ready(result)
    }
}

/// JSON body that passed its field constraints.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T> Deref for ValidJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let body = fut.await?.into_inner();
            body.validate().map_err(ApiError::from)?;
            Ok(ValidJson(body))
        })
    }
}

/// Query string that passed its constraints.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<T> Deref for ValidQuery<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidQuery<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Query::<T>::from_request(req, payload);
        Box::pin(async move {
            let query = fut.await?.into_inner();
            query.validate().map_err(ApiError::from)?;
            Ok(ValidQuery(query))
        })
    }
}
