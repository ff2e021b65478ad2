use std::net::SocketAddr;

use axum::{
    RequestPartsExt,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use crate::error::ApiError;

/// The calling address used as the brute force bucketing key.
///
/// Prefers the first hop of `X-Forwarded-For` so the real client address
/// survives a reverse proxy; falls back to the socket peer address. The
/// fallback requires the router to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Debug, Clone)]
pub struct ClientAddr(pub String);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(addr) = forwarded_client_addr(parts) {
            return Ok(ClientAddr(addr));
        }

        let connect_info = parts
            .extract::<ConnectInfo<SocketAddr>>()
            .await
            .map_err(|_| {
                ApiError::InternalError("client address unavailable".to_string())
            })?;

        Ok(ClientAddr(connect_info.ip().to_string()))
    }
}

fn forwarded_client_addr(parts: &Parts) -> Option<String> {
    let value = parts.headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Basic-auth credentials from the `Authorization` header.
///
/// A missing or malformed header is rejected with the same uniform 401 as a
/// failed verification. Username and password are passed through verbatim;
/// the core accepts arbitrary strings on the authentication path.
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(basic)) = parts
            .extract::<Option<TypedHeader<Authorization<Basic>>>>()
            .await
            .map_err(|_| ApiError::AuthenticationFailed)?
            .ok_or(ApiError::AuthenticationFailed)?;

        Ok(BasicCredentials {
            username: basic.username().to_string(),
            password: basic.password().to_string(),
        })
    }
}
