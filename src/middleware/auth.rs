//! Per-handler authorization layer.
//!
//! Wraps a handler with the authorization pipeline for one required permission,
//! fixed at registration time:
//!
//! ```ignore
//! .route("/actors", get(list_actors.layer(auth::require(&state, "get:actors"))))
//! ```
//!
//! On success the verified `ClaimSet` is inserted into request extensions (read it
//! with the `Claims` extractor) and the handler's response is returned unchanged.
//! On rejection the handler is not called.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::error::AppError;
use crate::services::auth::Authorizer;
use crate::state::AppState;

/// Build the layer for `permission` from the shared application state.
/// An empty permission means "authenticated only".
pub fn require(state: &AppState, permission: &str) -> RequirePermissionLayer {
    RequirePermissionLayer::new(state.auth.clone(), permission)
}

#[derive(Clone, Debug)]
pub struct RequirePermissionLayer {
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl RequirePermissionLayer {
    pub fn new(authorizer: Arc<Authorizer>, permission: &str) -> Self {
        Self {
            authorizer,
            permission: Arc::from(permission),
        }
    }
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermission<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermission {
            inner,
            authorizer: self.authorizer.clone(),
            permission: self.permission.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RequirePermission<S> {
    inner: S,
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl<S> Service<Request> for RequirePermission<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        // Call the service that was polled ready, leave the fresh clone in its place.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let authorizer = self.authorizer.clone();
        let permission = self.permission.clone();

        Box::pin(async move {
            let outcome = authorizer.authorize_headers(req.headers(), &permission).await;
            match outcome {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    inner.call(req).await
                }
                Err(err) => Ok(AppError::from(err).into_response()),
            }
        })
    }
}
