// src/middleware.rs
use actix_web::{
    Error, FromRequest, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use futures_util::future::LocalBoxFuture;
use sqlx::{PgPool, Row};
use std::{
    future::{Ready, ready},
    rc::Rc,
};
use uuid::Uuid;

use super::jwt::JwtService;
use super::types::{AuthError, Role};

/// Identity attached to a request once its bearer token checks out.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// Account id the token was issued for.
    pub id: Uuid,
    /// Role read back from the database, not from the token.
    pub role: Role,
}

/// Marker left on the request when a bearer token was presented but did
/// not verify (bad signature, expired, or the account no longer exists).
#[derive(Debug, Clone, Copy)]
struct RejectedBearer;

/// Middleware that authenticates requests carrying a bearer token.
///
/// On success the request gains an [`AuthContext`]; requests without a
/// token pass through untouched so public routes keep working. Role
/// enforcement happens in the typed extractors below, which turn a
/// missing or rejected context into 401/403 responses.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: JwtService::new(),
        }))
    }
}

/// Service that implements the authentication middleware logic
pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: JwtService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_service = self.jwt_service.clone();

        Box::pin(async move {
            // Extract Authorization header
            let bearer = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_owned);

            if let Some(token) = bearer {
                match authenticate_token(&req, &jwt_service, &token).await {
                    Some(context) => {
                        req.extensions_mut().insert(context);
                    }
                    None => {
                        req.extensions_mut().insert(RejectedBearer);
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Verifies the token and confirms the account still exists, returning
/// the identity to attach. The role comes from the users table so a role
/// change takes effect before the token expires.
async fn authenticate_token(
    req: &ServiceRequest,
    jwt_service: &JwtService,
    token: &str,
) -> Option<AuthContext> {
    let user_id = jwt_service.extract_user_id_from_token(token).ok()?;

    let pool = req.app_data::<web::Data<PgPool>>()?;

    let row = sqlx::query("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
        .ok()??;

    let role = Role::parse(&row.get::<String, _>("role"))?;

    Some(AuthContext { id: user_id, role })
}

fn context_from_request(req: &actix_web::HttpRequest) -> Result<AuthContext, AuthError> {
    let extensions = req.extensions();

    if let Some(context) = extensions.get::<AuthContext>() {
        return Ok(*context);
    }

    if extensions.get::<RejectedBearer>().is_some() {
        Err(AuthError::InvalidToken)
    } else {
        Err(AuthError::MissingToken)
    }
}

/// Custom extractor admitting any authenticated account.
pub struct AuthenticatedUser(pub AuthContext);

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(context_from_request(req).map(AuthenticatedUser))
    }
}

/// Custom extractor admitting providers only.
pub struct ProviderUser(pub AuthContext);

impl FromRequest for ProviderUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(context_from_request(req).and_then(|context| {
            if context.role == Role::Provider {
                Ok(ProviderUser(context))
            } else {
                Err(AuthError::Forbidden)
            }
        }))
    }
}

/// Custom extractor admitting travelers only.
pub struct TravelerUser(pub AuthContext);

impl FromRequest for TravelerUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(context_from_request(req).and_then(|context| {
            if context.role == Role::Traveler {
                Ok(TravelerUser(context))
            } else {
                Err(AuthError::Forbidden)
            }
        }))
    }
}

/// Custom extractor admitting admins only.
pub struct AdminUser(pub AuthContext);

impl FromRequest for AdminUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(context_from_request(req).and_then(|context| {
            if context.role == Role::Admin {
                Ok(AdminUser(context))
            } else {
                Err(AuthError::Forbidden)
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn extractor_without_context_reports_missing_token() {
        let req = TestRequest::default().to_http_request();

        let result = AuthenticatedUser::from_request(&req, &mut actix_web::dev::Payload::None).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[actix_web::test]
    async fn admin_extractor_rejects_other_roles() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthContext {
            id: Uuid::new_v4(),
            role: Role::Traveler,
        });

        let result = AdminUser::from_request(&req, &mut actix_web::dev::Payload::None).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));

        let result = TravelerUser::from_request(&req, &mut actix_web::dev::Payload::None).await;
        assert!(result.is_ok());
    }

    #[actix_web::test]
    async fn rejected_bearer_reports_invalid_token() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(RejectedBearer);

        let result = AuthenticatedUser::from_request(&req, &mut actix_web::dev::Payload::None).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
