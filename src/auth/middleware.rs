//! 认证闸门
//! 每个请求在进入处理器之前做一次判定：公开路由直接放行，
//! 受保护路由必须携带有效的 Bearer 令牌。

use crate::{
    auth::jwt::{Claims, JwtService},
    error::{AppError, AuthError},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 路由访问标记，在注册路由时指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected,
}

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub claims: Claims,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 闸门判定结果
#[derive(Debug)]
pub enum GateDecision {
    /// 放行；公开路由不附带身份
    Authorized(Option<AuthContext>),
    /// 拒绝，附带内部原因
    Rejected(AuthError),
}

/// 认证闸门，只持有只读的令牌校验器
#[derive(Clone)]
pub struct AuthGate {
    jwt_service: Arc<JwtService>,
}

impl AuthGate {
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }

    /// 对单个请求做出判定，不修改任何共享状态
    pub fn decide(&self, access: RouteAccess, headers: &HeaderMap) -> GateDecision {
        if access == RouteAccess::Public {
            return GateDecision::Authorized(None);
        }

        let token = match extract_token(headers) {
            Ok(token) => token,
            Err(reason) => return GateDecision::Rejected(reason),
        };

        let claims = match self.jwt_service.validate(token) {
            Ok(claims) => claims,
            Err(reason) => return GateDecision::Rejected(reason),
        };

        match Uuid::parse_str(&claims.sub) {
            Ok(user_id) => GateDecision::Authorized(Some(AuthContext { user_id, claims })),
            Err(_) => GateDecision::Rejected(AuthError::Malformed),
        }
    }
}

/// 绑定到某条路由的闸门状态
#[derive(Clone)]
pub struct GuardedRoute {
    pub gate: AuthGate,
    pub access: RouteAccess,
}

/// 从 Authorization 头提取 Bearer 令牌
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// 认证闸门中间件
pub async fn auth_gate_middleware(
    State(route): State<GuardedRoute>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match route.gate.decide(route.access, req.headers()) {
        GateDecision::Authorized(Some(auth_context)) => {
            tracing::debug!(user_id = %auth_context.user_id, "Request authorized");
            req.extensions_mut().insert(auth_context);
        }
        GateDecision::Authorized(None) => {}
        GateDecision::Rejected(reason) => {
            tracing::debug!(%reason, "Request rejected by auth gate");
            return Err(reason.into());
        }
    }

    Ok(next.run(req).await)
}
