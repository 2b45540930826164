//! 路由注册
//! 每条路由在注册时声明访问标记，认证闸门据此放行或校验令牌

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use crate::{
    auth::middleware::{auth_gate_middleware, AuthGate, GuardedRoute, RouteAccess},
    handlers,
    middleware::{request_tracking_middleware, AppState},
};

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 带访问标记的路由表
pub struct RouteTable {
    router: Router<Arc<AppState>>,
    gate: AuthGate,
}

impl RouteTable {
    pub fn new(gate: AuthGate) -> Self {
        Self {
            router: Router::new(),
            gate,
        }
    }

    /// 注册公开路由（闸门直接放行）
    pub fn public(self, path: &str, route: MethodRouter<Arc<AppState>>) -> Self {
        self.register(path, RouteAccess::Public, route)
    }

    /// 注册受保护路由（需要有效的 Bearer 令牌）
    pub fn protected(self, path: &str, route: MethodRouter<Arc<AppState>>) -> Self {
        self.register(path, RouteAccess::Protected, route)
    }

    fn register(mut self, path: &str, access: RouteAccess, route: MethodRouter<Arc<AppState>>) -> Self {
        let guarded = GuardedRoute {
            gate: self.gate.clone(),
            access,
        };
        self.router = self
            .router
            .route(path, route.layer(from_fn_with_state(guarded, auth_gate_middleware)));
        self
    }

    pub fn into_router(self) -> Router<Arc<AppState>> {
        self.router
    }
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let gate = AuthGate::new(state.jwt_service.clone());

    RouteTable::new(gate)
        // 健康检查
        .public("/health", get(handlers::health::health_check))
        .public("/ready", get(handlers::health::readiness_check))
        // 认证
        .public("/auth/register", post(handlers::auth::register))
        .public("/auth/login", post(handlers::auth::login))
        .protected("/auth/profile", get(handlers::auth::profile))
        // 商品
        .protected(
            "/products",
            get(handlers::product::list_products).post(handlers::product::create_product),
        )
        .protected(
            "/products/{id}",
            get(handlers::product::get_product)
                .patch(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
        .into_router()
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_tracking_middleware))
        .with_state(state)
}
