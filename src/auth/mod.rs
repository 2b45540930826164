//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{
    auth_gate_middleware, extract_token, AuthContext, AuthGate, GateDecision, GuardedRoute,
    RouteAccess,
};
pub use password::PasswordHasher;
