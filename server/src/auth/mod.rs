//! Authentication
//!
//! Two credential forms are accepted at the gate, tried in order:
//! a first-party JWT (signature, issuer, audience and expiry all verified)
//! and a server-side session token with a DB expiry check.

pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod session;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use oauth::{IdentityClaims, OAuthConfig, OAuthService};
pub use session::generate_session_token;
