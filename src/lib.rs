//! Authentication and session core for the Counterdesk admin dashboard.
//!
//! The dashboard pages are a thin view layer over this crate: they issue
//! calls through [`client::ApiClient`], read the user from
//! [`session::SessionManager`], and sit behind the edge redirect logic in
//! [`guard`]. Credentials live in cookie-shaped records managed by
//! [`credentials`]; the one piece of real protocol here is the 401
//! intercept with single-flight token refresh in [`client`].

pub mod client;
pub mod config;
pub mod credentials;
pub mod guard;
pub mod session;
pub mod transport;

pub use client::{ApiClient, ApiError, Navigator, NoopNavigator};
pub use config::ApiConfig;
pub use credentials::{CredentialStore, MemoryCredentialStore, StoredCookie};
pub use guard::{RouteDecision, RouteGuard};
pub use session::{SessionManager, SessionPhase, User};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
