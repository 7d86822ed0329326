//! Bearer authentication and authorization.
//!
//! Dual-token system: short-lived access tokens (1 hour, stateless JWT) and
//! long-lived refresh tokens (60 days, opaque and database-tracked). Clients
//! renew access tokens explicitly through the refresh endpoint.

mod credentials;
mod errors;
mod extractors;
mod guard;
mod login;
mod state;

pub use credentials::{API_KEY_HEADER, api_key, bearer_token};
pub use errors::AuthError;
pub use extractors::{Auth, BearerToken};
pub use guard::{authenticate, authorize_ownership, authorize_service_key};
pub use login::{LoginSession, login};
pub use state::HasAuthBackend;
