//! Request middleware: sessions and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{AuthContext, RequireAdmin, clear_account, set_account};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_keys};
