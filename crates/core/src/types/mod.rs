//! Shared type definitions.

pub mod email;
pub mod id;
pub mod status;
pub mod username;

pub use email::{Email, EmailError};
pub use id::{AccountId, CartId, OrderId, ProductId};
pub use status::OrderStatus;
pub use username::{Username, UsernameError};
