//! Business services: the cart/checkout/purchase core and authentication.
//!
//! Services orchestrate repositories and hold the store's invariants; route
//! handlers stay thin. Every service receives the caller identity as plain
//! values extracted from the session layer, never the session itself.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod purchase;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
pub use checkout::CheckoutService;
pub use purchase::PurchaseService;
