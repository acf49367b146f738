//! Domain models shared between the repository layer and route handlers.

pub mod account;
pub mod cart;
pub mod order;
pub mod product;

pub use account::Account;
pub use cart::{Cart, CartLine};
pub use order::{AccountOrder, AdminOrder, NewOrder, Order};
pub use product::{NewProduct, Product, ProductPatch};
