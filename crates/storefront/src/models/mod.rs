//! Domain models for storefront.
//!
//! These types are validated domain objects, separate from the database row
//! types the repositories map from.

pub mod cart;
pub mod delivery;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartItem;
pub use delivery::DeliveryInfo;
pub use order::{NewOrder, NewOrderLine, Order, OrderLine};
pub use product::Product;
pub use session::{CurrentUser, session_keys};
pub use user::User;
