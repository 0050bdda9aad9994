pub mod client;
pub mod error;
pub mod model;

pub use model::{Order, OrderDetails, OrderInput, OrderListQuery, OrderStatus};
