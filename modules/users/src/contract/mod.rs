pub mod client;
pub mod error;
pub mod model;

pub use model::{AccessFields, Role, User, UserInput, UserQuery, UserStats, UserStatus};
