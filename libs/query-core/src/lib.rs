//! In-memory query engine shared by the catalog services.
//!
//! A request is turned into a [`Filter`] (a conjunction of predicates), an
//! optional [`SortKey`] and a [`PageRequest`]; [`execute`] applies them to a
//! snapshot of the entity collection and returns a [`Page`].

pub mod engine;
pub mod error;
pub mod filter;
pub mod page;
pub mod sort;
pub mod stats;
pub mod validation;

pub use engine::execute;
pub use error::QueryError;
pub use filter::Filter;
pub use page::{Page, PageRequest};
pub use sort::{SortDir, SortFields, SortKey, SortValue};
pub use stats::{count_by, count_where, DecimalSummary, StockCounts};
pub use validation::FieldErrors;
