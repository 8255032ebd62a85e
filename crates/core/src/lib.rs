pub mod aggregate;
pub mod message;
pub mod once;
pub mod tool_card;

pub use aggregate::{aggregate, aggregate_with, AggregatePolicy};
pub use message::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
