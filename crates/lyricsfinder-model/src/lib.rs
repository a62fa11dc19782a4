pub mod error;
pub mod lyrics;
pub mod query;

pub use error::*;
pub use lyrics::*;
pub use query::*;
