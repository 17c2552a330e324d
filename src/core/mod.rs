pub mod error;

pub use error::{BagError, Result};
