//! Shared primitive types: errors, node paths, and property values.

mod error;
mod path;
mod value;

pub use error::{FrescoError, Result};
pub use path::NodePath;
pub use value::{PropertyType, Value};
