//! Safe SQL builder: identifiers from the catalog only, values as parameters.

mod builder;
mod params;
pub use builder::*;
