//! Configuration loader and schema types.
//!
//! Settings come from struct defaults, an optional TOML file and `RONDO__*`
//! environment overrides, in that order of precedence (lowest to highest).

mod load;
mod schema;

pub use load::*;
pub use schema::*;
