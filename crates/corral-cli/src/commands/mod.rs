//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reuses the
//! corral-core domain logic through `AppState`.

pub mod run;
pub mod serve;
pub mod validate;
