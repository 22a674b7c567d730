//! Declarative workflows: schema, task dispatch, and the sequential runner.

pub mod dispatcher;
pub mod executor;
pub mod schema;
