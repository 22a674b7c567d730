//! Corral CLI library — command implementations, exposed for integration
//! tests to exercise the same code paths as the binary.

pub mod commands;
