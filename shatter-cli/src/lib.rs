//! Support library for the shatter CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and
//! integration tests can drive them without forking a subprocess.

pub mod cli;
pub mod logging;
