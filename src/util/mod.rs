// osfab - util/mod.rs
//
// Utility modules: platform-identity constants, error types, logging setup.
// No dependencies on the os or platform layers.

pub mod constants;
pub mod error;
pub mod logging;
