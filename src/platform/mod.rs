// osfab - platform/mod.rs
//
// Host integration for the probe tool: configuration and platform paths.
// Dependencies: util, directories crate.
// Must NOT depend on: os.

pub mod config;
