//! Command implementations for the Netsec CLI.

pub mod config;
pub mod demo;
pub mod package;
pub mod requirements;
