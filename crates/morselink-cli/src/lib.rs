//! MorseLink CLI library
//!
//! Command-line front end for the engine: demo and keying modes over
//! simulated hardware, configuration loading, and logging setup.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
