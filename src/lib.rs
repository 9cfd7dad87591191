//! Tenki CLI Library
//!
//! This module exposes the cache, CLI, config, data, and resolver modules
//! for use by the binary and in integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod resolver;
