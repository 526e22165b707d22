//! Internal modules for the bracket console.
//!
//! This library provides command parsing, configuration, reply formatting
//! and the session driving the tournament manager, used by the be_console
//! binary.

pub mod commands;
pub mod config;
pub mod render;
pub mod session;
