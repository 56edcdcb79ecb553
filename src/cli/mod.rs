//! CLI module for skylogix
//!
//! This module provides:
//! - Command implementations (add, list, find, analytics, seed, etc.)
//! - Output handlers (console, JSON, quiet)
//! - Table rows for console rendering
//!
//! # Example
//!
//! ```ignore
//! use skylogix::cli::{commands, output};
//!
//! let handler = output::create_handler(output::OutputMode::Console, false);
//! commands::list_records(&store, &*handler, commands::RecordKind::Flights)?;
//! ```

pub mod commands;
pub mod output;
pub mod tables;

pub use output::{OutputEvent, OutputMode, create_handler};
