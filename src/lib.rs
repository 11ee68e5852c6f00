//! Key-addressed dialog registry for ratatui applications.
//!
//! See [`dialog`] for the registry, its controller and the mount point, and
//! [`tui`] for the bundled demo screen that drives them.

pub mod config;
pub mod dialog;
pub mod tui;
pub mod version;
