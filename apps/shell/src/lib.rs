//! Command layer between a user interface and the Stockbook engine.
//!
//! [`state::AppState`] exposes the operations a front end triggers (add, load, save,
//! consume) and owns the live store plus the session file. [`commands::Shell`] is a small
//! line-oriented front end over it.

pub mod commands;
pub mod state;
