//! # Drop Four
//!
//! Four-in-a-row against a depth-limited minimax opponent, played in the
//! terminal.
//!
//! ## Modules
//!
//! - [`game`] — Board with gravity placement and winner detection, players, game state
//! - [`ai`] — Minimax search engine, agent trait, random fallback agent
//! - [`ui`] — Terminal UI: human versus computer
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
