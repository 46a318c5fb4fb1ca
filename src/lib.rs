//! Rubick - container hosts from the terminal
//!
//! Talks to a Rubick backend and keeps a per-host cache of container,
//! image, volume, network and compose project listings.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod hosts;
pub mod resource;
pub mod tracker;
pub mod ui;

pub use error::{RubickError, RubickResult};
