//! Core engine functionality
//!
//! Central configuration shared by the render pipeline, the turn layer, and
//! the applications built on top of them.

pub mod config;

pub use config::*;
