//! Anime Organizer Library
//!
//! A library for organizing anime episodes and their subtitle tracks into a
//! templated library layout.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
