//! Core business logic modules.

pub mod materializer;
pub mod parser;
pub mod planner;
pub mod scanner;
pub mod sequencer;
pub mod session;
