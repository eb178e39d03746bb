//! Command handlers for the imgsearch CLI.

pub mod build;
pub mod search;
