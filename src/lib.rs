//! Image gateway: stock photo search and multi-provider image generation
//!
//! Provider clients normalize each third-party API into one result contract
//! so callers never need provider-specific knowledge.

pub mod app;
pub mod error;
pub mod generation;
pub mod models;
pub mod prompts;
pub mod search;

pub use error::{Error, Result};
