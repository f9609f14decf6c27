//! # Tree-Tagging Common Library
//!
//! Shared code for the tree-tagging service:
//! - Tree record data model (wire-exact field names, dual-shape image decode)
//! - AI profile parser
//! - Public-ID slug generation
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod model;
pub mod parse;
pub mod slug;
pub mod time;

pub use error::{Error, Result};
