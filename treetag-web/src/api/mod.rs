//! HTTP API handlers
//!
//! One module per screen group; every handler is a thin translator between
//! request fields and the record lifecycle or a remote-service client.

pub mod admin;
pub mod auth;
pub mod health;
pub mod identify;
pub mod images;
pub mod listings;
pub mod pages;
pub mod qr;
pub mod report;
pub mod trees;
pub mod volunteers;
