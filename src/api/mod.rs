//! API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - Process-wide access token and Application Default Credentials
//! - [`http`] - HTTP request execution
//! - [`service`] - Generated service client

pub mod auth;
pub mod http;
pub mod service;
