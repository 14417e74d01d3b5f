//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services: request
//! decoding, DTO mapping and error translation.

pub mod rest;

pub use rest::{api_routes, ApiError, ApiResult};
