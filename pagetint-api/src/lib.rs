//! # pagetint-api
//!
//! REST API server for the pagetint document analyzer.

mod api;
pub use api::{
    analyze_document, app, health_check, AnalyzeParams, AppError, ErrorResponse,
};

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
