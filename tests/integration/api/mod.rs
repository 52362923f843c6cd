//! API integration tests
//!
//! Integration tests for all `/api` endpoints

mod admin_test;
mod upload_test;
