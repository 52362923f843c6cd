//! Upload Module
//!
//! Multipart audio upload for the admin.
//!
//! - **`handlers`** - reads the multipart body and publishes the entry
//! - **`validation`** - required fields and blob store limits

pub mod handlers;

pub mod validation;

pub use handlers::upload_audio;
