//! Diary Module
//!
//! Entries, comments, play counting, visit tracking and the admin analytics
//! report.
//!
//! - **`service`** - `DiaryService`, every operation as one repository update
//! - **`handlers`** - HTTP handlers for the public and admin diary routes

pub mod service;

pub mod handlers;

pub use service::{AudioUpload, DiaryService};
