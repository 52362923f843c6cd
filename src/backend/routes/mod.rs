//! Route Configuration Module
//!
//! Assembles every HTTP route of the diary server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router, CORS, static files
//! └── api_routes.rs   - `/api` endpoints
//! ```
//!
//! Admin-only endpoints are protected by the `AdminGuard` extractor in their
//! handlers rather than by a route layer, so the guard also covers both
//! route shapes without duplication.

/// Main router creation
pub mod router;

/// API endpoints
pub mod api_routes;

pub use router::create_router;
