//! Admin Authentication Module
//!
//! The single admin account: credential setup, login, password reset, and
//! the per-request check that guards admin-only endpoints.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── credentials.rs  - AdminService (bcrypt, state transitions, guard check)
//! ├── sessions.rs     - JWT session tokens
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── setup.rs    - check, setup and reset
//!     └── login.rs    - login and verify
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Check**: front-end asks whether an admin exists
//! 2. **Setup**: password and security question/answer are hashed and stored
//! 3. **Login**: password verified, JWT session token returned
//! 4. **Admin requests**: bearer token, or the raw password / shared secret
//!    depending on the configured scheme
//! 5. **Reset**: security answer verified, password replaced, older tokens
//!    invalidated
//!
//! # Security
//!
//! - Password and security answer are stored as bcrypt hashes
//! - The shared secret is compared in constant time
//! - Failed checks answer 401 without saying which part was wrong

/// Credential service
pub mod credentials;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for admin endpoints
pub mod handlers;

pub use credentials::{AdminService, PresentedCredentials};
pub use handlers::types::{LoginRequest, LoginResponse, SetupRequest, SetupStatus};
pub use sessions::SessionKeys;
