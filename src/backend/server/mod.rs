//! Server Module
//!
//! Configuration loading, application state and startup.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading (.env, TOML, environment)
//! └── init.rs         - Backend opening and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `load_config()` merges defaults, the TOML
//!    file and environment variables, then validates
//! 2. **Backends**: document and blob stores are opened per configuration
//! 3. **State Creation**: repository, services and broadcast channel
//! 4. **Router Creation**: routes, CORS, tracing and static files
//!
//! # Example
//!
//! ```rust,no_run
//! use audiodiary::backend::server::{create_app, load_config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::load_config;
pub use init::{assemble_state, build_state, create_app};
pub use state::AppState;
