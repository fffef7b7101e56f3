//! Branchtale Engine library.
//!
//! Server-side code for publishing, editing and reading branching stories.
//!
//! ## Structure
//!
//! - `use_cases/` - Authoring, library, reading and asset operations
//! - `stores/` - In-memory reading sessions
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
