//! Hookify - authenticated webhook receiver.
//!
//! Incoming webhook bodies are authenticated with HMAC-SHA256 before they are
//! accepted. The [`signature`] module is the verification core and knows
//! nothing about HTTP; [`web`] wires it into an axum router.
//!
//! ## Flow
//!
//! ```text
//! POST /webhook → signature header → decode tag → SignatureValidator::verify → 200 / 401
//! ```

pub mod config;
pub mod signature;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use signature::{constant_time_eq, SignatureValidator, Tag, TAG_LEN};
pub use web::{router, AppState, SignatureEncoding};
