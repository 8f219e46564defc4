#![forbid(unsafe_code)]

/// devsh-readline: Line editing, history, and completion for devsh.
///
/// # Architecture (SEA Pattern)
///
/// - `api/` — public types re-exported at crate root
/// - `core/` — implementations (editor, completer, history, config)
pub mod api;
pub mod core;

// Re-export the API surface at crate root for convenience.
pub use api::*;
