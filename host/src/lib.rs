/// devsh: an interactive command-line REPL engine.
///
/// # Architecture (SEA Pattern)
///
/// - `api/` — public types re-exported at crate root
/// - `core/` — the engine (command table, dispatcher, prompt, signals, loop)
/// - `spi/` — external integration (config file, demo command handlers)
pub mod api;
pub mod core;
pub mod spi;

// Re-export the API surface at crate root for convenience.
pub use api::*;
