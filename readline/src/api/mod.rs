/// L2 API: Public types and traits for the readline crate.
///
/// Re-exports the main user-facing types from the core layer.
pub use crate::core::completer::{common_prefix, Complete, Completion, NoComplete};
pub use crate::core::config::ReadlineConfig;
pub use crate::core::editor::{visible_width, EditorAction, LineEditor};
pub use crate::core::history::History;
