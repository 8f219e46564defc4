/// L2 API: Public types for the devsh REPL engine.
///
/// Re-exports the main user-facing types from the core layer.
pub use crate::core::builtins::register_builtins;
pub use crate::core::command::{CommandEntry, CommandTable};
pub use crate::core::completion::CommandCompleter;
pub use crate::core::dispatch::{Dispatcher, Handler, HandlerRegistry, Resolution};
pub use crate::core::prompt::PromptRenderer;
pub use crate::core::repl::Repl;
pub use crate::core::session::{ReplContext, Session};
pub use crate::core::signals::{LoopState, SignalController};
