use std::time::Instant;

use devsh_readline::History;

use super::completion::CommandCompleter;
use super::signals::SignalController;

/// Mutable per-session state the prompt and the handlers read and write.
#[derive(Debug, Clone)]
pub struct Session {
    pub hostname: String,
    pub current_path: String,
    /// Set at the start of every dispatch; the `%T` prompt token renders
    /// the time elapsed since then.
    pub response_time: Instant,
    /// Suppresses history load and save for scripted one-shot sessions.
    pub exec_on_startup: bool,
    /// Fall back to plain prompt printing when the terminal mishandles
    /// escape-laden prompts.
    pub broken_readline: bool,
}

impl Session {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            current_path: String::new(),
            response_time: Instant::now(),
            exec_on_startup: false,
            broken_readline: false,
        }
    }
}

/// Everything a command handler may touch besides the command table:
/// session state, history, the tab completer and signal control.
pub struct ReplContext {
    pub session: Session,
    pub history: History,
    pub completer: CommandCompleter,
    pub signals: SignalController,
}

impl ReplContext {
    pub fn new(
        session: Session,
        history: History,
        completer: CommandCompleter,
        signals: SignalController,
    ) -> Self {
        Self {
            session,
            history,
            completer,
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new("host1");
        assert_eq!(session.hostname, "host1");
        assert_eq!(session.current_path, "");
        assert!(!session.exec_on_startup);
        assert!(!session.broken_readline);
    }
}
