use chrono::Local;

use super::session::Session;

/// Named prompt color tokens and their ANSI escape sequences.
///
/// Static lookup only; color handling is not an engine concern beyond
/// substituting these into the prompt template.
pub const COLOR_TOKENS: [(&str, &str); 9] = [
    ("BLACK", "\x1b[01;30m"),
    ("RED", "\x1b[01;31m"),
    ("GREEN", "\x1b[01;32m"),
    ("YELLOW", "\x1b[01;33m"),
    ("BLUE", "\x1b[01;34m"),
    ("MAGENTA", "\x1b[01;35m"),
    ("CYAN", "\x1b[01;36m"),
    ("WHITE", "\x1b[01;37m"),
    ("CLEAR", "\x1b[00m"),
];

/// Renders the prompt template against the current session state.
///
/// Tokens: `%h` hostname (left literal when the hostname is empty),
/// `%t` wall clock, `%c` current path, `%T` seconds since the last
/// dispatch, plus the named color tokens above. Substitution is a single
/// forward scan: substituted values are never re-scanned, so a path or
/// hostname containing token text cannot expand further.
pub struct PromptRenderer {
    template: String,
}

impl PromptRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, session: &Session) -> String {
        let mut out = String::with_capacity(self.template.len() + 32);
        let mut rest = self.template.as_str();

        while let Some(idx) = rest.find('%') {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + 1..];

            if let Some((name, code)) = COLOR_TOKENS.iter().find(|(n, _)| after.starts_with(n)) {
                out.push_str(code);
                rest = &after[name.len()..];
            } else if after.starts_with('h') && !session.hostname.is_empty() {
                out.push_str(&session.hostname);
                rest = &after[1..];
            } else if after.starts_with('t') {
                out.push_str(&Local::now().format("%m.%d.%y %H:%M:%S").to_string());
                rest = &after[1..];
            } else if after.starts_with('c') {
                out.push_str(&session.current_path);
                rest = &after[1..];
            } else if after.starts_with('T') {
                let elapsed = session.response_time.elapsed().as_secs_f64();
                // The "ms" label predates this implementation and does not
                // match the computed unit (seconds); existing prompt
                // templates rely on it, so it stays.
                out.push_str(&format!("{elapsed:.2}ms"));
                rest = &after[1..];
            } else {
                // Unknown token: emit the '%' literally and keep scanning
                out.push('%');
                rest = after;
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        let mut session = Session::new("192.168.209.1");
        session.current_path = "/etc".to_string();
        session
    }

    #[test]
    fn test_color_tokens_substituted() {
        let renderer = PromptRenderer::new("%GREEN%h %MAGENTA%c%CLEAR# ");
        let prompt = renderer.render(&test_session());
        assert_eq!(
            prompt,
            "\x1b[01;32m192.168.209.1 \x1b[01;35m/etc\x1b[00m# "
        );
    }

    #[test]
    fn test_empty_hostname_leaves_token_literal() {
        let renderer = PromptRenderer::new("%h# ");
        let prompt = renderer.render(&Session::new(""));
        assert_eq!(prompt, "%h# ");
    }

    #[test]
    fn test_elapsed_token_keeps_ms_label() {
        let renderer = PromptRenderer::new("%T");
        let prompt = renderer.render(&test_session());
        assert!(prompt.ends_with("ms"), "got: {prompt}");
        // Two decimal places before the label
        let value = prompt.trim_end_matches("ms");
        assert_eq!(value.split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn test_timestamp_token_format() {
        let renderer = PromptRenderer::new("%t");
        let prompt = renderer.render(&test_session());
        // MM.DD.YY HH:MM:SS
        assert_eq!(prompt.len(), 17);
        assert_eq!(prompt.as_bytes()[2], b'.');
        assert_eq!(prompt.as_bytes()[5], b'.');
        assert_eq!(prompt.as_bytes()[8], b' ');
        assert_eq!(prompt.as_bytes()[11], b':');
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let mut session = test_session();
        session.current_path = "%RED%h".to_string();
        let renderer = PromptRenderer::new("%c# ");
        let prompt = renderer.render(&session);
        assert_eq!(prompt, "%RED%h# ");
    }

    #[test]
    fn test_unknown_token_is_literal() {
        let renderer = PromptRenderer::new("100%x done");
        let prompt = renderer.render(&test_session());
        assert_eq!(prompt, "100%x done");
    }

    #[test]
    fn test_trailing_percent() {
        let renderer = PromptRenderer::new("load 100%");
        let prompt = renderer.render(&test_session());
        assert_eq!(prompt, "load 100%");
    }

    #[test]
    fn test_all_tokens_substitute_once() {
        let renderer =
            PromptRenderer::new("%BLACK%RED%GREEN%YELLOW%BLUE%MAGENTA%CYAN%WHITE%h %c %T%CLEAR");
        let prompt = renderer.render(&test_session());
        assert!(!prompt.contains('%'), "unsubstituted token in: {prompt:?}");
        assert!(prompt.contains("192.168.209.1 /etc "));
    }
}
