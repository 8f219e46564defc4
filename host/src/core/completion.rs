use devsh_readline::{Complete, Completion};
use tracing::warn;

use super::command::CommandTable;

/// Tab completer over the command table's names.
///
/// Matching is a case-insensitive substring test, so `tow` completes to
/// `findtower` and an empty partial matches everything. When nothing
/// matches, the result is a single empty candidate, never an empty
/// sequence; the line-editing facility must not be handed an empty set.
#[derive(Debug, Default)]
pub struct CommandCompleter {
    candidates: Vec<String>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: &CommandTable) -> Self {
        if table.is_empty() {
            warn!("initializing tab completion with no commands");
        }
        let mut completer = Self::new();
        for name in table.command_names() {
            completer.append(name);
        }
        completer
    }

    pub fn append(&mut self, candidate: &str) {
        self.candidates.push(candidate.to_string());
    }

    pub fn candidates(&self, partial: &str) -> Vec<String> {
        let needle = partial.to_lowercase();
        let matches: Vec<String> = self
            .candidates
            .iter()
            .filter(|c| c.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if matches.is_empty() {
            return vec![String::new()];
        }
        matches
    }
}

impl Complete for CommandCompleter {
    fn complete(&self, line: &str, pos: usize) -> Vec<Completion> {
        let before = &line[..pos.min(line.len())];
        let word = before
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or(before);
        self.candidates(word)
            .into_iter()
            .map(Completion::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_completer() -> CommandCompleter {
        let mut completer = CommandCompleter::new();
        completer.append("dev");
        completer.append("devsave");
        completer.append("status");
        completer
    }

    #[test]
    fn test_prefix_match() {
        let completer = test_completer();
        assert_eq!(completer.candidates("dev"), vec!["dev", "devsave"]);
    }

    #[test]
    fn test_substring_match() {
        let completer = test_completer();
        assert_eq!(completer.candidates("save"), vec!["devsave"]);
    }

    #[test]
    fn test_case_insensitive() {
        let completer = test_completer();
        assert_eq!(completer.candidates("DEV"), vec!["dev", "devsave"]);
    }

    #[test]
    fn test_empty_partial_matches_everything() {
        let completer = test_completer();
        assert_eq!(completer.candidates(""), vec!["dev", "devsave", "status"]);
    }

    #[test]
    fn test_no_match_yields_placeholder_never_empty() {
        let completer = test_completer();
        assert_eq!(completer.candidates("zzz"), vec![String::new()]);
    }

    #[test]
    fn test_empty_candidate_list_yields_placeholder() {
        let completer = CommandCompleter::new();
        assert_eq!(completer.candidates("dev"), vec![String::new()]);
    }

    #[test]
    fn test_complete_word_under_cursor() {
        let completer = test_completer();
        let completions = completer.complete("dev sta", 7);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].text, "status");
    }

    #[test]
    fn test_from_table_skips_aliases() {
        let mut table = CommandTable::new();
        table.add_command("dev", None, "Device Information", Some("device_info"));
        table.add_alias("ls", "ls --color -F");
        let completer = CommandCompleter::from_table(&table);
        assert_eq!(completer.candidates("l"), vec![String::new()]);
        assert_eq!(completer.candidates("d"), vec!["dev"]);
    }
}
