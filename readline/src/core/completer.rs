/// Completion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub display: String,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            text,
        }
    }
}

/// Trait for providing tab completions.
///
/// Consumers implement this to supply domain-specific candidates (REPL
/// command names, externally registered names). The completion context is
/// passed explicitly on every call; the editor never holds a completer,
/// so there is no hidden mutable state captured by a closure.
pub trait Complete {
    fn complete(&self, line: &str, pos: usize) -> Vec<Completion>;
}

/// No-op completer for consumers that don't need completion.
pub struct NoComplete;

impl Complete for NoComplete {
    fn complete(&self, _line: &str, _pos: usize) -> Vec<Completion> {
        Vec::new()
    }
}

/// Get common prefix of all completions
pub fn common_prefix(completions: &[Completion]) -> String {
    if completions.is_empty() {
        return String::new();
    }

    if completions.len() == 1 {
        return completions[0].text.clone();
    }

    let first = &completions[0].text;
    let mut prefix_len = first.chars().count();

    for comp in &completions[1..] {
        prefix_len = first
            .chars()
            .zip(comp.text.chars())
            .take(prefix_len)
            .take_while(|(a, b)| a == b)
            .count();
    }

    first.chars().take(prefix_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_complete() {
        let completer = NoComplete;
        let completions = completer.complete("anything", 8);
        assert!(completions.is_empty());
    }

    #[test]
    fn test_common_prefix() {
        let completions = vec![Completion::new("devsave"), Completion::new("dev")];
        assert_eq!(common_prefix(&completions), "dev");
    }

    #[test]
    fn test_common_prefix_single() {
        let completions = vec![Completion::new("status")];
        assert_eq!(common_prefix(&completions), "status");
    }

    #[test]
    fn test_common_prefix_disjoint() {
        let completions = vec![Completion::new("dev"), Completion::new("status")];
        assert_eq!(common_prefix(&completions), "");
    }

    #[test]
    fn test_common_prefix_empty() {
        let completions: Vec<Completion> = vec![];
        assert_eq!(common_prefix(&completions), "");
    }
}
