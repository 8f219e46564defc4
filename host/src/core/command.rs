use std::io::{self, Write};

/// One entry in the command table.
///
/// `handler` names a registered handler; entries without one are listed by
/// help but never matched by dispatch (the input falls through to the
/// fallback handler). Aliases are literal prefixes prepended to the trailing
/// arguments at dispatch time.
#[derive(Debug, Clone)]
pub enum CommandEntry {
    Command {
        name: String,
        args_hint: Option<String>,
        description: String,
        handler: Option<String>,
    },
    Alias {
        name: String,
        expansion: String,
    },
}

/// Ordered command/alias registry. Insertion order is scan order; name
/// uniqueness is not enforced, and dispatch deliberately scans past the
/// first match (duplicate entries all fire).
#[derive(Debug, Default)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CommandEntry) {
        self.entries.push(entry);
    }

    pub fn add_command(
        &mut self,
        name: &str,
        args_hint: Option<&str>,
        description: &str,
        handler: Option<&str>,
    ) {
        self.entries.push(CommandEntry::Command {
            name: name.to_string(),
            args_hint: args_hint.map(str::to_string),
            description: description.to_string(),
            handler: handler.map(str::to_string),
        });
    }

    pub fn add_alias(&mut self, name: &str, expansion: &str) {
        self.entries.push(CommandEntry::Alias {
            name: name.to_string(),
            expansion: expansion.to_string(),
        });
    }

    /// Parse a `name=expansion` alias definition and append it. Returns the
    /// parsed pair, or `None` when the separator is missing; a malformed
    /// definition is silently dropped.
    pub fn define_alias(&mut self, definition: &str) -> Option<(String, String)> {
        let eq = definition.find('=')?;
        let name = definition[..eq].to_string();
        let expansion = definition[eq + 1..].to_string();
        self.add_alias(&name, &expansion);
        Some((name, expansion))
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Names of all Command entries, in table order (aliases excluded).
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            CommandEntry::Command { name, .. } => Some(name.as_str()),
            CommandEntry::Alias { .. } => None,
        })
    }

    /// Print help to stdout. See `write_help`.
    pub fn print_help(&self, prefix: &str) -> bool {
        let mut stdout = io::stdout();
        self.write_help(&mut stdout, prefix).unwrap_or(false)
    }

    /// Write a help listing. With an empty prefix every entry is included,
    /// aliases too; a non-empty prefix selects Command entries whose name
    /// starts with it (case-sensitive). Returns whether anything matched a
    /// non-empty prefix, else always false.
    pub fn write_help(&self, out: &mut dyn Write, prefix: &str) -> io::Result<bool> {
        let mut matched = false;

        for entry in &self.entries {
            match entry {
                CommandEntry::Command {
                    name,
                    args_hint,
                    description,
                    ..
                } if prefix.is_empty() || name.starts_with(prefix) => {
                    let label = match args_hint {
                        Some(hint) => format!("{name} {hint}"),
                        None => name.clone(),
                    };
                    writeln!(out, "{label:<20} - {description}")?;
                    matched = true;
                }
                CommandEntry::Alias { name, expansion } if prefix.is_empty() => {
                    writeln!(out, "Alias: {name:<20} - {expansion}")?;
                    matched = true;
                }
                _ => {}
            }
        }

        writeln!(out)?;
        Ok(if prefix.is_empty() { false } else { matched })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_table() -> CommandTable {
        let mut table = CommandTable::new();
        table.add_command("dev", Some("[-f]"), "Device Information", Some("device_info"));
        table.add_command("devsave", Some("[-f]"), "Download Remote Device CFG", Some("device_cfg_save"));
        table.add_command("status", None, "System and Signal Status", Some("status"));
        table.add_alias("ls", "ls --color -F");
        table
    }

    fn help_output(table: &CommandTable, prefix: &str) -> (String, bool) {
        let mut buf = Vec::new();
        let matched = table.write_help(&mut buf, prefix).unwrap();
        (String::from_utf8(buf).unwrap(), matched)
    }

    #[test]
    fn test_help_prefix_matches() {
        let table = test_table();
        let (out, matched) = help_output(&table, "dev");
        assert!(matched);
        assert!(out.contains("dev [-f]"));
        assert!(out.contains("devsave [-f]"));
        assert!(!out.contains("status"));
        assert!(!out.contains("Alias:"));
    }

    #[test]
    fn test_help_prefix_no_match() {
        let table = test_table();
        let (out, matched) = help_output(&table, "zzz");
        assert!(!matched);
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_help_prefix_is_case_sensitive() {
        let table = test_table();
        let (_, matched) = help_output(&table, "DEV");
        assert!(!matched);
    }

    #[test]
    fn test_help_empty_prefix_lists_everything_returns_false() {
        let table = test_table();
        let (out, matched) = help_output(&table, "");
        assert!(!matched);
        assert!(out.contains("dev [-f]"));
        assert!(out.contains("status"));
        assert!(out.contains("Alias: ls"));
        assert!(out.contains("ls --color -F"));
    }

    #[test]
    fn test_define_alias() {
        let mut table = CommandTable::new();
        let parsed = table.define_alias("ll=ls -l");
        assert_eq!(parsed, Some(("ll".to_string(), "ls -l".to_string())));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_define_alias_without_separator_is_dropped() {
        let mut table = CommandTable::new();
        assert_eq!(table.define_alias("broken"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_command_names_skip_aliases() {
        let table = test_table();
        let names: Vec<&str> = table.command_names().collect();
        assert_eq!(names, vec!["dev", "devsave", "status"]);
    }
}
