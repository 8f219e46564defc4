use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;

/// Ordered command history with optional file persistence.
///
/// The backing format is plain text, one entry per line. Loading and saving
/// are explicit — the owner decides when (and whether) the file is touched,
/// so a batch-mode session can keep history entirely in memory.
pub struct History {
    entries: Vec<String>,
    max_size: usize,
    file_path: Option<PathBuf>,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            file_path: None,
        }
    }

    /// Create history backed by a file. The file is not read until `load`.
    pub fn with_file(max_size: usize, file_path: PathBuf) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            file_path: Some(file_path),
        }
    }

    /// Add a line to history.
    pub fn add(&mut self, line: String) {
        // Skip blank lines and lines that start with a space
        if line.trim().is_empty() || line.starts_with(' ') {
            return;
        }

        // Skip duplicates of the most recent entry
        if self.entries.last() == Some(&line) {
            return;
        }

        self.entries.push(line);

        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
    }

    /// Get an entry by index (0 = oldest, len-1 = newest).
    pub fn get(&self, index: usize) -> Option<&String> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enumerate all entries with their position.
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().enumerate().map(|(i, e)| (i, e.as_str()))
    }

    /// Load entries from the backing file. A missing file is not an error.
    pub fn load(&mut self) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                self.entries.push(line);
            }
        }

        while self.entries.len() > self.max_size {
            self.entries.remove(0);
        }

        Ok(())
    }

    /// Persist all entries to the backing file, creating its parent
    /// directory if needed. A history without a file is a no-op.
    pub fn save(&self) -> Result<()> {
        let Some(ref path) = self.file_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        for entry in &self.entries {
            writeln!(file, "{}", entry)?;
        }

        file.flush()?;
        Ok(())
    }
}
