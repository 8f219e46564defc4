use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, ClearType},
};

use super::completer::{common_prefix, Complete};
use super::config::ReadlineConfig;
use super::history::History;

/// Outcome of feeding one input event to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// The line is still being edited.
    Continue,
    /// A full line was completed; fetch it with `take_line`.
    Submit,
    /// Ctrl-C was pressed. The caller decides what an interrupt means.
    Interrupt,
    /// End of input (Ctrl-D on an empty line, or the input stream closed).
    Eof,
}

/// Calculate the visible width of a string, excluding ANSI escape sequences.
///
/// Color codes like `\x1b[01;32m` are counted by `.chars().count()` but take
/// no space on the terminal; they must be skipped for cursor positioning.
pub fn visible_width(s: &str) -> usize {
    let mut count = 0;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.as_str().starts_with('[') {
                // CSI sequence: skip until the terminating letter
                chars.next();
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                // Simple escape sequence, skip next char
                chars.next();
            }
        } else {
            count += 1;
        }
    }

    count
}

/// Line editor fed one input event at a time.
///
/// The caller owns the readiness wait: it arms the editor with a prompt,
/// polls for input, and feeds events until `Submit`. On a terminal the
/// editor runs in raw mode between `arm` and the completing event; when
/// stdin is not a tty it degrades to plain line reads so piped sessions
/// behave like scripts.
pub struct LineEditor {
    buffer: String,
    cursor: usize, // char index into buffer
    history_pos: Option<usize>,
    saved_buffer: Option<String>,
    prompt: String,
    config: ReadlineConfig,
    interactive: bool,
    raw_active: bool,
}

impl LineEditor {
    pub fn new(config: ReadlineConfig) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            history_pos: None,
            saved_buffer: None,
            prompt: String::new(),
            config,
            interactive: crossterm::tty::IsTty::is_tty(&io::stdin()),
            raw_active: false,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Current (incomplete) line buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Take the completed line, resetting the editor state.
    pub fn take_line(&mut self) -> String {
        self.cursor = 0;
        self.history_pos = None;
        self.saved_buffer = None;
        std::mem::take(&mut self.buffer)
    }

    /// Throw away the pending line without submitting it.
    pub fn discard_line(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_pos = None;
        self.saved_buffer = None;
    }

    /// Install a prompt and prepare for a fresh line. On a terminal this
    /// enables raw mode and renders the prompt; otherwise the prompt is
    /// printed as-is.
    pub fn arm(&mut self, prompt: &str) -> Result<()> {
        self.discard_line();
        self.prompt = prompt.to_string();

        if self.interactive {
            if !self.raw_active {
                terminal::enable_raw_mode()?;
                self.raw_active = true;
            }
            self.render()?;
        } else {
            print!("{}", prompt);
            io::stdout().flush()?;
        }
        Ok(())
    }

    /// Wait for input readiness, bounded by `timeout`. Non-tty input is
    /// always considered ready (the read itself blocks on the pipe).
    pub fn poll_ready(&self, timeout: Duration) -> Result<bool> {
        if self.interactive {
            Ok(event::poll(timeout)?)
        } else {
            Ok(true)
        }
    }

    /// Feed the next input event to the editor.
    pub fn feed(&mut self, history: &History, completer: &dyn Complete) -> Result<EditorAction> {
        if !self.interactive {
            return self.read_line_simple();
        }

        let action = match event::read()? {
            Event::Key(key_event) => self.handle_key(key_event, history, completer)?,
            _ => EditorAction::Continue,
        };

        match action {
            EditorAction::Continue => self.render()?,
            EditorAction::Submit | EditorAction::Eof => self.finish_line("\r\n")?,
            EditorAction::Interrupt => self.finish_line("^C\r\n")?,
        }

        Ok(action)
    }

    /// Leave raw mode. Safe to call repeatedly.
    pub fn release(&mut self) -> Result<()> {
        if self.raw_active {
            terminal::disable_raw_mode()?;
            self.raw_active = false;
        }
        Ok(())
    }

    /// Plain line reading for non-interactive input (pipes, tests).
    fn read_line_simple(&mut self) -> Result<EditorAction> {
        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;

        if n == 0 {
            return Ok(EditorAction::Eof);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        self.buffer = line;
        self.cursor = self.buffer.chars().count();
        Ok(EditorAction::Submit)
    }

    /// Print a line terminator and drop out of raw mode so command output
    /// is rendered with normal line discipline.
    fn finish_line(&mut self, terminator: &str) -> Result<()> {
        print!("{}", terminator);
        io::stdout().flush()?;
        self.release()
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        history: &History,
        completer: &dyn Complete,
    ) -> Result<EditorAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => return Ok(EditorAction::Submit),

            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(EditorAction::Interrupt),

            // Ctrl-D - EOF if empty, else delete char at cursor
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                if self.buffer.is_empty() {
                    return Ok(EditorAction::Eof);
                }
                self.delete_at_cursor();
            }

            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.cursor = 0;
            }

            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.cursor = self.char_len();
            }

            // Ctrl-U - clear line before cursor
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let at = self.byte_idx(self.cursor);
                self.buffer.drain(..at);
                self.cursor = 0;
            }

            // Ctrl-K - clear line after cursor
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                let at = self.byte_idx(self.cursor);
                self.buffer.truncate(at);
            }

            // Ctrl-W - delete word before cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                self.delete_word_before_cursor();
            }

            (KeyCode::Up, _) => self.history_prev(history),
            (KeyCode::Down, _) => self.history_next(history),

            (KeyCode::Left, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }

            (KeyCode::Right, _) => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
            }

            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.delete_at_cursor();
                }
            }

            (KeyCode::Delete, _) => self.delete_at_cursor(),

            (KeyCode::Tab, _) => {
                if self.config.enable_completion {
                    self.complete(completer)?;
                }
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_idx(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            }

            // Ignore other key combinations
            _ => {}
        }

        Ok(EditorAction::Continue)
    }

    /// Run tab completion for the word under the cursor.
    ///
    /// Candidates with empty text are placeholders from completers that
    /// must never return an empty set; they are filtered out here.
    fn complete(&mut self, completer: &dyn Complete) -> Result<()> {
        let pos = self.byte_idx(self.cursor);
        let candidates: Vec<_> = completer
            .complete(&self.buffer, pos)
            .into_iter()
            .filter(|c| !c.text.is_empty())
            .collect();

        if candidates.is_empty() {
            return Ok(());
        }

        if candidates.len() == 1 {
            let text = candidates[0].text.clone();
            self.replace_current_word(&text);
            return Ok(());
        }

        // Multiple candidates: extend to the common prefix if that gains
        // anything, and list the alternatives.
        let prefix = common_prefix(&candidates);
        if !prefix.is_empty() && prefix.chars().count() > self.current_word().chars().count() {
            self.replace_current_word(&prefix);
        }

        let mut stdout = io::stdout();
        queue!(stdout, Print("\r\n"))?;
        for candidate in &candidates {
            queue!(stdout, Print(format!("  {}\r\n", candidate.display)))?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// The word between the last whitespace before the cursor and the cursor.
    fn current_word(&self) -> &str {
        let at = self.byte_idx(self.cursor);
        let before = &self.buffer[..at];
        before
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or(before)
    }

    fn replace_current_word(&mut self, replacement: &str) {
        let at = self.byte_idx(self.cursor);
        let word_start = at - self.current_word().len();
        let word_start_chars = self.buffer[..word_start].chars().count();
        self.buffer.replace_range(word_start..at, replacement);
        self.cursor = word_start_chars + replacement.chars().count();
    }

    fn history_prev(&mut self, history: &History) {
        if history.is_empty() {
            return;
        }

        // Save the in-progress line on first history navigation
        if self.history_pos.is_none() {
            self.saved_buffer = Some(self.buffer.clone());
        }

        let new_pos = match self.history_pos {
            None => history.len() - 1,
            Some(pos) if pos > 0 => pos - 1,
            Some(_) => return, // already at oldest
        };

        self.history_pos = Some(new_pos);
        if let Some(line) = history.get(new_pos) {
            self.buffer = line.clone();
            self.cursor = self.char_len();
        }
    }

    fn history_next(&mut self, history: &History) {
        match self.history_pos {
            None => {} // not navigating history
            Some(pos) if pos + 1 < history.len() => {
                let new_pos = pos + 1;
                self.history_pos = Some(new_pos);
                if let Some(line) = history.get(new_pos) {
                    self.buffer = line.clone();
                    self.cursor = self.char_len();
                }
            }
            Some(_) => {
                // Walked past the newest entry: restore the saved line
                self.history_pos = None;
                self.buffer = self.saved_buffer.take().unwrap_or_default();
                self.cursor = self.char_len();
            }
        }
    }

    fn delete_at_cursor(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_idx(self.cursor);
            self.buffer.remove(at);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.buffer.chars().collect();
        let mut pos = self.cursor;

        // Skip trailing whitespace, then the word itself
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start = self.byte_idx(pos);
        let end = self.byte_idx(self.cursor);
        self.buffer.replace_range(start..end, "");
        self.cursor = pos;
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_idx(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn render(&self) -> Result<()> {
        let mut stdout = io::stdout();

        queue!(
            stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(&self.prompt),
            Print(&self.buffer),
        )?;

        // Position the cursor using visible width (ANSI codes excluded)
        let cursor_col = visible_width(&self.prompt) + self.cursor;
        queue!(stdout, cursor::MoveToColumn(cursor_col as u16))?;

        stdout.flush()?;
        Ok(())
    }
}

impl Drop for LineEditor {
    fn drop(&mut self) {
        if self.raw_active {
            let _ = terminal::disable_raw_mode();
        }
    }
}
