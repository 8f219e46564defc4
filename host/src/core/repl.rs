use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use devsh_readline::{EditorAction, LineEditor};
use tracing::{info, warn};

use super::dispatch::Dispatcher;
use super::prompt::PromptRenderer;
use super::session::ReplContext;
use super::signals::LoopState;

/// How long one readiness wait lasts before signal flags are re-checked.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// The interactive event loop: render prompt, wait for input, feed the
/// editor, dispatch completed lines, until a stop is requested.
pub struct Repl {
    dispatcher: Dispatcher,
    ctx: ReplContext,
    editor: LineEditor,
    renderer: PromptRenderer,
}

impl Repl {
    pub fn new(
        dispatcher: Dispatcher,
        ctx: ReplContext,
        editor: LineEditor,
        renderer: PromptRenderer,
    ) -> Self {
        Self {
            dispatcher,
            ctx,
            editor,
            renderer,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        if !self.ctx.session.exec_on_startup {
            if let Err(err) = self.ctx.history.load() {
                warn!(error = %err, "failed to load history");
            }
        }

        self.arm_prompt()?;

        loop {
            if self.ctx.signals.poll() == LoopState::Stopping {
                break;
            }
            if !self.editor.poll_ready(INPUT_POLL)? {
                continue;
            }

            match self.editor.feed(&self.ctx.history, &self.ctx.completer)? {
                EditorAction::Continue => {
                    // A lone "?" shows help immediately, without Enter.
                    if self.editor.buffer() == "?" {
                        self.show_help()?;
                        self.editor.discard_line();
                        self.arm_prompt()?;
                    }
                }
                EditorAction::Submit => {
                    // The raw line goes to dispatch untouched: a leading
                    // space is the keep-out-of-history convention.
                    let line = self.editor.take_line();
                    let trimmed = line.trim();
                    if trimmed == "?" {
                        self.show_help()?;
                    } else if !trimmed.is_empty() {
                        self.dispatcher.dispatch(&mut self.ctx, &line);
                    }
                    // A dispatch may have requested a stop or an interrupt
                    // may have arrived mid-command.
                    if self.ctx.signals.poll() == LoopState::Stopping {
                        break;
                    }
                    self.arm_prompt()?;
                }
                EditorAction::Interrupt => {
                    self.ctx.signals.notify_interrupt();
                    if self.ctx.signals.poll() == LoopState::Stopping {
                        break;
                    }
                    self.arm_prompt()?;
                }
                EditorAction::Eof => {
                    self.ctx.signals.request_stop();
                    break;
                }
            }
        }

        self.shutdown()
    }

    fn show_help(&mut self) -> Result<()> {
        // Help is printed with plain newlines, so the terminal must be out
        // of raw mode first. On the submit path the editor has already
        // released; on the in-line trigger it is still armed.
        self.editor.release()?;
        println!();
        self.dispatcher.table.print_help("");
        Ok(())
    }

    fn arm_prompt(&mut self) -> Result<()> {
        let prompt = self.renderer.render(&self.ctx.session);
        if self.ctx.session.broken_readline {
            // Print the prompt plainly and let the editor run unprompted,
            // for terminals that mangle escape-laden prompt redraws.
            print!("{prompt}");
            io::stdout().flush()?;
            self.editor.arm("")
        } else {
            self.editor.arm(&prompt)
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        self.editor.release()?;
        if !self.ctx.session.exec_on_startup {
            if let Err(err) = self.ctx.history.save() {
                warn!(error = %err, "failed to save history");
            }
        }
        info!("session ended");
        Ok(())
    }
}
