use std::collections::{HashMap, HashSet};
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, warn};

use super::command::{CommandEntry, CommandTable};
use super::session::ReplContext;

/// A registered command handler. `Args` handlers receive the argument
/// tokens and their count; `NoArgs` handlers ignore the remainder of the
/// line entirely.
pub enum Handler {
    Args(Box<dyn FnMut(&mut ReplContext, &mut CommandTable, &[String], usize) -> Result<()>>),
    NoArgs(Box<dyn FnMut(&mut ReplContext, &mut CommandTable) -> Result<()>>),
}

impl Handler {
    fn call(
        &mut self,
        ctx: &mut ReplContext,
        table: &mut CommandTable,
        args: &[String],
        argc: usize,
    ) -> Result<()> {
        match self {
            Handler::Args(f) => f(ctx, table, args, argc),
            Handler::NoArgs(f) => f(ctx, table),
        }
    }
}

/// Where a handler name was resolved.
pub enum Resolution<'a> {
    /// Engine-bound handler (builtins and anything registered as bound).
    Bound(&'a mut Handler),
    /// Free handler supplied by the host application.
    Free(&'a mut Handler),
    NotFound,
}

/// Name-keyed handler storage. Bound handlers shadow free handlers of the
/// same name, mirroring a method-before-function lookup.
#[derive(Default)]
pub struct HandlerRegistry {
    bound: HashMap<String, Handler>,
    free: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_bound(&mut self, name: &str, handler: Handler) {
        self.bound.insert(name.to_string(), handler);
    }

    pub fn register_free(&mut self, name: &str, handler: Handler) {
        self.free.insert(name.to_string(), handler);
    }

    pub fn resolve_mut(&mut self, name: &str) -> Resolution<'_> {
        if let Some(handler) = self.bound.get_mut(name) {
            Resolution::Bound(handler)
        } else if let Some(handler) = self.free.get_mut(name) {
            Resolution::Free(handler)
        } else {
            Resolution::NotFound
        }
    }
}

/// Resolves input lines against the command table and invokes handlers.
///
/// The table is scanned in insertion order and the scan is permissive:
/// every Command entry matching the head token fires its handler, so
/// duplicate names all run. An alias match ends the scan; commands matched
/// ahead of it fire first, then the rewritten line is re-dispatched. Each
/// alias name may expand at most once per chain, which lets self-prefixed
/// aliases like `ls=ls --color -F` expand exactly once and makes a true
/// alias cycle fall through to the fallback handler.
pub struct Dispatcher {
    pub table: CommandTable,
    pub handlers: HandlerRegistry,
    fallback: String,
}

impl Dispatcher {
    pub fn new(table: CommandTable, handlers: HandlerRegistry, fallback: &str) -> Self {
        Self {
            table,
            handlers,
            fallback: fallback.to_string(),
        }
    }

    pub fn dispatch(&mut self, ctx: &mut ReplContext, line: &str) {
        let mut visited = HashSet::new();
        self.dispatch_with(ctx, line, &mut visited, 0);
    }

    fn dispatch_with(
        &mut self,
        ctx: &mut ReplContext,
        line: &str,
        visited: &mut HashSet<String>,
        depth: usize,
    ) {
        ctx.session.response_time = Instant::now();

        // The raw line keeps its leading space so History::add can apply
        // its keep-out rule; matching works on the trimmed form.
        if depth == 0 {
            ctx.history.add(line.to_string());
        }
        let line = line.trim();

        let (head, rest) = match line.split_once(' ') {
            Some((head, rest)) => (head, rest),
            None => (line, ""),
        };
        let args: Vec<String> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(' ').map(str::to_string).collect()
        };
        let argc = args.len();

        let mut matched_handlers: Vec<String> = Vec::new();
        let mut expansion: Option<(String, String)> = None;

        for entry in self.table.entries() {
            match entry {
                CommandEntry::Alias { name, expansion: exp } if name == head => {
                    if visited.contains(name) {
                        warn!(alias = %name, "alias loop detected, skipping expansion");
                        continue;
                    }
                    expansion = Some((name.clone(), exp.clone()));
                    break;
                }
                CommandEntry::Command {
                    name,
                    handler: Some(handler),
                    ..
                } if name == head => {
                    matched_handlers.push(handler.clone());
                }
                _ => {}
            }
        }

        // Commands matched ahead of the alias in the table fire before the
        // rewrite, preserving strict scan order.
        let any_matched = !matched_handlers.is_empty();
        for name in matched_handlers {
            match self.handlers.resolve_mut(&name) {
                Resolution::Bound(handler) | Resolution::Free(handler) => {
                    if let Err(err) = handler.call(ctx, &mut self.table, &args, argc) {
                        eprintln!("{name}: {err}");
                    }
                }
                Resolution::NotFound => {
                    println!("handler '{name}' is not registered");
                }
            }
        }

        if let Some((name, exp)) = expansion {
            let rewritten = if rest.is_empty() {
                exp
            } else {
                format!("{exp} {rest}")
            };
            debug!(alias = %name, line = %rewritten, "expanding alias");
            visited.insert(name);
            self.dispatch_with(ctx, &rewritten, visited, depth + 1);
            return;
        }

        if !any_matched {
            // The fallback sees the whole line tokenized, head included.
            let tokens: Vec<String> = line.split(' ').map(str::to_string).collect();
            let count = tokens.len();
            let fallback = self.fallback.clone();
            match self.handlers.resolve_mut(&fallback) {
                Resolution::Bound(handler) | Resolution::Free(handler) => {
                    if let Err(err) = handler.call(ctx, &mut self.table, &tokens, count) {
                        eprintln!("{fallback}: {err}");
                    }
                }
                Resolution::NotFound => {
                    println!("no handler registered for unmatched input: {line}");
                }
            }
        }
    }
}
