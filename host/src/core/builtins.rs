use super::command::CommandEntry;
use super::dispatch::{Handler, HandlerRegistry};

/// Register the engine's built-in handlers: `help`, `history`, `exit`,
/// `alias` and the `no_command` fallback.
pub fn register_builtins(registry: &mut HandlerRegistry) {
    registry.register_bound(
        "help",
        Handler::NoArgs(Box::new(|_ctx, table| {
            table.print_help("");
            Ok(())
        })),
    );

    registry.register_bound(
        "history",
        Handler::NoArgs(Box::new(|ctx, _table| {
            for (i, line) in ctx.history.list() {
                println!("{i}: {line}");
            }
            println!("history: {} items", ctx.history.len());
            Ok(())
        })),
    );

    registry.register_bound(
        "exit",
        Handler::NoArgs(Box::new(|ctx, _table| {
            ctx.signals.request_stop();
            Ok(())
        })),
    );

    registry.register_bound(
        "alias",
        Handler::Args(Box::new(|_ctx, table, args, argc| {
            if argc == 0 {
                for entry in table.entries() {
                    if let CommandEntry::Alias { name, expansion } = entry {
                        println!("alias {name}='{expansion}'");
                    }
                }
                return Ok(());
            }
            // Definitions may contain spaces, so rejoin the tokens.
            let definition = args.join(" ");
            if let Some((name, expansion)) = table.define_alias(&definition) {
                println!("new alias: {name}='{expansion}'");
            }
            Ok(())
        })),
    );

    registry.register_bound(
        "no_command",
        Handler::Args(Box::new(|_ctx, _table, args, _argc| {
            println!("No such command: {}", args.join(" "));
            Ok(())
        })),
    );
}

#[cfg(test)]
mod tests {
    use devsh_readline::History;

    use super::*;
    use crate::core::command::CommandTable;
    use crate::core::completion::CommandCompleter;
    use crate::core::dispatch::Resolution;
    use crate::core::session::{ReplContext, Session};
    use crate::core::signals::SignalController;

    fn test_ctx() -> ReplContext {
        ReplContext::new(
            Session::new("test"),
            History::new(100),
            CommandCompleter::new(),
            SignalController::new(),
        )
    }

    #[test]
    fn test_builtins_are_registered() {
        let mut registry = HandlerRegistry::new();
        register_builtins(&mut registry);
        for name in ["help", "history", "exit", "alias", "no_command"] {
            assert!(
                matches!(registry.resolve_mut(name), Resolution::Bound(_)),
                "missing builtin: {name}"
            );
        }
    }

    #[test]
    fn test_exit_requests_stop() {
        let mut registry = HandlerRegistry::new();
        register_builtins(&mut registry);
        let mut ctx = test_ctx();
        let mut table = CommandTable::new();
        if let Resolution::Bound(Handler::NoArgs(f)) = registry.resolve_mut("exit") {
            f(&mut ctx, &mut table).unwrap();
        } else {
            panic!("exit is not a bound no-args handler");
        }
        assert!(ctx.signals.is_stopping());
    }

    #[test]
    fn test_alias_defines_entry() {
        let mut registry = HandlerRegistry::new();
        register_builtins(&mut registry);
        let mut ctx = test_ctx();
        let mut table = CommandTable::new();
        let args = vec!["ll=ls".to_string(), "-l".to_string()];
        if let Resolution::Bound(Handler::Args(f)) = registry.resolve_mut("alias") {
            f(&mut ctx, &mut table, &args, args.len()).unwrap();
        } else {
            panic!("alias is not a bound args handler");
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_alias_silently_drops_malformed_definition() {
        let mut registry = HandlerRegistry::new();
        register_builtins(&mut registry);
        let mut ctx = test_ctx();
        let mut table = CommandTable::new();
        let args = vec!["broken".to_string()];
        if let Resolution::Bound(Handler::Args(f)) = registry.resolve_mut("alias") {
            f(&mut ctx, &mut table, &args, args.len()).unwrap();
        } else {
            panic!("alias is not a bound args handler");
        }
        assert!(table.is_empty());
    }
}
