use anyhow::Result;
use tracing::{debug, info_span};
use tracing_subscriber::prelude::*;

use devsh::core::builtins::register_builtins;
use devsh::core::command::CommandTable;
use devsh::core::completion::CommandCompleter;
use devsh::core::dispatch::{Dispatcher, HandlerRegistry};
use devsh::core::prompt::PromptRenderer;
use devsh::core::repl::Repl;
use devsh::core::session::{ReplContext, Session};
use devsh::core::signals::SignalController;
use devsh::spi::config::load_config;
use devsh::spi::demo;
use devsh_readline::{History, LineEditor, ReadlineConfig};

fn init_tracing() {
    // Honors RUST_LOG for filtering; set DEVSH_LOG_FORMAT=json for JSON
    // output on stderr.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let use_json = std::env::var("DEVSH_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_table() -> CommandTable {
    let mut table = CommandTable::new();
    table.add_command("dev", Some("[-f]"), "Device Information", Some("device_info"));
    table.add_command(
        "devsave",
        Some("[-f]"),
        "Download Remote Device CFG",
        Some("device_cfg_save"),
    );
    table.add_command("lset", Some("[dBm]"), "Set TX Power", None);
    table.add_command("save", None, "Upload and Apply CFG to Remote Device", None);
    table.add_command("eiperf", Some("[-s|-c] [IP]"), "Run iperf Speed Test", None);
    table.add_command("findtower", None, "Scan for Towers", Some("find_tower"));
    table.add_command("netinf", None, "Network Information", Some("show_net_info"));
    table.add_command("status", None, "System and Signal Status", Some("status"));
    table.add_command("stop", None, "Stop Wireless Interface", None);
    table.add_command("start", None, "Start Wireless Interface", None);
    table.add_command("reset", None, "Reboot Remote Device", None);
    table.add_command("hide", None, "Hide Local Console Connection Info", None);
    table.add_command("history", None, "Show Command History", Some("history"));
    table.add_command("alias", Some("[name=expansion]"), "List or Define Aliases", Some("alias"));
    table.add_command("help", None, "Show This Listing", Some("help"));
    table.add_command("exit", None, "Exit", Some("exit"));
    table.add_alias("ls", "ls --color -F");
    table
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let rl_config = ReadlineConfig::load("devsh");

    // Loading is deferred to the event loop so one-shot sessions can skip it.
    let history = History::with_file(rl_config.max_history_size, config.history.resolved_path());
    debug!(max = rl_config.max_history_size, "history configured");

    let table = build_table();
    let completer = CommandCompleter::from_table(&table);

    let mut handlers = HandlerRegistry::new();
    register_builtins(&mut handlers);
    demo::register(&mut handlers);

    let mut session = Session::new(config.prompt.hostname.clone());
    session.current_path = config.prompt.current_path.clone();
    session.exec_on_startup = config.session.exec_on_startup;
    session.broken_readline = config.session.broken_readline;

    let signals = SignalController::new();
    signals.install()?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let session_span = info_span!("session", session_id = %session_id);
    let _session_guard = session_span.enter();

    let ctx = ReplContext::new(session, history, completer, signals);
    let dispatcher = Dispatcher::new(table, handlers, "no_command");
    let editor = LineEditor::new(rl_config);
    let renderer = PromptRenderer::new(config.prompt.template.clone());

    let mut repl = Repl::new(dispatcher, ctx, editor, renderer);
    repl.run()
}
