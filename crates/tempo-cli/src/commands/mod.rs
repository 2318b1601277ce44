pub mod config;
pub mod presets;
pub mod run;
pub mod session;

use tempo_core::{Config, LogSink, SessionController, TerminalBell, TerminalNotifier};

/// Controller seeded from config, with the terminal completion sinks the
/// config enables.
pub(crate) fn build_controller(config: &Config) -> SessionController {
    let mut controller = SessionController::with_ledger(config.ledger()).with_sink(LogSink);
    if config.notifications.enabled {
        controller.add_sink(TerminalNotifier::new(std::io::stderr()));
    }
    if config.notifications.chime {
        controller.add_sink(TerminalBell::new(std::io::stderr()));
    }
    controller
}

/// Single-threaded tokio runtime for commands that drive a session.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
