//! Afterburner Switcher Daemon
//!
//! Watches which application is in use and switches MSI Afterburner profiles
//! to match. The tray owns the main thread; evaluation runs on its own
//! scheduler thread, driven by a timer or by window events.

mod logging;
mod notify;
mod tray;
mod worker;

use anyhow::{Context, Result};
use switcher_core::{CommandLauncher, Engine, FileConfig};
use switcher_inspector::SystemInspector;
use tao::event_loop::EventLoopBuilder;
use tracing::{error, info};
use notify::DesktopNotifier;
use tray::TrayEvent;

fn main() -> Result<()> {
    let log_path = logging::init()?;
    info!("MSI Afterburner Profile Switcher started");

    let config_path = switcher_core::default_config_path();
    let config = FileConfig::new(&config_path);

    let event_loop = EventLoopBuilder::<TrayEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let engine = match Engine::new(
        Box::new(config),
        Box::new(SystemInspector::new()),
        Box::new(CommandLauncher),
    ) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Fatal: {}", e);
            return Err(e).with_context(|| format!("loading {}", config_path.display()));
        }
    };
    let engine = engine.with_notifier(Box::new(DesktopNotifier::new(proxy.clone())));
    info!(
        "Configuration successfully loaded from {} ({} targets)",
        config_path.display(),
        engine.snapshot().targets.len()
    );

    let feed = worker::start(engine, proxy)?;
    tray::run(event_loop, feed, log_path)
}
