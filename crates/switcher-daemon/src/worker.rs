//! Starting the scheduler thread in the configured monitoring mode

use crate::tray::TrayEvent;
use anyhow::Result;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use switcher_core::{scheduler, ConfigError, Engine, MonitoringMode};
use tao::event_loop::EventLoopProxy;
use tracing::error;

/// The input side of a running scheduler.
///
/// Dropping a `Poll` feed stops the poll loop, which sees its stop channel
/// close. Dropping an `Events` feed only detaches the hook thread: it keeps
/// pumping messages until the process exits, and the event loop runs as long
/// as it does.
pub enum Feed {
    Poll(Sender<()>),
    Events(JoinHandle<()>),
}

impl Feed {
    pub fn mode(&self) -> MonitoringMode {
        match self {
            Feed::Poll(_) => MonitoringMode::Poll,
            Feed::Events(_) => MonitoringMode::Event,
        }
    }
}

/// Spawn the scheduler for the engine's configured mode
pub fn start(mut engine: Engine, proxy: EventLoopProxy<TrayEvent>) -> Result<Feed> {
    match engine.snapshot().monitoring_mode {
        MonitoringMode::Poll => {
            let (stop_tx, stop_rx) = mpsc::channel();
            spawn_scheduler(proxy, move || scheduler::run_poll(&mut engine, &stop_rx))?;
            Ok(Feed::Poll(stop_tx))
        }
        MonitoringMode::Event => {
            let (event_tx, event_rx) = scheduler::event_channel();
            let hook = switcher_inspector::watch_window_events(event_tx)?;
            spawn_scheduler(proxy, move || scheduler::run_events(&mut engine, &event_rx))?;
            Ok(Feed::Events(hook))
        }
    }
}

fn spawn_scheduler<F>(proxy: EventLoopProxy<TrayEvent>, run: F) -> Result<()>
where
    F: FnOnce() -> Result<(), ConfigError> + Send + 'static,
{
    thread::Builder::new()
        .name("scheduler".to_string())
        .spawn(move || {
            if let Err(e) = run() {
                error!("Fatal: {}", e);
                let _ = proxy.send_event(TrayEvent::Fatal(e.to_string()));
            }
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropping_poll_feed_closes_stop_channel() {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let feed = Feed::Poll(stop_tx);
        assert_eq!(feed.mode(), MonitoringMode::Poll);

        drop(feed);
        assert!(stop_rx.recv().is_err());
    }

    #[test]
    fn test_events_feed_outlives_drop() {
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let hook = thread::spawn(move || {
            let _ = release_rx.recv();
            let _ = done_tx.send(());
        });
        let feed = Feed::Events(hook);
        assert_eq!(feed.mode(), MonitoringMode::Event);

        // Detached, not stopped: the thread still runs after the feed is gone
        drop(feed);
        release_tx.send(()).unwrap();
        assert!(done_rx.recv().is_ok());
    }
}
