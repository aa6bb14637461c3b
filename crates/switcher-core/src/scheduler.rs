//! Driving the engine, either on a timer or from window events

use crate::config::ConfigError;
use crate::engine::Engine;
use crate::inspect::WindowEvent;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use tracing::{info, trace};

/// Capacity of the queue between the OS hook and the evaluation loop.
///
/// When it is full, further events are dropped: an event already waiting in
/// the queue guarantees another evaluation.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Bounded channel carrying window events to [`run_events`]
pub fn event_channel() -> (SyncSender<WindowEvent>, Receiver<WindowEvent>) {
    mpsc::sync_channel(EVENT_QUEUE_CAPACITY)
}

/// Evaluate now, then once per configured delay until `stop` fires or its
/// sender is dropped.
///
/// The delay is re-read from each reloaded snapshot.
pub fn run_poll(engine: &mut Engine, stop: &Receiver<()>) -> Result<(), ConfigError> {
    info!("Starting in polling mode");
    engine.evaluate()?;
    loop {
        let delay = engine.snapshot().delay;
        match stop.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {
                engine.evaluate()?;
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("Polling stopped");
    Ok(())
}

/// Evaluate now, then once per received event until the sender side closes
pub fn run_events(engine: &mut Engine, events: &Receiver<WindowEvent>) -> Result<(), ConfigError> {
    info!("Starting in event-driven mode");
    engine.evaluate()?;
    for event in events.iter() {
        trace!("Window event: {:?}", event);
        engine.evaluate()?;
    }
    info!("Event source closed");
    Ok(())
}
