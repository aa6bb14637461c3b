//! Desktop notifications for applied profiles

use crate::tray::TrayEvent;
use notify_rust::Notification;
use switcher_core::{Notifier, Transition};
use tao::event_loop::EventLoopProxy;
use tracing::debug;

pub const APP_NAME: &str = "MSI Afterburner Profile Switcher";

/// Shows a toast for each applied profile and hands the transition to the
/// tray so its status line and tooltip follow along.
pub struct DesktopNotifier {
    proxy: EventLoopProxy<TrayEvent>,
}

impl DesktopNotifier {
    pub fn new(proxy: EventLoopProxy<TrayEvent>) -> Self {
        Self { proxy }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, transition: &Transition) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self
            .proxy
            .send_event(TrayEvent::Applied(transition.clone()))
            .is_err()
        {
            debug!("Tray event loop closed, skipping status update");
        }

        toast(transition)
            .show()
            .map(|_| ())
            .map_err(|e| format!("could not show notification: {}", e).into())
    }
}

fn toast(transition: &Transition) -> Notification {
    let mut toast = Notification::new();
    toast
        .appname(APP_NAME)
        .summary(&transition.title())
        .body(&transition.body());
    toast
}
