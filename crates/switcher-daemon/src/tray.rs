//! System tray host
//!
//! Owns the UI thread: the tray icon, its menu and the tao event loop. The
//! scheduler runs elsewhere and talks to the tray through [`TrayEvent`]s.

use crate::notify::APP_NAME;
use crate::worker::Feed;
use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use switcher_core::Transition;
use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};
use tracing::{error, info, warn};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    TrayIconBuilder,
};

/// Messages from the scheduler thread to the tray
#[derive(Debug, Clone)]
pub enum TrayEvent {
    /// A profile was applied
    Applied(Transition),
    /// The scheduler stopped on an unrecoverable error
    Fatal(String),
}

pub fn run(event_loop: EventLoop<TrayEvent>, feed: Feed, log_path: PathBuf) -> Result<()> {
    // Create a hidden window (required on some platforms)
    let _window = WindowBuilder::new()
        .with_visible(false)
        .build(&event_loop)?;

    let tray_menu = Menu::new();

    let status = MenuItem::new(format!("Monitoring ({} mode)", feed.mode()), false, None);
    tray_menu.append(&status)?;
    tray_menu.append(&PredefinedMenuItem::separator())?;

    let show_log = MenuItem::new("Show Log", true, None);
    tray_menu.append(&show_log)?;

    tray_menu.append(&PredefinedMenuItem::separator())?;

    let quit = MenuItem::new("Quit", true, None);
    tray_menu.append(&quit)?;

    let tray_icon = TrayIconBuilder::new()
        .with_menu(Box::new(tray_menu))
        .with_tooltip(format!("{} is running", APP_NAME))
        .with_title(APP_NAME)
        .with_icon(load_icon()?)
        .build()?;

    let show_log_id = show_log.id().clone();
    let quit_id = quit.id().clone();

    let menu_channel = MenuEvent::receiver();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        // Keeps the scheduler's input alive for as long as the tray runs
        let _keep_alive = &feed;

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == quit_id {
                info!("Quit requested from tray");
                *control_flow = ControlFlow::Exit;
            } else if event.id == show_log_id {
                if let Err(e) = open::that(&log_path) {
                    warn!("Failed to open log file {}: {}", log_path.display(), e);
                }
            }
        }

        match event {
            Event::UserEvent(TrayEvent::Applied(transition)) => {
                status.set_text(status_line(&transition));
                if let Err(e) = tray_icon.set_tooltip(Some(tooltip(&transition))) {
                    warn!("Failed to update tray tooltip: {}", e);
                }
            }
            Event::UserEvent(TrayEvent::Fatal(message)) => {
                error!("Stopping: {}", message);
                *control_flow = ControlFlow::ExitWithCode(1);
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            _ => {}
        }
    });
}

fn status_line(transition: &Transition) -> String {
    format!(
        "{} ({}, {})",
        transition.body(),
        transition.trigger,
        transition.at.with_timezone(&Local).format("%H:%M")
    )
}

fn tooltip(transition: &Transition) -> String {
    match &transition.from {
        Some(previous) => format!("{}\n{} (was {})", transition.title(), transition.body(), previous),
        None => format!("{}\n{}", transition.title(), transition.body()),
    }
}

fn load_icon() -> Result<tray_icon::Icon> {
    // A 16x16 speedometer: red arc on dark background
    let size = 16i32;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let dx = x * 2 - 15;
            let dy = y * 2 - 15;
            let dist = dx * dx + dy * dy;

            let on_arc = (120..=196).contains(&dist) && y < 12;
            let needle = x >= 7 && x <= 8 && y >= 4 && y <= 8;
            let in_face = dist < 225;

            if on_arc || needle {
                rgba.extend_from_slice(&[220, 40, 40, 255]);
            } else if in_face {
                rgba.extend_from_slice(&[40, 40, 40, 255]);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    Ok(tray_icon::Icon::from_rgba(rgba, size as u32, size as u32)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn transition(from: Option<&str>) -> Transition {
        Transition {
            from: from.map(str::to_string),
            to: "-Profile2".to_string(),
            trigger: "discord".to_string(),
            launched: true,
            at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_status_line_uses_transition_time() {
        let t = transition(None);
        let expected = format!(
            "Applied profile: -Profile2 (discord, {})",
            t.at.with_timezone(&Local).format("%H:%M")
        );
        assert_eq!(status_line(&t), expected);
    }

    #[test]
    fn test_tooltip_mentions_previous_profile() {
        assert_eq!(
            tooltip(&transition(Some("-Profile1"))),
            "Detected: discord\nApplied profile: -Profile2 (was -Profile1)"
        );
        assert_eq!(
            tooltip(&transition(None)),
            "Detected: discord\nApplied profile: -Profile2"
        );
    }

    #[test]
    fn test_icon_builds() {
        assert!(load_icon().is_ok());
    }
}
