//! Windows window queries and WinEvent hooks

use std::cell::RefCell;
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::sync::mpsc::{self, Sender, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use switcher_core::{ForegroundWindow, InspectError, WindowEvent};
use tracing::{debug, error, warn};
use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, TRUE};
use windows::Win32::System::ProcessStatus::K32GetModuleBaseNameW;
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, EnumWindows, GetForegroundWindow, GetMessageW, GetWindowTextLengthW,
    GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible, PostQuitMessage, TranslateMessage,
    EVENT_OBJECT_CREATE, EVENT_OBJECT_DESTROY, EVENT_SYSTEM_FOREGROUND, MSG, WINEVENT_OUTOFCONTEXT,
};

pub fn foreground_window() -> Result<ForegroundWindow, InspectError> {
    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.0 == 0 {
            return Err(InspectError::NoForegroundWindow);
        }

        let title = window_text(hwnd);

        let mut process_id = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id));

        Ok(ForegroundWindow { title, process_id })
    }
}

pub fn process_name(process_id: u32) -> Result<String, InspectError> {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, process_id)
            .map_err(|e| InspectError::Query {
                what: "process handle",
                reason: e.to_string(),
            })?;

        let mut name_buf = [0u16; 260];
        let len = K32GetModuleBaseNameW(handle, None, &mut name_buf);

        if let Err(e) = CloseHandle(handle) {
            warn!("Failed to close process handle {:?}: {}", handle, e);
        }

        if len == 0 {
            return Err(InspectError::Query {
                what: "process name",
                reason: format!("no module name for process {}", process_id),
            });
        }
        Ok(OsString::from_wide(&name_buf[..len as usize])
            .to_string_lossy()
            .into_owned())
    }
}

pub fn visible_window_titles() -> Result<Vec<String>, InspectError> {
    let mut titles: Vec<String> = Vec::new();
    unsafe {
        EnumWindows(
            Some(collect_visible_title),
            LPARAM(&mut titles as *mut Vec<String> as isize),
        )
        .map_err(|e| InspectError::Query {
            what: "window list",
            reason: e.to_string(),
        })?;
    }
    Ok(titles)
}

unsafe extern "system" fn collect_visible_title(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let titles = &mut *(lparam.0 as *mut Vec<String>);
    if IsWindowVisible(hwnd).as_bool() {
        let title = window_text(hwnd);
        if !title.is_empty() {
            titles.push(title);
        }
    }
    TRUE
}

unsafe fn window_text(hwnd: HWND) -> String {
    let len = GetWindowTextLengthW(hwnd);
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let copied = GetWindowTextW(hwnd, &mut buf);
    if copied <= 0 {
        return String::new();
    }
    OsString::from_wide(&buf[..copied as usize])
        .to_string_lossy()
        .into_owned()
}

thread_local! {
    /// Where the hook callback on this thread forwards events
    static EVENT_SINK: RefCell<Option<SyncSender<WindowEvent>>> = RefCell::new(None);
}

/// Out-of-context hooks deliver on the installing thread's message loop, so
/// the thread-local sink is always the one `run_hook_loop` installed.
unsafe extern "system" fn on_win_event(
    _hook: HWINEVENTHOOK,
    event: u32,
    _hwnd: HWND,
    _id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    let event = match event {
        EVENT_SYSTEM_FOREGROUND => WindowEvent::ForegroundChanged,
        EVENT_OBJECT_CREATE => WindowEvent::ObjectCreated,
        EVENT_OBJECT_DESTROY => WindowEvent::ObjectDestroyed,
        _ => return,
    };

    EVENT_SINK.with(|sink| {
        let Some(tx) = sink.borrow().as_ref().cloned() else {
            return;
        };
        match tx.try_send(event) {
            // A full queue already holds a pending evaluation
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => PostQuitMessage(0),
        }
    });
}

/// Install the foreground and create/destroy hooks on a dedicated thread and
/// pump its message loop for the rest of the process lifetime.
///
/// Returns once the hooks are installed, or with the installation error.
pub fn spawn_event_hook(sink: SyncSender<WindowEvent>) -> Result<JoinHandle<()>, InspectError> {
    let (ready_tx, ready_rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("win-event-hook".to_string())
        .spawn(move || run_hook_loop(sink, ready_tx))
        .map_err(|e| InspectError::Query {
            what: "event hook thread",
            reason: e.to_string(),
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(InspectError::Query {
            what: "event hook",
            reason: "hook thread exited during setup".to_string(),
        }),
    }
}

fn run_hook_loop(sink: SyncSender<WindowEvent>, ready: Sender<Result<(), InspectError>>) {
    EVENT_SINK.with(|s| *s.borrow_mut() = Some(sink));

    unsafe {
        let foreground = SetWinEventHook(
            EVENT_SYSTEM_FOREGROUND,
            EVENT_SYSTEM_FOREGROUND,
            None,
            Some(on_win_event),
            0,
            0,
            WINEVENT_OUTOFCONTEXT,
        );
        if foreground.is_invalid() {
            let _ = ready.send(Err(InspectError::Query {
                what: "foreground event hook",
                reason: windows::core::Error::from_win32().to_string(),
            }));
            return;
        }

        let lifecycle = SetWinEventHook(
            EVENT_OBJECT_CREATE,
            EVENT_OBJECT_DESTROY,
            None,
            Some(on_win_event),
            0,
            0,
            WINEVENT_OUTOFCONTEXT,
        );
        if lifecycle.is_invalid() {
            let reason = windows::core::Error::from_win32().to_string();
            unhook(foreground);
            let _ = ready.send(Err(InspectError::Query {
                what: "create/destroy event hook",
                reason,
            }));
            return;
        }

        let _ = ready.send(Ok(()));
        debug!("WinEvent hooks installed");

        let mut msg = MSG::default();
        loop {
            let ret = GetMessageW(&mut msg, None, 0, 0);
            if ret.0 == -1 {
                error!("GetMessageW failed: {}", windows::core::Error::from_win32());
                break;
            }
            if ret.0 == 0 {
                break;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        unhook(lifecycle);
        unhook(foreground);
    }

    // Dropping the sender ends the evaluation loop
    EVENT_SINK.with(|s| s.borrow_mut().take());
    debug!("WinEvent message loop exited");
}

unsafe fn unhook(hook: HWINEVENTHOOK) {
    if !UnhookWinEvent(hook).as_bool() {
        warn!("Failed to remove event hook {:?}", hook);
    }
}
