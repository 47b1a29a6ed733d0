//! The per-thread runtime: event loop, open windows, and pending key presses.
//!
//! `winit` refuses to create a second event loop, so the event loop
//! outlives `cleanup()` and is reused by a later `init()`.

use std::{
    cell::RefCell,
    collections::VecDeque,
    time::{Duration, Instant},
};

use slotmap::SlotMap;
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    keyboard::Key,
    platform::pump_events::EventLoopExtPumpEvents,
};

use crate::{presenter::NativeSurface, Error, Result, WindowOptions};

/// Key presses beyond this many are dropped, oldest first.
const MAX_PENDING_KEYS: usize = 64;

slotmap::new_key_type! {
    /// Handle to a native window owned by the runtime.
    pub(crate) struct WindowKey;
}

#[derive(Default)]
struct Runtime {
    initialized: bool,
    event_loop: Option<EventLoop<()>>,
    windows: SlotMap<WindowKey, NativeSurface>,
    keys: VecDeque<String>,
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

impl Runtime {
    /// Dispatches pending events, waiting at most `timeout` for new ones.
    fn pump(&mut self, timeout: Duration) {
        let Runtime {
            event_loop,
            windows,
            keys,
            ..
        } = self;
        let event_loop = match event_loop {
            Some(event_loop) => event_loop,
            None => return,
        };

        let _status = event_loop.pump_events(Some(timeout), |event, _| {
            let (window_id, event) = match event {
                Event::WindowEvent { window_id, event } => (window_id, event),
                _ => return,
            };
            match event {
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    if keys.len() == MAX_PENDING_KEYS {
                        keys.pop_front();
                    }
                    keys.push_back(key_name(&event.logical_key));
                }
                WindowEvent::RedrawRequested => {
                    if let Some(surface) = windows.values_mut().find(|s| s.id() == window_id) {
                        if let Err(e) = surface.redraw() {
                            log::warn!("Failed to redraw window {:?}: {}", window_id, e);
                        }
                    }
                }
                WindowEvent::CloseRequested => {
                    log::debug!("close requested for window {:?}", window_id);
                }
                _ => {}
            }
        });
    }
}

fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> Result<R>) -> Result<R> {
    RUNTIME.with(|runtime| {
        let mut runtime = runtime.borrow_mut();
        if !runtime.initialized {
            return Err(Error::NotInitialized);
        }
        f(&mut runtime)
    })
}

/// Initializes `ezdraw` on the current thread.
///
/// Must be called before creating a window, waiting, or reading keys.
/// Calling it again while initialized does nothing.
pub fn init() -> Result<()> {
    RUNTIME.with(|runtime| {
        let mut runtime = runtime.borrow_mut();
        if runtime.initialized {
            return Ok(());
        }
        if runtime.event_loop.is_none() {
            runtime.event_loop = Some(new_event_loop()?);
            log::info!("Started event loop");
        }
        runtime.initialized = true;
        Ok(())
    })
}

fn new_event_loop() -> Result<EventLoop<()>> {
    let mut builder = EventLoopBuilder::new();
    // the runtime is per thread, so the event loop need not be on the main one
    #[cfg(all(
        feature = "x11",
        unix,
        not(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "android",
            target_os = "emscripten",
            target_os = "redox"
        ))
    ))]
    winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    #[cfg(all(
        feature = "wayland",
        not(feature = "x11"),
        unix,
        not(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "android",
            target_os = "emscripten",
            target_os = "redox"
        ))
    ))]
    winit::platform::wayland::EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    Ok(builder.build()?)
}

pub fn is_initialized() -> bool {
    RUNTIME.with(|runtime| runtime.borrow().initialized)
}

/// Closes every open window and uninitializes `ezdraw`.
pub fn cleanup() -> Result<()> {
    with_runtime(|runtime| {
        let closed = runtime.windows.len();
        runtime.windows.clear();
        runtime.keys.clear();
        runtime.initialized = false;
        log::info!("Cleaned up, closed {} windows", closed);
        Ok(())
    })
}

/// Waits for `msec` milliseconds. Windows keep processing events meanwhile.
pub fn delay(msec: u64) -> Result<()> {
    with_runtime(|runtime| {
        let deadline = Instant::now() + Duration::from_millis(msec);
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            runtime.pump(deadline - now);
        }
    })
}

/// Blocks until a key is pressed in any window and returns the key's name,
/// e.g. `"A"`, `"Space"` or `"Escape"`.
pub fn waitkey() -> Result<String> {
    with_runtime(|runtime| loop {
        if let Some(key) = runtime.keys.pop_front() {
            return Ok(key);
        }
        runtime.pump(Duration::from_millis(10));
    })
}

/// Dispatches pending events without waiting. Does nothing if not initialized.
pub(crate) fn poll_events() {
    let _ = with_runtime(|runtime| {
        runtime.pump(Duration::ZERO);
        Ok(())
    });
}

pub(crate) fn open_window(options: &WindowOptions) -> Result<(WindowKey, (u32, u32))> {
    with_runtime(|runtime| {
        let event_loop = runtime.event_loop.as_ref().ok_or(Error::NotInitialized)?;
        let (surface, size) = NativeSurface::open(event_loop, options)?;
        let key = runtime.windows.insert(surface);
        runtime.pump(Duration::ZERO);
        Ok((key, size))
    })
}

pub(crate) fn with_window<R>(
    key: WindowKey,
    f: impl FnOnce(&mut NativeSurface) -> Result<R>,
) -> Result<R> {
    RUNTIME.with(|runtime| {
        let mut runtime = runtime.borrow_mut();
        let surface = runtime.windows.get_mut(key).ok_or(Error::WindowClosed)?;
        f(surface)
    })
}

pub(crate) fn is_window_open(key: WindowKey) -> bool {
    RUNTIME.with(|runtime| runtime.borrow().windows.contains_key(key))
}

pub(crate) fn close_window(key: WindowKey) {
    // may run from a destructor, possibly during thread teardown
    let _ = RUNTIME.try_with(|runtime| {
        if let Ok(mut runtime) = runtime.try_borrow_mut() {
            runtime.windows.remove(key);
        }
    });
}

/// Names a key the way SDL does: printable keys upper-cased,
/// other keys by their name.
fn key_name(key: &Key) -> String {
    match key {
        Key::Character(text) => text.to_uppercase(),
        Key::Named(named) => format!("{:?}", named),
        Key::Dead(Some(c)) => c.to_uppercase().collect(),
        Key::Dead(None) | Key::Unidentified(_) => String::from("Unknown"),
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::NamedKey;

    use super::*;
    use crate::Window;

    #[test]
    fn requires_init() {
        assert!(!is_initialized());
        assert!(matches!(delay(1), Err(Error::NotInitialized)));
        assert!(matches!(waitkey(), Err(Error::NotInitialized)));
        assert!(matches!(cleanup(), Err(Error::NotInitialized)));
        assert!(matches!(
            open_window(&WindowOptions::default()),
            Err(Error::NotInitialized)
        ));
        // harmless without a runtime
        poll_events();
    }

    fn open_windows() -> usize {
        RUNTIME.with(|runtime| runtime.borrow().windows.len())
    }

    // Needs a display. Only one event loop may exist per process, so
    // every check that needs one lives in this test.
    #[test]
    #[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
    fn init_cleanup_and_reinit() {
        if init().is_err() {
            return;
        }
        init().unwrap();
        assert!(is_initialized());

        let mut window = Window::builder().size(64, 48).build().unwrap();
        assert_eq!(window.size(), (64, 48));
        assert!(window.is_open());
        assert_eq!(open_windows(), 1);
        delay(1).unwrap();

        // dropping a window unregisters it
        drop(Window::builder().size(16, 16).build().unwrap());
        assert_eq!(open_windows(), 1);

        window.set_auto_update(false).unwrap();
        cleanup().unwrap();
        assert!(!is_initialized());
        assert_eq!(open_windows(), 0);
        assert!(!window.is_open());
        window.line(0, 0, 10, 10).unwrap();
        assert!(matches!(window.update(), Err(Error::WindowClosed)));

        // reuses the event loop, which winit cannot create twice
        init().unwrap();
        let other = Window::builder().size(32, 32).build().unwrap();
        assert!(other.is_open());
        assert!(!window.is_open());
        drop(window);
        assert!(other.is_open());
        cleanup().unwrap();
    }

    #[test]
    fn key_names() {
        assert_eq!(key_name(&Key::Character("a".into())), "A");
        assert_eq!(key_name(&Key::Character("1".into())), "1");
        assert_eq!(key_name(&Key::Named(NamedKey::Space)), "Space");
        assert_eq!(key_name(&Key::Named(NamedKey::Escape)), "Escape");
        assert_eq!(key_name(&Key::Dead(None)), "Unknown");
    }
}
