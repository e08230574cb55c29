/*
 * The Win32 backend. Top-level windows belong to one registered window
 * class whose procedure lives in `window_common`; widgets are native child
 * controls (BUTTON, STATIC, EDIT) created by `controls`. Each top-level
 * window has a `BackBuffer` that is presented on render and on WM_PAINT.
 *
 * Messages are pumped without blocking in `next_event`. The window
 * procedure queues decoded events in thread-local state, which `next_event`
 * drains before pumping again. WM_QUIT, posted when the last window is
 * destroyed, is reported as `Quit`.
 */
mod controls;
mod styling;
mod surface;
mod window_common;

use self::surface::BackBuffer;
use self::window_common::{PaintSource, hwnd_handle, hwnd_key, with_shared};
use super::backend::{PlatformBackend, PlatformWidgetState, PlatformWindowState};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{NativeEvent, NativeHandle};
use crate::core::ToolkitConfig;
use crate::core::widget::WidgetProperties;
use crate::core::window::WindowProperties;

use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, RECT},
        Graphics::Gdi::InvalidateRect,
        System::LibraryLoader::GetModuleHandleW,
        UI::Input::KeyboardAndMouse::EnableWindow,
        UI::WindowsAndMessaging::{
            AdjustWindowRect, CW_USEDEFAULT, CreateWindowExW, DestroyWindow, DispatchMessageW,
            MSG, PM_REMOVE, PeekMessageW, SW_HIDE, SW_SHOW, SWP_NOACTIVATE, SWP_NOZORDER,
            SetWindowPos, SetWindowTextW, ShowWindow, TranslateMessage, WINDOW_EX_STYLE,
            WM_QUIT, WS_CLIPCHILDREN, WS_MAXIMIZEBOX, WS_OVERLAPPEDWINDOW, WS_THICKFRAME,
        },
    },
    core::{HSTRING, PCWSTR},
};

#[derive(Debug)]
pub struct Win32WindowState {
    hwnd: HWND,
    buffer: BackBuffer,
    dirty: bool,
}

impl PlatformWindowState for Win32WindowState {
    fn native_handle(&self) -> NativeHandle {
        hwnd_handle(self.hwnd)
    }
}

#[derive(Debug)]
pub struct Win32WidgetState {
    hwnd: HWND,
    control_id: i32,
}

impl PlatformWidgetState for Win32WidgetState {
    fn native_handle(&self) -> NativeHandle {
        hwnd_handle(self.hwnd)
    }

    fn control_id(&self) -> Option<i32> {
        Some(self.control_id)
    }
}

#[derive(Default)]
pub struct Win32Platform {
    instance: Option<HINSTANCE>,
    class_name: HSTRING,
    next_control_id: i32,
}

impl Win32Platform {
    pub fn new() -> Self {
        Self::default()
    }

    fn instance(&self) -> PlatformResult<HINSTANCE> {
        self.instance.ok_or(PlatformError::NotInitialized)
    }

    fn allocate_control_id(&mut self) -> PlatformResult<i32> {
        let id = self.next_control_id;
        self.next_control_id = id.checked_add(1).ok_or_else(|| {
            PlatformError::ControlCreationFailed("Control ids exhausted".to_string())
        })?;
        Ok(id)
    }
}

fn register_paint_source(hwnd: HWND, buffer: &BackBuffer) {
    let (width, height) = buffer.size();
    with_shared(|shared| {
        shared.paint_sources.insert(
            hwnd_key(hwnd),
            PaintSource {
                dc: buffer.dc(),
                width,
                height,
            },
        )
    });
}

fn drop_pending_for(hwnd: HWND) {
    let source = hwnd_handle(hwnd);
    with_shared(|shared| shared.pending.retain(|e| e.source != source));
}

fn destroy_hwnd(hwnd: HWND) {
    if let Err(e) = unsafe { DestroyWindow(hwnd) } {
        log::warn!("Win32: DestroyWindow for {hwnd:?} failed: {e}");
    }
}

impl PlatformBackend for Win32Platform {
    type WindowState = Win32WindowState;
    type WidgetState = Win32WidgetState;

    fn initialize(&mut self, config: &ToolkitConfig) -> PlatformResult<()> {
        if self.instance.is_some() {
            return Ok(());
        }
        let module = unsafe { GetModuleHandleW(PCWSTR::null()) }.map_err(|e| {
            PlatformError::InitializationFailed(format!("GetModuleHandleW failed: {e}"))
        })?;
        let instance = HINSTANCE(module.0);
        let class_name = HSTRING::from(config.window_class_name.as_str());
        window_common::register_window_class(instance, &class_name)?;

        self.instance = Some(instance);
        self.class_name = class_name;
        self.next_control_id = config.first_control_id;
        Ok(())
    }

    fn terminate(&mut self) {
        let Some(instance) = self.instance.take() else {
            return;
        };
        // Drop the WM_QUIT a final window destruction may have posted.
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, WM_QUIT, WM_QUIT, PM_REMOVE).as_bool() {}
        }
        let leftovers = with_shared(std::mem::take);
        drop(leftovers);
        window_common::unregister_window_class(instance, &self.class_name);
        log::debug!("Win32: Terminated.");
    }

    fn create_window(&mut self, props: &WindowProperties) -> PlatformResult<Win32WindowState> {
        let instance = self.instance()?;
        let mut style = WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN;
        if !props.resizable {
            style &= !(WS_THICKFRAME | WS_MAXIMIZEBOX);
        }
        // Size the frame so the client area matches the requested size.
        let mut frame = RECT {
            left: 0,
            top: 0,
            right: props.width,
            bottom: props.height,
        };
        unsafe { AdjustWindowRect(&mut frame, style, false) }?;

        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                &self.class_name,
                &HSTRING::from(props.title.as_str()),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                frame.right - frame.left,
                frame.bottom - frame.top,
                None,
                None,
                Some(instance),
                None,
            )
        }
        .map_err(|e| PlatformError::WindowCreationFailed(format!("CreateWindowExW failed: {e}")))?;

        let buffer = match BackBuffer::create(hwnd, props.width, props.height) {
            Ok(buffer) => buffer,
            Err(e) => {
                destroy_hwnd(hwnd);
                drop_pending_for(hwnd);
                return Err(PlatformError::WindowCreationFailed(e.to_string()));
            }
        };
        register_paint_source(hwnd, &buffer);
        log::debug!(
            "Win32: Created window {hwnd:?} ({}x{}).",
            props.width,
            props.height
        );
        Ok(Win32WindowState {
            hwnd,
            buffer,
            dirty: true,
        })
    }

    fn destroy_window(&mut self, window: Win32WindowState) {
        // WM_DESTROY unregisters the paint source before the buffer goes away.
        destroy_hwnd(window.hwnd);
        drop_pending_for(window.hwnd);
        drop(window);
    }

    fn show_window(&mut self, window: &mut Win32WindowState) {
        unsafe {
            _ = ShowWindow(window.hwnd, SW_SHOW);
        }
        window.dirty = true;
    }

    fn hide_window(&mut self, window: &mut Win32WindowState) {
        unsafe {
            _ = ShowWindow(window.hwnd, SW_HIDE);
        }
    }

    fn set_window_title(&mut self, window: &mut Win32WindowState, title: &str) {
        if let Err(e) = unsafe { SetWindowTextW(window.hwnd, &HSTRING::from(title)) } {
            log::warn!("Win32: SetWindowTextW for {:?} failed: {e}", window.hwnd);
        }
    }

    fn resize_window_surface(&mut self, window: &mut Win32WindowState, width: i32, height: i32) {
        match BackBuffer::create(window.hwnd, width, height) {
            Ok(buffer) => {
                register_paint_source(window.hwnd, &buffer);
                window.buffer = buffer;
                window.dirty = true;
            }
            Err(e) => log::error!("Win32: Keeping the old back buffer: {e}"),
        }
    }

    fn invalidate_window(&mut self, window: &mut Win32WindowState) {
        window.dirty = true;
    }

    fn render_window(&mut self, window: &mut Win32WindowState) {
        if !window.dirty {
            return;
        }
        window.buffer.clear();
        window.buffer.present(window.hwnd);
        window.dirty = false;
    }

    fn create_widget(
        &mut self,
        window: &Win32WindowState,
        props: &WidgetProperties,
    ) -> PlatformResult<Win32WidgetState> {
        let instance = self.instance()?;
        if !props.kind.is_supported() {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Win32 backend has no {:?} control",
                props.kind
            )));
        }
        let control_id = self.allocate_control_id()?;
        let hwnd = controls::create_control(instance, window.hwnd, control_id, props)?;
        Ok(Win32WidgetState { hwnd, control_id })
    }

    fn destroy_widget(&mut self, widget: Win32WidgetState) {
        destroy_hwnd(widget.hwnd);
        controls::forget_colors(widget.hwnd);
        drop_pending_for(widget.hwnd);
    }

    fn update_widget(
        &mut self,
        _window: &Win32WindowState,
        widget: &mut Win32WidgetState,
        props: &WidgetProperties,
    ) {
        let hwnd = widget.hwnd;
        // Rewriting identical text would reset the caret and echo an EN_CHANGE.
        if controls::input_handler::read_control_text(hwnd) != props.text {
            if let Err(e) = unsafe { SetWindowTextW(hwnd, &HSTRING::from(props.text.as_str())) } {
                log::warn!("Win32: SetWindowTextW for control {hwnd:?} failed: {e}");
            }
        }
        if let Err(e) = unsafe {
            SetWindowPos(
                hwnd,
                None,
                props.rect.x,
                props.rect.y,
                props.rect.width,
                props.rect.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        } {
            log::warn!("Win32: SetWindowPos for control {hwnd:?} failed: {e}");
        }
        controls::store_colors(hwnd, props);
        unsafe {
            _ = ShowWindow(hwnd, if props.visible { SW_SHOW } else { SW_HIDE });
            _ = EnableWindow(hwnd, props.enabled);
            _ = InvalidateRect(Some(hwnd), None, true);
        }
    }

    fn paint_widget(
        &mut self,
        _window: &Win32WindowState,
        widget: &mut Win32WidgetState,
        _props: &WidgetProperties,
    ) {
        unsafe {
            _ = InvalidateRect(Some(widget.hwnd), None, true);
        }
    }

    fn next_event(&mut self) -> Option<NativeEvent> {
        self.instance?;
        loop {
            if let Some(event) = with_shared(|shared| shared.pending.pop_front()) {
                return Some(event);
            }
            let mut msg = MSG::default();
            let available = unsafe { PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE) }.as_bool();
            if !available {
                return None;
            }
            if msg.message == WM_QUIT {
                log::debug!("Win32: WM_QUIT received.");
                return Some(NativeEvent::quit());
            }
            unsafe {
                _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}
