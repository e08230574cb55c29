/*
 * A recording, display-less backend used by the unit tests. Every backend
 * call is appended to `calls`, native events are scripted through `events`,
 * and individual operations can be told to fail. Native handles and control
 * ids are handed out from counters the same way a real windowing system
 * would hand them out.
 */
use super::backend::{PlatformBackend, PlatformWidgetState, PlatformWindowState};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{NativeEvent, NativeEventKind, NativeHandle};
use crate::core::ToolkitConfig;
use crate::core::widget::WidgetProperties;
use crate::core::window::WindowProperties;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MockCall {
    Initialize,
    Terminate,
    CreateWindow(NativeHandle),
    DestroyWindow(NativeHandle),
    ShowWindow(NativeHandle),
    HideWindow(NativeHandle),
    SetWindowTitle(NativeHandle, String),
    ResizeSurface(NativeHandle, i32, i32),
    InvalidateWindow(NativeHandle),
    RenderWindow(NativeHandle),
    CreateWidget(NativeHandle),
    DestroyWidget(NativeHandle),
    UpdateWidget(NativeHandle, WidgetProperties),
    PaintWidget(NativeHandle),
}

#[derive(Debug)]
pub(crate) struct MockWindowState {
    pub(crate) handle: NativeHandle,
    pub(crate) surface: (i32, i32),
    pub(crate) dirty: bool,
    pub(crate) presented: usize,
}

impl MockWindowState {
    pub(crate) fn new(handle: NativeHandle, width: i32, height: i32) -> Self {
        MockWindowState {
            handle,
            surface: (width, height),
            dirty: true,
            presented: 0,
        }
    }
}

impl PlatformWindowState for MockWindowState {
    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

#[derive(Debug)]
pub(crate) struct MockWidgetState {
    pub(crate) handle: NativeHandle,
    pub(crate) control_id: i32,
}

impl MockWidgetState {
    pub(crate) fn new(handle: NativeHandle, control_id: i32) -> Self {
        MockWidgetState { handle, control_id }
    }
}

impl PlatformWidgetState for MockWidgetState {
    fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    fn control_id(&self) -> Option<i32> {
        Some(self.control_id)
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockPlatform {
    pub(crate) calls: Vec<MockCall>,
    pub(crate) events: VecDeque<NativeEvent>,
    pub(crate) fail_initialize: bool,
    pub(crate) fail_create_window: bool,
    pub(crate) fail_create_widget: bool,
    pub(crate) initialized: bool,
    pub(crate) live_windows: HashSet<NativeHandle>,
    pub(crate) live_widgets: HashSet<NativeHandle>,
    next_native: u64,
    next_control_id: i32,
}

impl MockPlatform {
    pub(crate) fn new() -> Self {
        MockPlatform::default()
    }

    fn allocate_native(&mut self) -> NativeHandle {
        self.next_native += 1;
        NativeHandle(0x1000 + self.next_native)
    }

    pub(crate) fn push_event(&mut self, source: NativeHandle, kind: NativeEventKind) {
        self.events.push_back(NativeEvent::new(source, kind));
    }

    pub(crate) fn count_calls(&self, matches: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }
}

impl PlatformBackend for MockPlatform {
    type WindowState = MockWindowState;
    type WidgetState = MockWidgetState;

    fn initialize(&mut self, config: &ToolkitConfig) -> PlatformResult<()> {
        self.calls.push(MockCall::Initialize);
        if self.fail_initialize {
            return Err(PlatformError::InitializationFailed(
                "mock display unavailable".to_string(),
            ));
        }
        self.initialized = true;
        self.next_control_id = config.first_control_id;
        Ok(())
    }

    fn terminate(&mut self) {
        self.calls.push(MockCall::Terminate);
        self.initialized = false;
    }

    fn create_window(&mut self, props: &WindowProperties) -> PlatformResult<MockWindowState> {
        if !self.initialized {
            return Err(PlatformError::NotInitialized);
        }
        if self.fail_create_window {
            return Err(PlatformError::WindowCreationFailed(
                "mock refused window".to_string(),
            ));
        }
        let handle = self.allocate_native();
        self.calls.push(MockCall::CreateWindow(handle));
        self.live_windows.insert(handle);
        Ok(MockWindowState::new(handle, props.width, props.height))
    }

    fn destroy_window(&mut self, window: MockWindowState) {
        self.calls.push(MockCall::DestroyWindow(window.handle));
        self.live_windows.remove(&window.handle);
    }

    fn show_window(&mut self, window: &mut MockWindowState) {
        self.calls.push(MockCall::ShowWindow(window.handle));
    }

    fn hide_window(&mut self, window: &mut MockWindowState) {
        self.calls.push(MockCall::HideWindow(window.handle));
    }

    fn set_window_title(&mut self, window: &mut MockWindowState, title: &str) {
        self.calls
            .push(MockCall::SetWindowTitle(window.handle, title.to_string()));
    }

    fn resize_window_surface(&mut self, window: &mut MockWindowState, width: i32, height: i32) {
        self.calls
            .push(MockCall::ResizeSurface(window.handle, width, height));
        window.surface = (width, height);
        window.dirty = true;
    }

    fn invalidate_window(&mut self, window: &mut MockWindowState) {
        self.calls.push(MockCall::InvalidateWindow(window.handle));
        window.dirty = true;
    }

    fn render_window(&mut self, window: &mut MockWindowState) {
        self.calls.push(MockCall::RenderWindow(window.handle));
        if window.dirty {
            window.presented += 1;
            window.dirty = false;
        }
    }

    fn create_widget(
        &mut self,
        window: &MockWindowState,
        props: &WidgetProperties,
    ) -> PlatformResult<MockWidgetState> {
        if !self.live_windows.contains(&window.handle) {
            return Err(PlatformError::InvalidHandle(format!(
                "mock window {:?} is not live",
                window.handle
            )));
        }
        if self.fail_create_widget || !props.kind.is_supported() {
            return Err(PlatformError::ControlCreationFailed(format!(
                "mock cannot create {:?}",
                props.kind
            )));
        }
        let handle = self.allocate_native();
        let control_id = self.next_control_id;
        self.next_control_id += 1;
        self.calls.push(MockCall::CreateWidget(handle));
        self.live_widgets.insert(handle);
        Ok(MockWidgetState::new(handle, control_id))
    }

    fn destroy_widget(&mut self, widget: MockWidgetState) {
        self.calls.push(MockCall::DestroyWidget(widget.handle));
        self.live_widgets.remove(&widget.handle);
    }

    fn update_widget(
        &mut self,
        _window: &MockWindowState,
        widget: &mut MockWidgetState,
        props: &WidgetProperties,
    ) {
        self.calls
            .push(MockCall::UpdateWidget(widget.handle, props.clone()));
    }

    fn paint_widget(
        &mut self,
        _window: &MockWindowState,
        widget: &mut MockWidgetState,
        _props: &WidgetProperties,
    ) {
        self.calls.push(MockCall::PaintWidget(widget.handle));
    }

    fn next_event(&mut self) -> Option<NativeEvent> {
        self.events.pop_front()
    }
}
