/*
 * The X11 backend, built on x11rb's pure-Rust connection.
 *
 * Top-level windows are plain X windows carrying a GC and an off-screen
 * pixmap of the window's size; presenting a window copies that pixmap onto
 * it. Windows take part in the WM_DELETE_WINDOW protocol so that the close
 * button arrives as a client message instead of killing the connection.
 *
 * Widgets are child windows painted by `painter`. A left button press on a
 * widget window is reported as an `Activate` immediately followed by the
 * ordinary `MouseButton` event, which the owning top-level window reports so
 * it survives the widget's destruction. The core decides whether that
 * activation is a click. X11 text fields are display-only.
 *
 * The backend never blocks: `next_event` polls the connection. Losing the
 * connection is reported as `Quit`.
 */
mod keymap;
mod painter;

use self::keymap::Keymap;
use self::painter::FontMetrics;
use super::backend::{PlatformBackend, PlatformWidgetState, PlatformWindowState};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{MouseButton, NativeEvent, NativeEventKind, NativeHandle};
use crate::core::ToolkitConfig;
use crate::core::widget::WidgetProperties;
use crate::core::window::WindowProperties;
use std::collections::{HashMap, VecDeque};
use x11rb::connection::Connection;
use x11rb::errors::ConnectionError;
use x11rb::properties::WmSizeHints;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    self, AtomEnum, BackPixmap, ChangeGCAux, ChangeWindowAttributesAux, ClientMessageEvent,
    ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask, Font,
    Gcontext, Pixmap, PropMode, Rectangle, Screen, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

x11rb::atom_manager! {
    pub(crate) ToolkitAtoms: ToolkitAtomsCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

const LEFT_BUTTON: u8 = 1;
const MIDDLE_BUTTON: u8 = 2;
const RIGHT_BUTTON: u8 = 3;

fn top_level_events() -> EventMask {
    EventMask::EXPOSURE
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::BUTTON_RELEASE
        | EventMask::POINTER_MOTION
        | EventMask::KEY_PRESS
        | EventMask::KEY_RELEASE
}

fn widget_events() -> EventMask {
    EventMask::EXPOSURE
        | EventMask::BUTTON_PRESS
        | EventMask::BUTTON_RELEASE
        | EventMask::POINTER_MOTION
        | EventMask::KEY_PRESS
        | EventMask::KEY_RELEASE
}

fn native_handle(window: xproto::Window) -> NativeHandle {
    NativeHandle(u64::from(window))
}

// Logs a failed request; X11 drawing failures are never fatal.
fn log_failure<T, E: std::fmt::Display>(result: Result<T, E>, what: &str) {
    if let Err(e) = result {
        log::error!("X11: {what} failed: {e}");
    }
}

struct X11Session {
    conn: RustConnection,
    screen_num: usize,
    atoms: ToolkitAtoms,
    font: Font,
    metrics: FontMetrics,
    keymap: Keymap,
}

impl X11Session {
    fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }
}

#[derive(Debug)]
pub struct X11WindowState {
    window: xproto::Window,
    gc: Gcontext,
    buffer: Pixmap,
    width: u16,
    height: u16,
    dirty: bool,
}

impl PlatformWindowState for X11WindowState {
    fn native_handle(&self) -> NativeHandle {
        native_handle(self.window)
    }
}

#[derive(Debug)]
pub struct X11WidgetState {
    window: xproto::Window,
}

impl PlatformWidgetState for X11WidgetState {
    fn native_handle(&self) -> NativeHandle {
        native_handle(self.window)
    }
}

#[derive(Default)]
pub struct X11Platform {
    session: Option<X11Session>,
    // Child windows that represent widgets, mapped to their top-level window.
    widget_windows: HashMap<xproto::Window, xproto::Window>,
    // Native events decoded from one X event but not yet handed out.
    pending: VecDeque<NativeEvent>,
}

impl X11Platform {
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&self) -> PlatformResult<&X11Session> {
        self.session.as_ref().ok_or(PlatformError::NotInitialized)
    }
}

fn open_session(config: &ToolkitConfig) -> PlatformResult<X11Session> {
    let (conn, screen_num) = RustConnection::connect(None).map_err(|e| {
        PlatformError::InitializationFailed(format!("Failed to open X display: {e}"))
    })?;
    let atoms = ToolkitAtoms::new(&conn)?.reply()?;

    let font = conn.generate_id()?;
    conn.open_font(font, config.x11_font.as_bytes())?
        .check()
        .map_err(|e| {
            PlatformError::InitializationFailed(format!(
                "Failed to load font '{}': {e}",
                config.x11_font
            ))
        })?;
    let font_info = conn.query_font(font)?.reply()?;
    let metrics = FontMetrics {
        ascent: font_info.font_ascent,
        descent: font_info.font_descent,
        char_width: font_info.max_bounds.character_width,
    };
    let keymap = Keymap::load(&conn)?;

    log::debug!(
        "X11: Connected to screen {screen_num}, font '{}' ({metrics:?}).",
        config.x11_font
    );
    Ok(X11Session {
        conn,
        screen_num,
        atoms,
        font,
        metrics,
        keymap,
    })
}

fn set_title(
    session: &X11Session,
    window: xproto::Window,
    title: &str,
) -> Result<(), ConnectionError> {
    session.conn.change_property8(
        PropMode::REPLACE,
        window,
        AtomEnum::WM_NAME,
        AtomEnum::STRING,
        &painter::latin1_bytes(title),
    )?;
    session.conn.change_property8(
        PropMode::REPLACE,
        window,
        session.atoms._NET_WM_NAME,
        session.atoms.UTF8_STRING,
        title.as_bytes(),
    )?;
    Ok(())
}

/*
 * Everything after the X window itself exists: title, close protocol, size
 * hints, GC and off-screen buffer. On failure the caller destroys the window.
 */
fn finish_window(
    session: &X11Session,
    window: xproto::Window,
    props: &WindowProperties,
    width: u16,
    height: u16,
) -> PlatformResult<X11WindowState> {
    let conn = &session.conn;
    let screen = session.screen();

    set_title(session, window, &props.title)?;
    conn.change_property32(
        PropMode::REPLACE,
        window,
        session.atoms.WM_PROTOCOLS,
        AtomEnum::ATOM,
        &[session.atoms.WM_DELETE_WINDOW],
    )?;
    if !props.resizable {
        let size = (i32::from(width), i32::from(height));
        let mut hints = WmSizeHints::new();
        hints.min_size = Some(size);
        hints.max_size = Some(size);
        hints.set_normal_hints(conn, window)?;
    }

    let gc = conn.generate_id()?;
    conn.create_gc(
        gc,
        window,
        &CreateGCAux::new()
            .font(session.font)
            .foreground(screen.black_pixel)
            .background(screen.white_pixel),
    )?;
    let buffer = conn.generate_id()?;
    if let Err(e) = conn.create_pixmap(screen.root_depth, buffer, window, width, height) {
        log_failure(conn.free_gc(gc), "free_gc");
        return Err(e.into());
    }
    conn.flush()?;

    Ok(X11WindowState {
        window,
        gc,
        buffer,
        width,
        height,
        dirty: true,
    })
}

fn is_delete_request(event: &ClientMessageEvent, atoms: &ToolkitAtoms) -> bool {
    event.format == 32
        && event.type_ == atoms.WM_PROTOCOLS
        && event.data.as_data32()[0] == atoms.WM_DELETE_WINDOW
}

/*
 * Translates an X button number. `owner` is the top-level window when
 * `source` is a widget window: a left press there yields an `Activate` from
 * the widget, and the `MouseButton` is reported by the owner with the
 * widget-relative coordinates. Buttons other than 1-3 (wheel, extra buttons)
 * yield nothing.
 */
fn decode_button(
    source: NativeHandle,
    detail: u8,
    pressed: bool,
    x: i16,
    y: i16,
    owner: Option<NativeHandle>,
) -> Vec<NativeEvent> {
    let button = match detail {
        LEFT_BUTTON => MouseButton::Left,
        MIDDLE_BUTTON => MouseButton::Middle,
        RIGHT_BUTTON => MouseButton::Right,
        _ => return Vec::new(),
    };
    let (x, y) = (i32::from(x), i32::from(y));
    let mut events = Vec::with_capacity(2);
    if pressed && owner.is_some() && button == MouseButton::Left {
        events.push(NativeEvent::new(
            source,
            NativeEventKind::Activate {
                position: Some((x, y)),
            },
        ));
    }
    events.push(NativeEvent::new(
        owner.unwrap_or(source),
        NativeEventKind::MouseButton {
            button,
            pressed,
            x,
            y,
        },
    ));
    events
}

fn decode_key(event: &xproto::KeyPressEvent, pressed: bool, map: &Keymap) -> NativeEvent {
    let mods = keymap::modifiers(event.state);
    NativeEvent::new(
        native_handle(event.event),
        NativeEventKind::Key {
            key_code: map.keysym(event.detail) as i32,
            pressed,
            ctrl: mods.ctrl,
            shift: mods.shift,
            alt: mods.alt,
        },
    )
}

fn decode_event(
    event: Event,
    session: &X11Session,
    widget_windows: &HashMap<xproto::Window, xproto::Window>,
) -> Vec<NativeEvent> {
    match event {
        // Only the last expose of a series triggers a repaint.
        Event::Expose(e) if e.count == 0 => {
            vec![NativeEvent::new(native_handle(e.window), NativeEventKind::Expose)]
        }
        Event::ConfigureNotify(e) => vec![NativeEvent::new(
            native_handle(e.window),
            NativeEventKind::Configure {
                width: i32::from(e.width),
                height: i32::from(e.height),
            },
        )],
        Event::ButtonPress(e) => decode_button(
            native_handle(e.event),
            e.detail,
            true,
            e.event_x,
            e.event_y,
            widget_windows.get(&e.event).copied().map(native_handle),
        ),
        Event::ButtonRelease(e) => decode_button(
            native_handle(e.event),
            e.detail,
            false,
            e.event_x,
            e.event_y,
            widget_windows.get(&e.event).copied().map(native_handle),
        ),
        Event::MotionNotify(e) => vec![NativeEvent::new(
            native_handle(e.event),
            NativeEventKind::MouseMove {
                x: i32::from(e.event_x),
                y: i32::from(e.event_y),
            },
        )],
        Event::KeyPress(e) => vec![decode_key(&e, true, &session.keymap)],
        Event::KeyRelease(e) => vec![decode_key(&e, false, &session.keymap)],
        Event::ClientMessage(e) if is_delete_request(&e, &session.atoms) => {
            vec![NativeEvent::new(
                native_handle(e.window),
                NativeEventKind::CloseRequested,
            )]
        }
        Event::Error(e) => {
            log::warn!("X11: Server reported an error: {e:?}");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

impl PlatformBackend for X11Platform {
    type WindowState = X11WindowState;
    type WidgetState = X11WidgetState;

    fn initialize(&mut self, config: &ToolkitConfig) -> PlatformResult<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let session = open_session(config).map_err(|e| {
            log::error!("X11: Initialization failed: {e}");
            e
        })?;
        self.session = Some(session);
        Ok(())
    }

    fn terminate(&mut self) {
        if let Some(session) = self.session.take() {
            log_failure(session.conn.close_font(session.font), "close_font");
            log_failure(session.conn.flush(), "flush");
            log::debug!("X11: Connection closed.");
        }
        self.widget_windows.clear();
        self.pending.clear();
    }

    fn create_window(&mut self, props: &WindowProperties) -> PlatformResult<X11WindowState> {
        let session = self.session()?;
        let conn = &session.conn;
        let screen = session.screen();
        let width = painter::dimension(props.width);
        let height = painter::dimension(props.height);

        let window = conn.generate_id()?;
        conn.create_window(
            screen.root_depth,
            window,
            screen.root,
            0,
            0,
            width,
            height,
            1,
            WindowClass::INPUT_OUTPUT,
            screen.root_visual,
            &CreateWindowAux::new()
                .background_pixel(screen.white_pixel)
                .border_pixel(screen.black_pixel)
                .event_mask(top_level_events()),
        )
        .map_err(|e| PlatformError::WindowCreationFailed(format!("create_window: {e}")))?;

        match finish_window(session, window, props, width, height) {
            Ok(state) => {
                log::debug!("X11: Created window 0x{window:x} ({width}x{height}).");
                Ok(state)
            }
            Err(e) => {
                log::error!("X11: Failed to set up window 0x{window:x}: {e}");
                log_failure(conn.destroy_window(window), "destroy_window");
                log_failure(conn.flush(), "flush");
                Err(PlatformError::WindowCreationFailed(e.to_string()))
            }
        }
    }

    fn destroy_window(&mut self, window: X11WindowState) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let conn = &session.conn;
        log_failure(conn.free_pixmap(window.buffer), "free_pixmap");
        log_failure(conn.free_gc(window.gc), "free_gc");
        log_failure(conn.destroy_window(window.window), "destroy_window");
        log_failure(conn.flush(), "flush");
        // Events already queued for the window are dropped by the core's lookup.
        self.pending
            .retain(|e| e.source != native_handle(window.window));
    }

    fn show_window(&mut self, window: &mut X11WindowState) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        log_failure(session.conn.map_window(window.window), "map_window");
        log_failure(session.conn.flush(), "flush");
        window.dirty = true;
    }

    fn hide_window(&mut self, window: &mut X11WindowState) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        log_failure(session.conn.unmap_window(window.window), "unmap_window");
        log_failure(session.conn.flush(), "flush");
    }

    fn set_window_title(&mut self, window: &mut X11WindowState, title: &str) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        log_failure(set_title(session, window.window, title), "set_title");
        log_failure(session.conn.flush(), "flush");
    }

    fn resize_window_surface(&mut self, window: &mut X11WindowState, width: i32, height: i32) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let conn = &session.conn;
        let width = painter::dimension(width);
        let height = painter::dimension(height);
        let buffer = match conn.generate_id() {
            Ok(id) => id,
            Err(e) => {
                log::error!("X11: Could not allocate a new back buffer id: {e}");
                return;
            }
        };
        if let Err(e) = conn.create_pixmap(
            session.screen().root_depth,
            buffer,
            window.window,
            width,
            height,
        ) {
            log::error!("X11: Could not create a {width}x{height} back buffer: {e}");
            return;
        }
        log_failure(conn.free_pixmap(window.buffer), "free_pixmap");
        window.buffer = buffer;
        window.width = width;
        window.height = height;
        window.dirty = true;
        log_failure(conn.flush(), "flush");
    }

    fn invalidate_window(&mut self, window: &mut X11WindowState) {
        window.dirty = true;
    }

    fn render_window(&mut self, window: &mut X11WindowState) {
        if !window.dirty {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let conn = &session.conn;
        let whole = Rectangle {
            x: 0,
            y: 0,
            width: window.width,
            height: window.height,
        };
        let result = conn
            .change_gc(
                window.gc,
                &ChangeGCAux::new().foreground(session.screen().white_pixel),
            )
            .and_then(|_| conn.poly_fill_rectangle(window.buffer, window.gc, &[whole]))
            .and_then(|_| {
                conn.copy_area(
                    window.buffer,
                    window.window,
                    window.gc,
                    0,
                    0,
                    0,
                    0,
                    window.width,
                    window.height,
                )
            })
            .and_then(|_| conn.flush());
        log_failure(result, "render_window");
        window.dirty = false;
    }

    fn create_widget(
        &mut self,
        window: &X11WindowState,
        props: &WidgetProperties,
    ) -> PlatformResult<X11WidgetState> {
        if !props.kind.is_supported() {
            return Err(PlatformError::ControlCreationFailed(format!(
                "X11 backend has no {:?} widget",
                props.kind
            )));
        }
        let session = self.session()?;
        let conn = &session.conn;
        let child = conn.generate_id()?;
        let aux = CreateWindowAux::new().event_mask(widget_events());
        let aux = if props.background.is_transparent() {
            aux.background_pixmap(u32::from(BackPixmap::PARENT_RELATIVE))
        } else {
            aux.background_pixel(painter::color_to_pixel(props.background))
        };
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            child,
            window.window,
            painter::coordinate(props.rect.x),
            painter::coordinate(props.rect.y),
            painter::dimension(props.rect.width),
            painter::dimension(props.rect.height),
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &aux,
        )
        .map_err(|e| PlatformError::ControlCreationFailed(format!("create_window: {e}")))?;
        if props.visible {
            log_failure(conn.map_window(child), "map_window");
        }
        log_failure(conn.flush(), "flush");
        self.widget_windows.insert(child, window.window);
        log::trace!("X11: Created {:?} widget window 0x{child:x}.", props.kind);
        Ok(X11WidgetState { window: child })
    }

    fn destroy_widget(&mut self, widget: X11WidgetState) {
        self.widget_windows.remove(&widget.window);
        self.pending
            .retain(|e| e.source != native_handle(widget.window));
        let Some(session) = self.session.as_ref() else {
            return;
        };
        log_failure(session.conn.destroy_window(widget.window), "destroy_window");
        log_failure(session.conn.flush(), "flush");
    }

    fn update_widget(
        &mut self,
        window: &X11WindowState,
        widget: &mut X11WidgetState,
        props: &WidgetProperties,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let conn = &session.conn;
        let geometry = ConfigureWindowAux::new()
            .x(props.rect.x)
            .y(props.rect.y)
            .width(u32::from(painter::dimension(props.rect.width)))
            .height(u32::from(painter::dimension(props.rect.height)));
        log_failure(conn.configure_window(widget.window, &geometry), "configure_window");

        let attributes = if props.background.is_transparent() {
            ChangeWindowAttributesAux::new()
                .background_pixmap(u32::from(BackPixmap::PARENT_RELATIVE))
        } else {
            ChangeWindowAttributesAux::new()
                .background_pixel(painter::color_to_pixel(props.background))
        };
        log_failure(
            conn.change_window_attributes(widget.window, &attributes),
            "change_window_attributes",
        );

        if props.visible {
            log_failure(conn.map_window(widget.window), "map_window");
            log_failure(
                painter::paint_widget(conn, window.gc, widget.window, session.metrics, props),
                "paint_widget",
            );
        } else {
            log_failure(conn.unmap_window(widget.window), "unmap_window");
        }
        log_failure(conn.flush(), "flush");
    }

    fn paint_widget(
        &mut self,
        window: &X11WindowState,
        widget: &mut X11WidgetState,
        props: &WidgetProperties,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        log_failure(
            painter::paint_widget(
                &session.conn,
                window.gc,
                widget.window,
                session.metrics,
                props,
            ),
            "paint_widget",
        );
        log_failure(session.conn.flush(), "flush");
    }

    fn next_event(&mut self) -> Option<NativeEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        let session = self.session.as_ref()?;
        loop {
            match session.conn.poll_for_event() {
                Ok(Some(event)) => {
                    let mut decoded = decode_event(event, session, &self.widget_windows).into_iter();
                    let Some(first) = decoded.next() else {
                        continue;
                    };
                    self.pending.extend(decoded);
                    return Some(first);
                }
                Ok(None) => return None,
                Err(e) => {
                    log::error!("X11: Lost connection to the display: {e}");
                    self.pending.clear();
                    return Some(NativeEvent::quit());
                }
            }
        }
    }
}
