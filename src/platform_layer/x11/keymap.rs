/*
 * Keycode -> keysym translation for the X11 backend. The keyboard mapping is
 * fetched once when the backend initializes; lookups use the first (unshifted)
 * keysym of each keycode.
 */
use crate::platform_layer::error::Result as PlatformResult;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, KeyButMask, Keycode, Keysym};
use x11rb::rust_connection::RustConnection;

#[derive(Debug, Clone)]
pub(crate) struct Keymap {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl Keymap {
    pub(crate) fn load(conn: &RustConnection) -> PlatformResult<Self> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode.saturating_sub(min_keycode).saturating_add(1);
        let reply = conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
        log::debug!(
            "X11: Loaded keyboard mapping for {} keycodes ({} keysyms each).",
            count,
            reply.keysyms_per_keycode
        );
        Ok(Keymap::from_parts(
            min_keycode,
            reply.keysyms_per_keycode,
            reply.keysyms,
        ))
    }

    pub(crate) fn from_parts(
        min_keycode: Keycode,
        keysyms_per_keycode: u8,
        keysyms: Vec<Keysym>,
    ) -> Self {
        Keymap {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    // 0 (NoSymbol) for keycodes outside the mapping.
    pub(crate) fn keysym(&self, keycode: Keycode) -> Keysym {
        if keycode < self.min_keycode || self.keysyms_per_keycode == 0 {
            return 0;
        }
        let index = usize::from(keycode - self.min_keycode) * usize::from(self.keysyms_per_keycode);
        self.keysyms.get(index).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Modifiers {
    pub(crate) ctrl: bool,
    pub(crate) shift: bool,
    pub(crate) alt: bool,
}

// Alt is reported through Mod1, as on nearly every X keyboard setup.
pub(crate) fn modifiers(state: KeyButMask) -> Modifiers {
    let bits = u16::from(state);
    Modifiers {
        ctrl: bits & u16::from(KeyButMask::CONTROL) != 0,
        shift: bits & u16::from(KeyButMask::SHIFT) != 0,
        alt: bits & u16::from(KeyButMask::MOD1) != 0,
    }
}
