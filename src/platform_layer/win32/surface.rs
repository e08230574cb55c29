/*
 * Off-screen surface of a top-level window: a memory DC with a bitmap the
 * size of the client area selected into it. WM_PAINT and `present` copy it
 * onto the window.
 */
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};

use windows::Win32::{
    Foundation::{HWND, RECT},
    Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, FillRect,
        GetDC, GetStockObject, HBITMAP, HBRUSH, HDC, HGDIOBJ, ReleaseDC, SRCCOPY, SelectObject,
        WHITE_BRUSH,
    },
};

#[derive(Debug)]
pub(crate) struct BackBuffer {
    dc: HDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
    width: i32,
    height: i32,
}

impl BackBuffer {
    pub(crate) fn create(hwnd: HWND, width: i32, height: i32) -> PlatformResult<Self> {
        let width = width.max(1);
        let height = height.max(1);
        unsafe {
            let window_dc = GetDC(Some(hwnd));
            if window_dc.is_invalid() {
                return Err(PlatformError::OperationFailed(format!(
                    "GetDC failed for {hwnd:?}"
                )));
            }
            let dc = CreateCompatibleDC(Some(window_dc));
            let bitmap = CreateCompatibleBitmap(window_dc, width, height);
            ReleaseDC(Some(hwnd), window_dc);

            if dc.is_invalid() || bitmap.is_invalid() {
                if !bitmap.is_invalid() {
                    _ = DeleteObject(HGDIOBJ(bitmap.0));
                }
                if !dc.is_invalid() {
                    _ = DeleteDC(dc);
                }
                return Err(PlatformError::OperationFailed(format!(
                    "Could not create a {width}x{height} back buffer for {hwnd:?}"
                )));
            }
            let previous = SelectObject(dc, HGDIOBJ(bitmap.0));
            Ok(BackBuffer {
                dc,
                bitmap,
                previous,
                width,
                height,
            })
        }
    }

    pub(crate) fn dc(&self) -> HDC {
        self.dc
    }

    pub(crate) fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub(crate) fn clear(&self) {
        let whole = RECT {
            left: 0,
            top: 0,
            right: self.width,
            bottom: self.height,
        };
        unsafe {
            FillRect(self.dc, &whole, HBRUSH(GetStockObject(WHITE_BRUSH).0));
        }
    }

    pub(crate) fn present(&self, hwnd: HWND) {
        unsafe {
            let window_dc = GetDC(Some(hwnd));
            if window_dc.is_invalid() {
                log::warn!("Win32: GetDC failed while presenting {hwnd:?}.");
                return;
            }
            if let Err(e) = BitBlt(
                window_dc,
                0,
                0,
                self.width,
                self.height,
                Some(self.dc),
                0,
                0,
                SRCCOPY,
            ) {
                log::warn!("Win32: BitBlt while presenting {hwnd:?} failed: {e}");
            }
            ReleaseDC(Some(hwnd), window_dc);
        }
    }
}

impl Drop for BackBuffer {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
            _ = DeleteObject(HGDIOBJ(self.bitmap.0));
            _ = DeleteDC(self.dc);
        }
    }
}
