//! Tray icon bitmap
//!
//! A white square centred on a black background, generated at startup so no
//! image assets need to ship with the binary.

use image::{Rgba, RgbaImage};

/// Width and height of the tray icon in pixels
pub const ICON_SIZE: u32 = 64;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render the tray icon as an RGBA bitmap
pub fn render_icon() -> RgbaImage {
    let inner = ICON_SIZE / 4..ICON_SIZE * 3 / 4;
    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        if inner.contains(&x) && inner.contains(&y) {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}
