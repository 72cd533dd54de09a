//! Software framebuffer drawing
//!
//! Filled rectangles, filled circles, line segments and fixed-width 3x5
//! bitmap text, all at absolute pixel coordinates into a packed 32-bit
//! buffer. Everything clips against the frame edges.

use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

pub const COLOR_BACKGROUND: u32 = 0x0010_1018;
pub const COLOR_WHITE: u32 = 0x00ff_ffff;
pub const COLOR_PADDLE: u32 = 0x00e0_e0e0;
pub const COLOR_BALL: u32 = 0x00ff_d24a;
pub const COLOR_TRAJECTORY: u32 = 0x0030_5030;
pub const COLOR_BORDER: u32 = 0x0040_4858;
pub const COLOR_BUTTON: u32 = 0x0020_2838;
pub const COLOR_BUTTON_SELECTED: u32 = 0x0040_60a0;

/// A packed 32-bit framebuffer
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![COLOR_BACKGROUND; width * height],
        }
    }

    /// A frame matching the board dimensions
    pub fn board() -> Self {
        Self::new(BOARD_WIDTH as usize, BOARD_HEIGHT as usize)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(COLOR_BACKGROUND);
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(self.pixels[y as usize * self.width + x as usize])
        } else {
            None
        }
    }
}

/// Filled axis-aligned rectangle
pub fn fill_rect(frame: &mut Frame, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for row in 0..h {
        for col in 0..w {
            frame.set(x + col, y + row, color);
        }
    }
}

/// Filled circle
pub fn fill_circle(frame: &mut Frame, cx: i32, cy: i32, r: i32, color: u32) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                frame.set(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Line segment (Bresenham)
pub fn draw_line(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = (y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = (if dx > dy { dx } else { -dy }) / 2;
    let (mut x, mut y) = (x0, y0);

    loop {
        frame.set(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = err;
        if e2 > -dx {
            err -= dy;
            x += sx;
        }
        if e2 < dy {
            err += dx;
            y += sy;
        }
    }
}

// 3x5 glyphs for the printable ASCII range, one u16 per character, rows
// packed low-bit-first starting at the top-left.
#[rustfmt::skip]
const FONT_3X5: [u16; 96] = [
    0x0000, 0x2092, 0x002d, 0x5f7d, 0x279e, 0x52a5, 0x7ad6, 0x0012,
    0x4494, 0x1491, 0x017a, 0x05d0, 0x1400, 0x01c0, 0x0400, 0x12a4,
    0x2b6a, 0x749a, 0x752a, 0x38a3, 0x4f4a, 0x38cf, 0x3bce, 0x12a7,
    0x3aae, 0x49ae, 0x0410, 0x1410, 0x4454, 0x0e38, 0x1511, 0x10e3,
    0x73ee, 0x5f7a, 0x3beb, 0x624e, 0x3b6b, 0x73cf, 0x13cf, 0x6b4e,
    0x5bed, 0x7497, 0x2b27, 0x5add, 0x7249, 0x5b7d, 0x5b6b, 0x3b6e,
    0x12eb, 0x4f6b, 0x5aeb, 0x388e, 0x2497, 0x6b6d, 0x256d, 0x5f6d,
    0x5aad, 0x24ad, 0x72a7, 0x6496, 0x4889, 0x3493, 0x002a, 0xf000,
    0x0011, 0x6b98, 0x3b79, 0x7270, 0x7b74, 0x6750, 0x95d6, 0xb9ee,
    0x5b59, 0x6410, 0xb482, 0x56e8, 0x6492, 0x5be8, 0x5b58, 0x3b70,
    0x976a, 0xcd6a, 0x1370, 0x38f0, 0x64ba, 0x3b68, 0x2568, 0x5f68,
    0x54a8, 0xb9ad, 0x73b8, 0x64d6, 0x2492, 0x3593, 0x03e0, 0x0000,
];

/// Fixed-width bitmap text; each glyph cell is 4 * scale pixels wide
pub fn draw_text(frame: &mut Frame, x: i32, y: i32, text: &str, scale: i32, color: u32) {
    let mut pen_x = x;
    for ch in text.chars() {
        let code = ch as u32;
        if code > 32 && code < 128 {
            let bitmap = FONT_3X5[(code - 32) as usize];
            for dy in 0..5 {
                for dx in 0..3 {
                    if bitmap >> (dy * 3 + dx) & 1 == 1 {
                        fill_rect(frame, pen_x + dx * scale, y + dy * scale, scale, scale, color);
                    }
                }
            }
        }
        pen_x += 4 * scale;
    }
}

/// Pixel width of a string at a given scale
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 4 * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut frame = Frame::new(16, 16);
        frame.set(3, 4, COLOR_WHITE);
        assert_eq!(frame.get(3, 4), Some(COLOR_WHITE));
        assert_eq!(frame.get(4, 3), Some(COLOR_BACKGROUND));
    }

    #[test]
    fn out_of_bounds_writes_are_clipped() {
        let mut frame = Frame::new(8, 8);
        frame.set(-1, 0, COLOR_WHITE);
        frame.set(0, -1, COLOR_WHITE);
        frame.set(8, 0, COLOR_WHITE);
        frame.set(0, 8, COLOR_WHITE);
        assert!(frame.pixels.iter().all(|&p| p == COLOR_BACKGROUND));
        assert_eq!(frame.get(9, 9), None);
    }

    #[test]
    fn fill_rect_covers_exact_region() {
        let mut frame = Frame::new(16, 16);
        fill_rect(&mut frame, 2, 3, 4, 2, COLOR_WHITE);
        assert_eq!(frame.get(2, 3), Some(COLOR_WHITE));
        assert_eq!(frame.get(5, 4), Some(COLOR_WHITE));
        assert_eq!(frame.get(6, 4), Some(COLOR_BACKGROUND));
        assert_eq!(frame.get(2, 5), Some(COLOR_BACKGROUND));
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut frame = Frame::new(32, 32);
        draw_line(&mut frame, 1, 1, 20, 11, COLOR_WHITE);
        assert_eq!(frame.get(1, 1), Some(COLOR_WHITE));
        assert_eq!(frame.get(20, 11), Some(COLOR_WHITE));
    }

    #[test]
    fn circle_is_centered_and_bounded() {
        let mut frame = Frame::new(32, 32);
        fill_circle(&mut frame, 16, 16, 4, COLOR_BALL);
        assert_eq!(frame.get(16, 16), Some(COLOR_BALL));
        assert_eq!(frame.get(16, 20), Some(COLOR_BALL));
        assert_eq!(frame.get(16, 21), Some(COLOR_BACKGROUND));
    }

    #[test]
    fn text_marks_pixels_and_reports_width() {
        let mut frame = Frame::new(64, 16);
        draw_text(&mut frame, 0, 0, "3", 2, COLOR_WHITE);
        assert!(frame.pixels.iter().any(|&p| p == COLOR_WHITE));
        assert_eq!(text_width("321", 2), 24);
    }
}
