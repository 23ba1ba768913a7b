use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

const GLYPH_SIZE: u32 = 8;

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Integer pixel scale of the 8x8 font for a requested point size.
pub(crate) fn scale_for(font_size: u32) -> u32 {
    ((font_size as f64) / GLYPH_SIZE as f64).round().max(1.0) as u32
}

/// Width and height in pixels of `text` rendered at `font_size`.
pub(crate) fn text_size(text: &str, font_size: u32) -> (u32, u32) {
    let cell = GLYPH_SIZE * scale_for(font_size);
    (text.chars().count() as u32 * cell, cell)
}

/// Draws `text` with its top-left corner at (`x`, `y`). Pixels outside the image are skipped.
pub(crate) fn draw_text(
    image: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    font_size: u32,
    color: Rgb<u8>,
    bold: bool,
) {
    let scale = scale_for(font_size) as i64;
    let cell = GLYPH_SIZE as i64 * scale;
    let (width, height) = (image.width() as i64, image.height() as i64);

    for (index, c) in text.chars().enumerate() {
        let origin_x = x + index as i64 * cell;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_SIZE as i64 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = y + row as i64 * scale;
                let stroke = if bold { scale + 1 } else { scale };
                for dy in 0..scale {
                    for dx in 0..stroke {
                        let (tx, ty) = (px + dx, py + dy);
                        if (0..width).contains(&tx) && (0..height).contains(&ty) {
                            image.put_pixel(tx as u32, ty as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Draws `text` centred on (`cx`, `cy`).
pub(crate) fn draw_text_centered(
    image: &mut RgbImage,
    text: &str,
    cx: f64,
    cy: f64,
    font_size: u32,
    color: Rgb<u8>,
    bold: bool,
) {
    let (w, h) = text_size(text, font_size);
    let x = (cx - w as f64 / 2.0).round() as i64;
    let y = (cy - h as f64 / 2.0).round() as i64;
    draw_text(image, text, x, y, font_size, color, bold);
}
