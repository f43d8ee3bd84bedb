//! Text map to greyscale image.
//!
//! Each map character becomes a fixed 5x5 block of grey levels; the blocks
//! are tiled into one framebuffer and written out as an uncompressed 8-bit
//! greyscale TGA.

use std::io::Write;

use tracing::debug;

use crate::{error::RenderError, stage::Stage};

pub const TILE_SIZE: usize = 5;

type Glyph = [&'static str; TILE_SIZE];

const WALL: Glyph = ["#####", "#####", "#####", "#####", "#####"];
const UNKNOWN: Glyph = ["=====", "=====", "=====", "=====", "====="];
const FLOOR: Glyph = ["     ", "     ", "     ", "  -  ", "     "];
const DOOR: Glyph = ["     ", "  #  ", " ### ", "  #  ", "     "];
const OTHER: Glyph = [" ##  ", "   # ", "  #  ", "     ", "  #  "];

const fn glyph_for(tile: char) -> &'static Glyph {
    match tile {
        '#' => &WALL,
        ' ' => &UNKNOWN,
        '.' => &FLOOR,
        '+' => &DOOR,
        _ => &OTHER,
    }
}

const fn grey(pixel: u8) -> u8 {
    match pixel {
        b' ' => 255,
        b'#' => 0,
        b'=' => 95,
        _ => 128,
    }
}

/// Single-channel pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    fn blit(&mut self, glyph: &Glyph, left: usize, top: usize) {
        for (dy, row) in glyph.iter().enumerate() {
            let start = (top + dy) * self.width + left;
            for (dst, &px) in self.data[start..start + TILE_SIZE]
                .iter_mut()
                .zip(row.as_bytes())
            {
                *dst = grey(px);
            }
        }
    }
}

/// Lays out `height` rows of `width` map characters. Short rows are padded
/// with unknown tiles; anything past `width` is ignored.
pub fn render(text: &str, width: usize, height: usize) -> Result<Framebuffer, RenderError> {
    let rows: Vec<&str> = text.lines().take(height).collect();
    if rows.len() < height {
        return Err(RenderError::ShortInput {
            expected: height,
            found: rows.len(),
        });
    }

    let mut fb = Framebuffer::new(width * TILE_SIZE, height * TILE_SIZE);
    for (y, row) in rows.iter().enumerate() {
        let tiles = row.chars().chain(std::iter::repeat(' ')).take(width);
        for (x, tile) in tiles.enumerate() {
            fb.blit(glyph_for(tile), x * TILE_SIZE, y * TILE_SIZE);
        }
    }
    debug!(width = fb.width, height = fb.height, "rendered map");
    Ok(fb)
}

/// Whether every cell of the map uses the tile alphabet. Anything else still
/// renders, as a question mark.
pub fn is_tile_map(text: &str, width: u16, height: u16) -> bool {
    Stage::parse(text, i32::from(width), i32::from(height)).is_some()
}

/// Uncompressed greyscale TGA with a top-left origin.
pub fn write_tga<W: Write>(fb: &Framebuffer, out: &mut W) -> Result<(), RenderError> {
    let too_large = || RenderError::TooLarge {
        width: fb.width,
        height: fb.height,
    };
    let width = u16::try_from(fb.width).map_err(|_| too_large())?;
    let height = u16::try_from(fb.height).map_err(|_| too_large())?;
    let [w_lo, w_hi] = width.to_le_bytes();
    let [h_lo, h_hi] = height.to_le_bytes();

    #[rustfmt::skip]
    let header: [u8; 18] = [
        0, 0, 3,          // no id, no colour map, uncompressed greyscale
        0, 0, 0, 0, 0,    // colour map spec
        0, 0, 0, 0,       // origin
        w_lo, w_hi, h_lo, h_hi,
        8,                // bits per pixel
        0x20,             // top-left origin
    ];
    out.write_all(&header)?;
    out.write_all(fb.pixels())?;
    out.flush()?;
    Ok(())
}
