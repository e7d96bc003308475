use std::path::Path;

use fnv::FnvHashSet;
use image::{Rgb, RgbImage};

use crate::cells::LogicalCell;
use crate::errors::*;
use crate::grid::{MazeGrid, OPEN, OPEN_GLYPH, WALL_GLYPH};
use crate::units::{Height, Width};

pub const PATH_GLYPH: char = 'o';

/// Grid positions covered by a path: its cells and the open walls between consecutive cells.
fn path_positions(path: &[LogicalCell]) -> FnvHashSet<(usize, usize)> {
    let mut positions: FnvHashSet<(usize, usize)> = path.iter().map(|cell| cell.grid_position()).collect();
    for pair in path.windows(2) {
        let ((r1, c1), (r2, c2)) = (pair[0].grid_position(), pair[1].grid_position());
        positions.insert(((r1 + r2) / 2, (c1 + c2) / 2));
    }
    positions
}

/// The debug text form, with the cells and passages of `path` drawn as `o`.
pub fn render_text(grid: &MazeGrid, path: Option<&[LogicalCell]>) -> String {
    let on_path = path.map(path_positions).unwrap_or_default();

    let mut text = String::with_capacity((grid.width().0 + 1) * grid.height().0);
    for (row, tiles) in grid.iter_rows().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            let glyph = if on_path.contains(&(row, col)) {
                PATH_GLYPH
            } else if *tile == OPEN {
                OPEN_GLYPH
            } else {
                WALL_GLYPH
            };
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    cell_side_pixels: u8,
    wall_colour: Rgb<u8>,
    floor_colour: Rgb<u8>,
    path_colour: Rgb<u8>,
    path: Option<&'a [LogicalCell]>,
    output_file: Option<&'a Path>,
}

impl<'a> Default for RenderOptions<'a> {
    fn default() -> Self {
        RenderOptions {
            cell_side_pixels: 10,
            wall_colour: Rgb([0x20, 0x20, 0x20]),
            floor_colour: Rgb([0xff, 0xff, 0xff]),
            path_colour: Rgb([0xe0, 0x30, 0x30]),
            path: None,
            output_file: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder<'a> {
    options: RenderOptions<'a>,
}

impl<'a> RenderOptionsBuilder<'a> {
    pub fn new() -> RenderOptionsBuilder<'a> {
        RenderOptionsBuilder::default()
    }
    /// Side length of one grid position in pixels. Zero is raised to one.
    pub fn cell_side_pixels(mut self, pixels: u8) -> Self {
        self.options.cell_side_pixels = pixels.max(1);
        self
    }
    pub fn wall_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.wall_colour = colour;
        self
    }
    pub fn floor_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.floor_colour = colour;
        self
    }
    pub fn path_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.path_colour = colour;
        self
    }
    pub fn path(mut self, path: Option<&'a [LogicalCell]>) -> Self {
        self.options.path = path;
        self
    }
    pub fn output_file(mut self, output_file: Option<&'a Path>) -> Self {
        self.options.output_file = output_file;
        self
    }
    pub fn build(self) -> RenderOptions<'a> {
        self.options
    }
}

/// Paint every grid position as a square, saving the image as PNG when an output file is set.
pub fn render_png(grid: &MazeGrid, options: &RenderOptions) -> Result<RgbImage> {
    let side = options.cell_side_pixels as u32;
    let (Height(height), Width(width)) = (grid.height(), grid.width());
    let on_path = options.path.map(path_positions).unwrap_or_default();

    let mut image = RgbImage::new(width as u32 * side, height as u32 * side);
    for (row, tiles) in grid.iter_rows().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            let colour = if on_path.contains(&(row, col)) {
                options.path_colour
            } else if *tile == OPEN {
                options.floor_colour
            } else {
                options.wall_colour
            };
            let (x0, y0) = (col as u32 * side, row as u32 * side);
            for y in y0..y0 + side {
                for x in x0..x0 + side {
                    image.put_pixel(x, y, colour);
                }
            }
        }
    }

    if let Some(file) = options.output_file {
        image.save(file)?;
    }
    Ok(image)
}
