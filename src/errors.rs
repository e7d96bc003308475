//! Error types for the library, generated by `error_chain!`.
//!
//! Other modules `use crate::errors::*;` to pick up `Error`, `ErrorKind`, `Result` and `ResultExt`.
#![allow(deprecated)]

use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Image(::image::ImageError);
    }

    errors {
        InvalidDimensions(rows: usize, cols: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {} x {}: both must be at least 1 and the grid must fit in memory",
                    rows, cols)
        }
        InvalidInnerRoom(inner_rows: usize, inner_cols: usize, rows: usize, cols: usize) {
            description("inner room larger than the maze")
            display("inner room {} x {} does not fit inside a {} x {} maze",
                    inner_rows, inner_cols, rows, cols)
        }
        InvalidProbability(p: f32) {
            description("probability outside [0, 1]")
            display("drop probability {} is not within [0, 1]", p)
        }
        InvalidBoundaryOpening(row: usize, col: usize) {
            description("position is not a boundary wall")
            display("grid position ({}, {}) is not a wall on the outer boundary between two pillars",
                    row, col)
        }
        MalformedGrid(reason: String) {
            description("malformed maze grid")
            display("malformed maze grid: {}", reason)
        }
    }
}
