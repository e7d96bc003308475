//! **maze_carver** builds wall/passage maze grids with a randomized growing tree carver.
//!
//! A maze of `rows` x `columns` logical cells is returned as a dense `(2 * rows + 1) x
//! (2 * columns + 1)` grid of `0` (open) and `1` (wall) tiles, ready for a caller to place walls
//! and colliders against. Generation can pre-open a centred inner room and can braid the result
//! by dropping extra walls to create loops.

pub mod analysis;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod pathing;
pub mod renderers;
pub mod settings;
pub mod units;
