//! Structural statistics of a generated maze, computed on its `petgraph` view.

use std::fmt;

use petgraph::algo::{connected_components, is_cyclic_undirected};

use crate::grid::MazeGrid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeStats {
    pub cells: usize,
    pub passages: usize,
    pub connected_components: usize,
    pub has_cycles: bool,
    /// Cells with exactly one passage.
    pub dead_ends: usize,
    /// Cells with three or four passages.
    pub junctions: usize,
    corridor_segments: usize,
}

impl MazeStats {
    pub fn of(grid: &MazeGrid) -> MazeStats {
        let graph = grid.to_graph();
        let degrees = graph.node_indices()
            .map(|node| graph.neighbors(node).count())
            .collect::<Vec<_>>();

        // Every corridor runs between two cells that are not plain corridor cells, so half the
        // degree sum of those cells counts the corridors.
        let corridor_ends: usize = degrees.iter().filter(|&&d| d != 2).sum();

        MazeStats {
            cells: graph.node_count(),
            passages: graph.edge_count(),
            connected_components: connected_components(&graph),
            has_cycles: is_cyclic_undirected(&graph),
            dead_ends: degrees.iter().filter(|&&d| d == 1).count(),
            junctions: degrees.iter().filter(|&&d| d >= 3).count(),
            corridor_segments: corridor_ends / 2,
        }
    }

    /// Average number of passages per corridor.
    pub fn mean_corridor_length(&self) -> f64 {
        if self.corridor_segments == 0 {
            self.passages as f64
        } else {
            self.passages as f64 / self.corridor_segments as f64
        }
    }

    /// Connected with no loops: exactly one route between any two cells.
    pub fn is_perfect(&self) -> bool {
        self.connected_components == 1 && self.passages + 1 == self.cells
    }
}

impl fmt::Display for MazeStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "cells: {}", self.cells)?;
        writeln!(f, "passages: {}", self.passages)?;
        writeln!(f, "connected components: {}", self.connected_components)?;
        writeln!(f, "loops: {}", if self.has_cycles { "yes" } else { "no" })?;
        writeln!(f, "dead ends: {}", self.dead_ends)?;
        writeln!(f, "junctions: {}", self.junctions)?;
        write!(f, "mean corridor length: {:.2}", self.mean_corridor_length())
    }
}
