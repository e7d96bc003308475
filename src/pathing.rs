use fnv::FnvHashMap;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::cells::LogicalCell;
use crate::grid::MazeGrid;

/// Step counts from a start cell to every cell reachable through open passages.
#[derive(Debug, Clone)]
pub struct Distances {
    start_cell: LogicalCell,
    distances: FnvHashMap<LogicalCell, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood fill from `start`. Returns None if `start` is not a cell of the grid.
    pub fn new(grid: &MazeGrid, start: LogicalCell) -> Option<Distances> {
        if !grid.is_valid_cell(start) {
            return None;
        }

        let mut max = 0;
        let mut distances = FnvHashMap::with_capacity_and_hasher(grid.size(), Default::default());
        distances.insert(start, 0);

        // Unweighted links: the first distance written for a cell is already the shortest, so the
        // map doubles as the visited set.
        let mut frontier = vec![start];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell in &frontier {
                let distance_to_cell = distances[cell];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link in grid.links(*cell).iter() {
                    if !distances.contains_key(link) {
                        distances.insert(*link, distance_to_cell + 1);
                        new_frontier.push(*link);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_cell: start,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> LogicalCell {
        self.start_cell
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None when `cell` is unreachable or not on the grid.
    #[inline(always)]
    pub fn distance_from_start_to(&self, cell: LogicalCell) -> Option<u32> {
        self.distances.get(&cell).cloned()
    }

    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// Cells at the maximum distance, row major.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[LogicalCell; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(cell, _)| *cell)
            .sorted()
            .collect()
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, one step closer each time.
///
/// Returns the cells from start to end inclusive, or None if `end_point` is unreachable.
pub fn shortest_path(grid: &MazeGrid,
                     distances_from_start: &Distances,
                     end_point: LogicalCell)
                     -> Option<Vec<LogicalCell>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_cell = end_point;

    while current_cell != start {
        let closer = grid.links(current_cell)
            .iter()
            .cloned()
            .filter_map(|link| distances_from_start.distance_from_start_to(link).map(|d| (link, d)))
            .min_by_key(|&(_, d)| d);

        match closer {
            Some((closer_cell, closer_distance)) if closer_distance < current_distance => {
                current_cell = closer_cell;
                current_distance = closer_distance;
                path.push(current_cell);
            }
            // The grid changed since the distances were computed.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest route in the maze, found by two flood fills.
///
/// Exact for perfect mazes. With loops or disconnected regions it is only a long path within the
/// region of the top left cell.
pub fn longest_path(grid: &MazeGrid) -> Vec<LogicalCell> {
    let origin = LogicalCell::new(0, 0);
    let first_distances = match Distances::new(grid, origin) {
        Some(d) => d,
        None => return vec![],
    };

    let long_path_start = first_distances.furthest_points_on_grid()[0];
    let distances_from_start = match Distances::new(grid, long_path_start) {
        Some(d) => d,
        None => return vec![],
    };
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point).unwrap_or_else(Vec::new)
}
