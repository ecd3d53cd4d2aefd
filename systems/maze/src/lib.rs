#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first maze generator for the facility interior.
//!
//! The generator carves a spanning tree over a square grid of rooms, opens a
//! doorway on the west side of the start cell for the main entrance, and then
//! knocks through extra interior walls so the facility contains loops. Every
//! opening is written to both cells it joins, so the resulting codes always
//! agree with their neighbours.

use moon_salvage_core::{CellCoord, ConnectionCode, Direction};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, warn};

/// Extra corridor openings injected per grid cell after the spanning tree is
/// carved.
pub const LOOP_INJECTION_RATIO: f32 = 0.75;

/// Side of the start cell that opens onto the main entrance.
pub const ENTRANCE_DIRECTION: Direction = Direction::West;

/// Square grid of room connection codes produced by [`generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    size: u32,
    start: CellCoord,
    codes: Vec<ConnectionCode>,
}

impl MazeLayout {
    /// Number of cells along each side of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell holding the main entrance.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Connection code of `cell`, if it lies within the grid.
    #[must_use]
    pub fn code(&self, cell: CellCoord) -> Option<ConnectionCode> {
        index(self.size, cell).and_then(|offset| self.codes.get(offset).copied())
    }

    /// Iterates over every cell in column-major order with its code.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, ConnectionCode)> + '_ {
        let size = self.size;
        self.codes.iter().enumerate().map(move |(offset, code)| {
            let offset = offset as u32;
            (CellCoord::new(offset / size, offset % size), *code)
        })
    }

    fn open_between(&mut self, cell: CellCoord, direction: Direction) {
        let Some(neighbor) = cell.step(direction, self.size) else {
            return;
        };
        self.open_side(cell, direction);
        self.open_side(neighbor, direction.opposite());
    }

    fn open_side(&mut self, cell: CellCoord, direction: Direction) {
        if let Some(offset) = index(self.size, cell) {
            self.codes[offset] = self.codes[offset].with_open(direction);
        }
    }
}

fn index(size: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() >= size || cell.row() >= size {
        return None;
    }
    usize::try_from(cell.column() * size + cell.row()).ok()
}

/// Cell the depth-first walk starts from: the middle of the western edge.
#[must_use]
pub const fn start_cell(size: u32) -> CellCoord {
    CellCoord::new(0, size / 2)
}

/// Generates a `size x size` maze using the supplied random source.
///
/// Reproducibility follows from the random source: the same seeded generator
/// always yields the same layout.
pub fn generate<R: Rng + ?Sized>(size: u32, rng: &mut R) -> MazeLayout {
    let cell_count = (size as usize) * (size as usize);
    let start = start_cell(size);
    let mut layout = MazeLayout {
        size,
        start,
        codes: vec![ConnectionCode::CLOSED; cell_count],
    };

    if cell_count == 0 {
        return layout;
    }

    carve_spanning_tree(&mut layout, rng);
    layout.open_side(start, ENTRANCE_DIRECTION);
    inject_loops(&mut layout, rng);

    debug!(size, ?start, "maze generated");
    layout
}

fn carve_spanning_tree<R: Rng + ?Sized>(layout: &mut MazeLayout, rng: &mut R) {
    let size = layout.size;
    let mut visited = vec![false; layout.codes.len()];
    let mut backtrack = Vec::new();
    let mut current = layout.start;
    let mut visited_count = 1;
    if let Some(offset) = index(size, current) {
        visited[offset] = true;
    }

    while visited_count < visited.len() {
        let mut candidates: Vec<(Direction, CellCoord)> = Direction::ALL
            .into_iter()
            .filter_map(|direction| Some((direction, current.step(direction, size)?)))
            .filter(|(_, neighbor)| index(size, *neighbor).is_some_and(|offset| !visited[offset]))
            .collect();
        candidates.shuffle(rng);

        if let Some(&(direction, next)) = candidates.first() {
            backtrack.push(current);
            layout.open_between(current, direction);
            if let Some(offset) = index(size, next) {
                visited[offset] = true;
            }
            visited_count += 1;
            current = next;
        } else if let Some(previous) = backtrack.pop() {
            current = previous;
        } else {
            break;
        }
    }
}

fn inject_loops<R: Rng + ?Sized>(layout: &mut MazeLayout, rng: &mut R) {
    let size = layout.size;
    if size < 3 {
        warn!(size, "maze too small for loop injection");
        return;
    }

    let injections = (LOOP_INJECTION_RATIO * (size * size) as f32) as usize;
    for _ in 0..injections {
        let cell = CellCoord::new(rng.gen_range(1..size - 1), rng.gen_range(1..size - 1));
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        layout.open_between(cell, direction);
    }
}
