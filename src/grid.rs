use serde::{Deserialize, Serialize};

use crate::ground::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Assigned(Rgb),
}

/// A fixed `height x width` grid of cell states, indexed `cells[row][col]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let cells = vec![vec![CellState::Empty; width]; height];
        Grid { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        if row < self.height && col < self.width {
            Some(self.cells[row][col])
        } else {
            None
        }
    }

    pub fn assign(&mut self, row: usize, col: usize, color: Rgb) {
        self.cells[row][col] = CellState::Assigned(color);
    }

    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(CellState::Empty))
    }

    /// Coordinates of every cell still `Empty`, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell == CellState::Empty {
                    empty.push((row, col));
                }
            }
        }
        empty
    }

    /// Converts a filled grid into plain colours.
    ///
    /// # Panics
    ///
    /// Panics if a cell is still `Empty`. Region fill from a non-empty seed
    /// set assigns every cell, and validated requests always place seeds.
    pub fn into_colors(self) -> Vec<Vec<Rgb>> {
        self.cells
            .into_iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(col, cell)| match cell {
                        CellState::Assigned(color) => color,
                        CellState::Empty => unreachable!("cell ({row}, {col}) was never filled"),
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 4);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.area(), 40);
        assert_eq!(grid.empty_cells().len(), 40);
    }

    #[test]
    fn test_get_cell() {
        let mut grid = Grid::new(5, 5);
        grid.assign(4, 2, [1, 2, 3]);
        assert_eq!(grid.get(0, 0), Some(CellState::Empty));
        assert_eq!(grid.get(4, 2), Some(CellState::Assigned([1, 2, 3])));
        assert_eq!(grid.get(5, 0), None);
        assert!(!grid.is_empty_cell(4, 2));
        assert!(!grid.empty_cells().contains(&(4, 2)));
    }

    #[test]
    fn test_into_colors() {
        let mut grid = Grid::new(2, 2);
        grid.assign(0, 0, [9, 9, 9]);
        grid.assign(0, 1, [7, 7, 7]);
        grid.assign(1, 0, [5, 5, 5]);
        grid.assign(1, 1, [3, 3, 3]);
        assert_eq!(
            grid.into_colors(),
            vec![vec![[9, 9, 9], [7, 7, 7]], vec![[5, 5, 5], [3, 3, 3]]]
        );
    }

    #[test]
    #[should_panic(expected = "cell (0, 1) was never filled")]
    fn test_into_colors_on_unfilled_grid() {
        let mut grid = Grid::new(2, 1);
        grid.assign(0, 0, [9, 9, 9]);
        grid.into_colors();
    }
}
