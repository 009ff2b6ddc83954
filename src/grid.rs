use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Cell { x: self.x, y: self.y - 1 },
            Direction::Down => Cell { x: self.x, y: self.y + 1 },
            Direction::Left => Cell { x: self.x - 1, y: self.y },
            Direction::Right => Cell { x: self.x + 1, y: self.y },
        }
    }
}

/// Playfield bounds in cells, derived from the surface size and cell size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub columns: i32,
    pub rows: i32,
}

impl Grid {
    pub fn from_surface(width: u32, height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            columns: (width / cell_size) as i32,
            rows: (height / cell_size) as i32,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.columns && cell.y < self.rows
    }

    pub fn area(&self) -> usize {
        (self.columns.max(0) as usize) * (self.rows.max(0) as usize)
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.columns / 2, self.rows / 2)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.columns).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_bounds_follow_surface() {
        let grid = Grid::from_surface(600, 400, 10);
        assert_eq!(grid, Grid { columns: 60, rows: 40 });
        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(59, 39)));
        assert!(!grid.contains(Cell::new(60, 0)));
        assert!(!grid.contains(Cell::new(0, 40)));
        assert!(!grid.contains(Cell::new(-1, 5)));
    }

    #[test]
    fn cells_enumerates_every_position_once() {
        let grid = Grid::from_surface(60, 40, 20);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), grid.area());
        assert_eq!(cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(cells.last(), Some(&Cell::new(2, 1)));
    }

    #[test]
    fn step_moves_one_cell() {
        let c = Cell::new(5, 5);
        assert_eq!(c.step(Direction::Up), Cell::new(5, 4));
        assert_eq!(c.step(Direction::Down), Cell::new(5, 6));
        assert_eq!(c.step(Direction::Left), Cell::new(4, 5));
        assert_eq!(c.step(Direction::Right), Cell::new(6, 5));
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }
}
