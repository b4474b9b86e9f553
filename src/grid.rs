use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Open,
    Blocked,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// Square occupancy grid. Immutable once generated; the border ring is
/// always open by construction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn generate(rng: &mut impl Rng, size: usize, density: f64) -> Grid {
        let mut cells = vec![vec![Cell::Open; size]; size];
        for y in 1..size - 1 {
            for x in 1..size - 1 {
                if rng.gen::<f64>() < density {
                    cells[y][x] = Cell::Blocked;
                }
            }
        }
        Grid { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.cells[pos.y][pos.x] == Cell::Open
    }

    /// Cell one step in `dir`, or `None` when the step leaves the grid.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 0 || ny < 0 || nx >= self.size as isize || ny >= self.size as isize {
            return None;
        }
        Some(Pos {
            x: nx as usize,
            y: ny as usize,
        })
    }

    pub fn open_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.size {
            for x in 0..self.size {
                let pos = Pos { x, y };
                if self.is_open(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// Uniformly random open cell. Rejection sampling is capped at size²
    /// attempts; after that the open cells are enumerated instead, so a
    /// dense grid cannot stall placement.
    pub fn random_open_cell(&self, rng: &mut impl Rng) -> Pos {
        for _ in 0..self.size * self.size {
            let pos = Pos {
                x: rng.gen_range(0..self.size),
                y: rng.gen_range(0..self.size),
            };
            if self.is_open(pos) {
                return pos;
            }
        }
        let open = self.open_cells();
        open[rng.gen_range(0..open.len())]
    }
}

#[cfg(test)]
impl Grid {
    /// Grid from rows of '.' (open) and '#' (blocked).
    pub(crate) fn parse(rows: &[&str]) -> Grid {
        let cells: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| if c == '#' { Cell::Blocked } else { Cell::Open })
                    .collect()
            })
            .collect();
        Grid {
            size: cells.len(),
            cells,
        }
    }
}
