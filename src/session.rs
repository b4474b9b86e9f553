use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::config::{Config, ConfigError};
use crate::grid::{Dir, Grid, Pos};
use crate::path::shortest_path;

/// One round of play: the grid, both actors, the move counter and the
/// current pursuit cadence. `Active -> Over` on collision, back to `Active`
/// only through `reset`, which rebuilds everything from a fresh grid.
pub struct Session {
    config: Config,
    grid: Grid,
    player: Pos,
    zombies: Vec<Pos>,
    moves: u32,
    zombie_step_ms: u64,
    over: bool,
}

impl Session {
    pub fn new(config: &Config, rng: &mut impl Rng) -> Result<Session, ConfigError> {
        config.validate()?;
        let (grid, player, zombies) = spawn(config, rng);
        info!(
            "session start: {0}x{0} grid, density {1}, {2} zombie(s)",
            config.grid_size, config.obstacle_density, config.zombie_count
        );
        Ok(Session {
            config: config.clone(),
            grid,
            player,
            zombies,
            moves: 0,
            zombie_step_ms: config.zombie_step_ms,
            over: false,
        })
    }

    pub fn reset(&mut self, rng: &mut impl Rng) {
        let (grid, player, zombies) = spawn(&self.config, rng);
        self.grid = grid;
        self.player = player;
        self.zombies = zombies;
        self.moves = 0;
        self.zombie_step_ms = self.config.zombie_step_ms;
        self.over = false;
        info!("session reset");
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn zombies(&self) -> &[Pos] {
        &self.zombies
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Current pursuit cadence; shrinks as the player racks up moves.
    pub fn zombie_step(&self) -> Duration {
        Duration::from_millis(self.zombie_step_ms)
    }

    /// Attempts a single-cell player move. Out-of-bounds and blocked
    /// targets are rejected without counting a move. Returns whether the
    /// move was committed.
    pub fn move_player(&mut self, dir: Dir) -> bool {
        if self.over {
            return false;
        }
        let Some(next) = self.grid.step(self.player, dir) else {
            return false;
        };
        if !self.grid.is_open(next) {
            return false;
        }
        self.player = next;
        self.moves += 1;
        if self.moves % self.config.zombie_speedup_every == 0 {
            let faster = self
                .zombie_step_ms
                .saturating_sub(self.config.zombie_speedup_ms)
                .max(self.config.zombie_step_min_ms);
            if faster != self.zombie_step_ms {
                debug!("zombie interval {} -> {} ms", self.zombie_step_ms, faster);
            }
            self.zombie_step_ms = faster;
        }
        self.check_collision();
        true
    }

    /// Advances every zombie one cell along a freshly computed shortest
    /// path to the player. A zombie with no path holds position.
    pub fn step_zombies(&mut self) {
        if self.over {
            return;
        }
        for i in 0..self.zombies.len() {
            let path = shortest_path(&self.grid, self.zombies[i], self.player);
            if let Some(&next) = path.first() {
                self.zombies[i] = next;
            }
        }
        self.check_collision();
    }

    fn check_collision(&mut self) {
        if self.zombies.iter().any(|z| *z == self.player) {
            self.over = true;
            info!("caught after {} moves", self.moves);
        }
    }
}

fn spawn(config: &Config, rng: &mut impl Rng) -> (Grid, Pos, Vec<Pos>) {
    let grid = Grid::generate(rng, config.grid_size, config.obstacle_density);
    let player = grid.random_open_cell(rng);
    let zombies = (0..config.zombie_count)
        .map(|_| place_zombie(&grid, rng, player))
        .collect();
    (grid, player, zombies)
}

// Zombies never spawn on the player's cell; the open border ring guarantees
// an alternative exists.
fn place_zombie(grid: &Grid, rng: &mut impl Rng, player: Pos) -> Pos {
    let size = grid.size();
    for _ in 0..size * size {
        let pos = grid.random_open_cell(rng);
        if pos != player {
            return pos;
        }
    }
    grid.open_cells()
        .into_iter()
        .find(|pos| *pos != player)
        .expect("border ring is always open")
}
