mod config;
mod grid;
mod input;
mod path;
mod session;

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use unicode_width::UnicodeWidthStr;

use config::Config;
use grid::{Dir, Pos};
use input::HeldDirections;
use session::Session;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Zombie,
    Wall,
    Empty,
}

#[derive(Clone, Copy, PartialEq)]
struct ScreenCell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<ScreenCell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(size: usize) -> Renderer {
        Renderer {
            last: vec![
                ScreenCell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env();
    let mut rng = make_rng(config.seed);
    let mut session = Session::new(&config, &mut rng)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config, &mut session, &mut rng);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run(
    stdout: &mut Stdout,
    config: &Config,
    session: &mut Session,
    rng: &mut StdRng,
) -> Result<()> {
    let mut held = HeldDirections::new();
    let mut renderer = Renderer::new(config.grid_size);
    let mut high_score: u32 = 0;
    let mut last_player_step = Instant::now();
    let mut last_zombie_step = Instant::now();
    let frame_time = Duration::from_micros(1_000_000 / config.render_fps.max(1));

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') => {
                        if session.is_over() {
                            session.reset(rng);
                            renderer.needs_full = true;
                            last_player_step = Instant::now();
                            last_zombie_step = Instant::now();
                        }
                    }
                    code => {
                        if let Some(dir) = dir_for_key(code) {
                            held.press(dir);
                        }
                    }
                }
            }
        }

        if !session.is_over() {
            // Player before zombies, so the pursuit always chases the
            // freshest position when both gates fire in one frame.
            if last_player_step.elapsed() >= config.player_step() {
                last_player_step = Instant::now();
                if let Some(dir) = held.active() {
                    session.move_player(dir);
                }
            }
            if last_zombie_step.elapsed() >= session.zombie_step() {
                last_zombie_step = Instant::now();
                session.step_zombies();
            }
            if session.is_over() && session.moves() > high_score {
                high_score = session.moves();
                info!("new high score: {high_score}");
            }
        }

        render(stdout, session, high_score, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Dir::Up),
        KeyCode::Char('s') | KeyCode::Down => Some(Dir::Down),
        KeyCode::Char('a') | KeyCode::Left => Some(Dir::Left),
        KeyCode::Char('d') | KeyCode::Right => Some(Dir::Right),
        _ => None,
    }
}

fn render(
    stdout: &mut Stdout,
    session: &Session,
    high_score: u32,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let size = session.grid().size();
    let needed_h = (size + 2) as u16;
    let needed_w = (size * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = if session.is_over() {
        format!(
            "GAME OVER - Score: {}  High Score: {}  (r to play again, q to quit)",
            session.moves(),
            high_score
        )
    } else {
        format!(
            "Moves: {}  High Score: {}  (wasd/arrows to move, q to quit)",
            session.moves(),
            high_score
        )
    };
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..size {
        for x in 0..size {
            let pos = Pos { x, y };
            let cell = cell_for(session, pos);
            let idx = y * size + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(session: &Session, pos: Pos) -> ScreenCell {
    if pos == session.player() {
        return ScreenCell {
            glyph: Glyph::Player,
            color: Color::Green,
        };
    }
    if session.zombies().contains(&pos) {
        return ScreenCell {
            glyph: Glyph::Zombie,
            color: Color::Red,
        };
    }
    if session.grid().is_open(pos) {
        ScreenCell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        }
    } else {
        ScreenCell {
            glyph: Glyph::Wall,
            color: Color::DarkGrey,
        }
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: ScreenCell,
) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Player => ("😃", cell.color),
        Glyph::Zombie => ("🧟", cell.color),
        Glyph::Wall => ("██", cell.color),
        Glyph::Empty => ("  ", cell.color),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
