mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use fish_game::entities::Direction;
use fish_game::{Game, GameConfig, GameError};

/// Find the missing fish and lead them home.
#[derive(Debug, Parser)]
#[command(name = "fish_game")]
struct Args {
    /// Grid width in cells.
    #[arg(long, default_value_t = 20)]
    width: i32,
    /// Grid height in cells.
    #[arg(long, default_value_t = 15)]
    height: i32,
    /// Number of rocks to scatter.
    #[arg(long, default_value_t = 10)]
    rocks: usize,
    /// Number of snails to scatter.
    #[arg(long, default_value_t = 2)]
    snails: usize,
    /// Seed for a reproducible game.  Each restart advances the seed by one.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> GameConfig {
        GameConfig {
            rocks: self.rocks,
            snails: self.snails,
            ..GameConfig::with_size(self.width, self.height)
        }
    }
}

fn new_game(config: &GameConfig, seed: Option<u64>) -> std::io::Result<Game> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Game::with_rng(config.clone(), rng).map_err(setup_error)
}

fn setup_error(err: GameError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → start a new game.
///
/// The game is turn-based: nothing moves until the player swims, so the loop
/// blocks on the next input event instead of ticking on a timer.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    display::render(out, game)?;

    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(true); // input thread gone
        };

        match ev {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) => {
                let dir = match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if game.game_over() => {
                        return Ok(false);
                    }
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                        Some(Direction::Down)
                    }
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                        Some(Direction::Left)
                    }
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                        Some(Direction::Right)
                    }
                    _ => None,
                };

                // A bumped move still spends the turn.
                if let Some(dir) = dir {
                    if !game.game_over() {
                        game.move_player(dir);
                        game.step();
                    }
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                let (x, y) = display::screen_to_cell(column, row);
                game.click(x, y);
            }
            Event::Resize(..) => {}
            _ => continue,
        }

        display::render(out, game)?;
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();
    config.validate().map_err(setup_error)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop only ever sees whole events.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config, args.seed);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    seed: Option<u64>,
) -> std::io::Result<()> {
    let mut round: u64 = 0;
    loop {
        let mut game = new_game(config, seed.map(|s| s.wrapping_add(round)))?;
        let quit = game_loop(out, &mut game, rx)?;
        info!(
            "round {} ended: score {}, {} steps, {} fish home",
            round,
            game.score(),
            game.steps_taken(),
            game.home().len()
        );
        if quit {
            break;
        }
        round += 1;
    }
    Ok(())
}
