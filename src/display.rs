/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game.  No game logic is performed; this module only translates state
/// into terminal commands (and screen cells back into grid cells).

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;

use fish_game::entities::{Entity, EntityKind};
use fish_game::Game;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_COUNTS: Color = Color::Cyan;
const C_HOME: Color = Color::White;
const C_ROCK: Color = Color::DarkGrey;
const C_SNAIL: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Terminal colours for `FISH_COLORS`, index for index.
const FISH_PALETTE: [Color; 8] = [
    Color::DarkYellow,
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::White,
];

// ── Layout ────────────────────────────────────────────────────────────────────

/// Each grid cell is two columns wide so the board looks roughly square.
const CELL_W: u16 = 2;
/// Row 0 is the HUD, row 1 the top border.
const GRID_TOP: u16 = 2;
const GRID_LEFT: u16 = 1;

fn cell_origin(x: i32, y: i32) -> (u16, u16) {
    (GRID_LEFT + x as u16 * CELL_W, GRID_TOP + y as u16)
}

/// Map a terminal cell (e.g. from a mouse click) to grid coordinates.  The
/// result may lie off the grid; `Game::click` ignores those.
pub fn screen_to_cell(column: u16, row: u16) -> (i32, i32) {
    let x = (column as i32 - GRID_LEFT as i32).div_euclid(CELL_W as i32);
    let y = row as i32 - GRID_TOP as i32;
    (x, y)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng>(out: &mut W, game: &Game<R>) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, game)?;
    draw_hud(out, game)?;

    // Home first, then obstacles, then fish so the player is always on top.
    let world = game.world();
    let mut layers: Vec<&Entity> = world.iter().collect();
    layers.sort_by_key(|e| draw_layer(e, game));
    for entity in layers {
        draw_entity(out, entity)?;
    }

    draw_controls_hint(out, game)?;

    if game.game_over() {
        draw_game_over(out, game)?;
    }

    let bottom = GRID_TOP + world.height() as u16 + 2;
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.flush()?;
    Ok(())
}

fn draw_layer<R: Rng>(entity: &Entity, game: &Game<R>) -> u8 {
    match &entity.kind {
        EntityKind::Home => 0,
        EntityKind::Rock => 1,
        EntityKind::Snail { .. } => 2,
        EntityKind::Fish(_) if entity.id == game.player() => 4,
        EntityKind::Fish(_) => 3,
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write, R: Rng>(out: &mut W, game: &Game<R>) -> std::io::Result<()> {
    let inner = game.world().width() as usize * CELL_W as usize;
    let h = game.world().height() as u16;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, GRID_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;

    out.queue(cursor::MoveTo(0, GRID_TOP + h))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in GRID_TOP..GRID_TOP + h {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(GRID_LEFT + inner as u16, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write, R: Rng>(out: &mut W, game: &Game<R>) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>5}  Steps:{:>5}",
        game.score(),
        game.steps_taken()
    )))?;

    out.queue(style::SetForegroundColor(C_HUD_COUNTS))?;
    out.queue(Print(format!(
        "  Missing:{} Found:{} Home:{}",
        game.missing_fish_left(),
        game.found().len(),
        game.home().len()
    )))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(out: &mut W, entity: &Entity) -> std::io::Result<()> {
    let (col, row) = cell_origin(entity.x, entity.y);
    out.queue(cursor::MoveTo(col, row))?;
    match &entity.kind {
        EntityKind::Home => {
            out.queue(style::SetForegroundColor(C_HOME))?;
            out.queue(Print("[]"))?;
        }
        EntityKind::Rock => {
            out.queue(style::SetForegroundColor(C_ROCK))?;
            out.queue(Print("██"))?;
        }
        EntityKind::Snail { .. } => {
            out.queue(style::SetForegroundColor(C_SNAIL))?;
            out.queue(Print("@_"))?;
        }
        EntityKind::Fish(fish) => {
            let color = FISH_PALETTE
                .get(fish.color)
                .copied()
                .unwrap_or(Color::White);
            out.queue(style::SetForegroundColor(color))?;
            // The player faces the other way so it stands out.
            out.queue(Print(if fish.player { "<°" } else { "°>" }))?;
        }
    }
    Ok(())
}

// ── Controls hint (below the grid) ────────────────────────────────────────────

fn draw_controls_hint<W: Write, R: Rng>(out: &mut W, game: &Game<R>) -> std::io::Result<()> {
    let row = GRID_TOP + game.world().height() as u16 + 1;
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑↓→ / WASD : Swim   Click : Break rock   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write, R: Rng>(out: &mut W, game: &Game<R>) -> std::io::Result<()> {
    let score_line = format!("Score {} in {} steps", game.score(), game.steps_taken());
    let lines: [(&str, Color); 5] = [
        ("╔════════════════════╗", Color::Green),
        ("║   ALL FISH HOME    ║", Color::Green),
        ("╚════════════════════╝", Color::Green),
        (score_line.as_str(), Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let width = GRID_LEFT + game.world().width() as u16 * CELL_W;
    let cx = width / 2;
    let start_row =
        (GRID_TOP + game.world().height() as u16 / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
