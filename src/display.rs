//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! run.  No game logic is performed; this module only translates state into
//! terminal commands, scaling field units onto the terminal grid.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use last_hearth::engine::HudView;
use last_hearth::entities::{Bullet, Monster, MonsterKind, RunState, Screen};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HP: Color = Color::Red;
const C_HUD_WAVE: Color = Color::Cyan;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HEROES: Color = Color::Grey;
const C_PLAYER: Color = Color::Blue;
const C_TAVERN: Color = Color::DarkYellow;
const C_MONSTER_NORMAL: Color = Color::White;
const C_MONSTER_FAST: Color = Color::Green;
const C_MONSTER_TANK: Color = Color::Red;
const C_BULLET: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_SUNRISE: Color = Color::Yellow;

/// Maps field coordinates onto the play area inside the border
/// (columns 1..cols-1, rows 2..rows-2).
struct Viewport {
    cols: u16,
    rows: u16,
    field_w: f32,
    field_h: f32,
}

impl Viewport {
    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let inner_w = self.cols.saturating_sub(2).max(1) as f32;
        let inner_h = self.rows.saturating_sub(4).max(1) as f32;
        let col = 1.0 + (x / self.field_w * inner_w).clamp(0.0, inner_w - 1.0);
        let row = 2.0 + (y / self.field_h * inner_h).clamp(0.0, inner_h - 1.0);
        (col as u16, row as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &RunState,
    hud: &HudView,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let vp = Viewport {
        cols,
        rows,
        field_w: state.width,
        field_h: state.height,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, hud)?;
    draw_tavern(out, &vp, state)?;

    for monster in &state.monsters {
        draw_monster(out, &vp, monster)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, &vp, bullet)?;
    }

    draw_player(out, &vp, state)?;
    draw_heroes(out, hud, rows)?;

    match &hud.screen {
        Screen::Playing => {}
        Screen::Upgrade { .. } => draw_upgrade_screen(out, hud, cols, rows)?,
        Screen::Sunrise => draw_sunrise_screen(out, cols, rows)?,
        Screen::GameOver => draw_game_over(out, hud, cols, rows)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) and roster (last row) ─────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &HudView) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!("HP:{:>4}  ", hud.tavern_hp)))?;
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(format!("Wave:{:>3}  ", hud.wave)))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}  ", hud.score)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(format!("Monsters:{:>3}", hud.monster_count)))?;
    Ok(())
}

fn draw_heroes<W: Write>(out: &mut W, hud: &HudView, rows: u16) -> std::io::Result<()> {
    let roster: Vec<String> = hud
        .heroes
        .iter()
        .map(|h| format!("{} L{} ({:.1} dmg, {:.0} hp)", h.name, h.level, h.damage, h.health))
        .collect();
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HEROES))?;
    out.queue(Print(roster.join("  ")))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_tavern<W: Write>(out: &mut W, vp: &Viewport, state: &RunState) -> std::io::Result<()> {
    let (col, row) = vp.cell(state.width / 2.0, state.height);
    out.queue(style::SetForegroundColor(C_TAVERN))?;
    out.queue(cursor::MoveTo(col.saturating_sub(4), row))?;
    out.queue(Print("▄▄[##]▄▄"))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, vp: &Viewport, state: &RunState) -> std::io::Result<()> {
    let (col, row) = vp.cell(state.player.pos.x, state.player.pos.y);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
    out.queue(Print("/▲\\"))?;
    Ok(())
}

fn draw_monster<W: Write>(out: &mut W, vp: &Viewport, monster: &Monster) -> std::io::Result<()> {
    let (glyph, color) = match monster.kind {
        MonsterKind::Normal => ("ʘ", C_MONSTER_NORMAL),
        MonsterKind::Fast => ("ѷ", C_MONSTER_FAST),
        MonsterKind::Tank => ("█", C_MONSTER_TANK),
    };
    let (col, row) = vp.cell(monster.pos.x, monster.pos.y);
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(glyph))?;
    // Wounded monsters carry a health pip above them
    if monster.health < monster.max_health && row > 2 {
        out.queue(cursor::MoveTo(col, row - 1))?;
        out.queue(Print(health_pip(monster.health / monster.max_health)))?;
    }
    Ok(())
}

fn health_pip(fraction: f32) -> &'static str {
    if fraction > 0.66 {
        "▆"
    } else if fraction > 0.33 {
        "▄"
    } else {
        "▂"
    }
}

fn draw_bullet<W: Write>(out: &mut W, vp: &Viewport, bullet: &Bullet) -> std::io::Result<()> {
    let (col, row) = vp.cell(bullet.pos.x, bullet.pos.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_BULLET))?;
    out.queue(Print("║"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    let x = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(x, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_upgrade_screen<W: Write>(
    out: &mut W,
    hud: &HudView,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cy = rows / 2;
    print_centered(out, cols, cy.saturating_sub(3), Color::Cyan, &format!("WAVE {} CLEARED", hud.wave))?;
    print_centered(out, cols, cy.saturating_sub(2), C_HINT, "Choose an upgrade:")?;
    for (i, label) in hud.upgrade_labels.iter().enumerate() {
        let line = format!("[{}] {:<32}", i + 1, label);
        print_centered(out, cols, cy + i as u16, Color::White, &line)?;
    }
    Ok(())
}

fn draw_sunrise_screen<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let cy = rows / 2;
    print_centered(out, cols, cy.saturating_sub(2), C_SUNRISE, "☀  SUNRISE!  ☀")?;
    print_centered(out, cols, cy, Color::White, "+1 Light Shard")?;
    print_centered(out, cols, cy + 2, C_HINT, "Press ENTER to continue")?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    hud: &HudView,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cy = rows / 2;
    print_centered(out, cols, cy.saturating_sub(2), Color::Red, "╔═══════════════╗")?;
    print_centered(out, cols, cy.saturating_sub(1), Color::Red, "║   GAME OVER   ║")?;
    print_centered(out, cols, cy, Color::Red, "╚═══════════════╝")?;
    let summary = format!("Wave {}  ·  Score {}  ·  Kills {}", hud.wave, hud.score, hud.total_kills);
    print_centered(out, cols, cy + 2, C_HUD_SCORE, &summary)?;
    print_centered(out, cols, cy + 4, C_HINT, "R : Restart    Q : Quit")?;
    Ok(())
}
