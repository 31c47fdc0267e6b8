/// Rendering layer: all terminal I/O lives here.
///
/// The game thinks in 800×600 logical pixels; `Canvas` projects that field
/// onto the terminal's cell grid.  No game logic is performed here.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use space_invaders::config::{EXPLOSION_FRAMES, HEIGHT, WIDTH};
use space_invaders::entities::{Enemy, Explosion, Player, Rocket, Session, SpriteRef};
use space_invaders::geometry::{play_field, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STARS: Color = Color::DarkBlue;
const C_TILE: Color = Color::DarkGrey;
const C_TEXT: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ROCKET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// One glyph per explosion frame: flash, bloom, fade.
const EXPLOSION_GLYPHS: [char; EXPLOSION_FRAMES] =
    ['.', '*', 'o', 'O', '@', '#', '%', '&', '+', 'x', ':', '\''];

// ── Rendering context ─────────────────────────────────────────────────────────

/// Output handle plus the current cell grid size.
pub struct Canvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    keyboard_enhanced: bool,
}

impl Canvas<io::BufWriter<Stdout>> {
    /// Take over the real terminal: raw mode, alternate screen, no cursor.
    pub fn open() -> io::Result<Self> {
        let mut out = io::BufWriter::new(io::stdout());

        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Key-release events only where the terminal speaks the kitty
        // protocol.  Writing the push sequence succeeds everywhere, so ask
        // first instead of trusting the write.
        let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if keyboard_enhanced {
            out.execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }

        let (cols, rows) = terminal::size()?;
        log::debug!("terminal {cols}x{rows}, key release events: {keyboard_enhanced}");
        let mut canvas = Canvas::new(out, cols, rows);
        canvas.keyboard_enhanced = keyboard_enhanced;
        Ok(canvas)
    }

    /// Give the terminal back.
    pub fn close(mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        restore_terminal(&mut self.out);
    }
}

/// Undo `Canvas::open`.  Best effort: every step is attempted, so it is also
/// safe after a half-finished `open`.
pub fn restore_terminal<W: Write>(out: &mut W) {
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

impl<W: Write> Canvas<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Canvas {
            out,
            cols,
            rows,
            keyboard_enhanced: false,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Logical pixel → terminal cell, clamped to the grid.
    fn cell(&self, x: i32, y: i32) -> (u16, u16) {
        let max_col = self.cols.saturating_sub(1) as i64;
        let max_row = self.rows.saturating_sub(1) as i64;
        let col = (x as i64 * self.cols as i64 / WIDTH as i64).clamp(0, max_col);
        let row = (y as i64 * self.rows as i64 / HEIGHT as i64).clamp(0, max_row);
        (col as u16, row as u16)
    }

    /// Cells covered by a rectangle, or `None` if it is entirely off-field.
    fn cells(&self, rect: &Rect) -> Option<((u16, u16), (u16, u16))> {
        if !rect.overlaps(&play_field()) {
            return None;
        }
        let top_left = self.cell(rect.left(), rect.top());
        let bottom_right = self.cell(rect.right() - 1, rect.bottom() - 1);
        Some((top_left, bottom_right))
    }

    fn text(&mut self, x: i32, y: i32, color: Color, text: &str) -> io::Result<()> {
        let (col, row) = self.cell(x, y);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    /// Paint a rectangle: `top` on its first row, `body` on the rest.
    /// A one-row rectangle only gets `top`.
    fn block(&mut self, rect: &Rect, color: Color, top: char, body: char) -> io::Result<()> {
        let Some(((c0, r0), (c1, r1))) = self.cells(rect) else {
            return Ok(());
        };
        let width = (c1 - c0 + 1) as usize;
        self.out.queue(style::SetForegroundColor(color))?;
        for row in r0..=r1 {
            let glyph = if row == r0 { top } else { body };
            self.out.queue(cursor::MoveTo(c0, row))?;
            self.out.queue(Print(glyph.to_string().repeat(width)))?;
        }
        Ok(())
    }

    fn begin(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

// ── Entity drawing ────────────────────────────────────────────────────────────

/// Rendering half of the sprite capability.
pub trait Draw {
    fn draw<W: Write>(&self, canvas: &mut Canvas<W>) -> io::Result<()>;
}

impl Draw for Player {
    fn draw<W: Write>(&self, canvas: &mut Canvas<W>) -> io::Result<()> {
        canvas.block(&self.rect, C_PLAYER, '▲', '█')
    }
}

impl Draw for Enemy {
    fn draw<W: Write>(&self, canvas: &mut Canvas<W>) -> io::Result<()> {
        canvas.block(&self.rect, C_ENEMY, '▼', '═')
    }
}

impl Draw for Rocket {
    fn draw<W: Write>(&self, canvas: &mut Canvas<W>) -> io::Result<()> {
        canvas.block(&self.rect, C_ROCKET, '^', '║')
    }
}

impl Draw for Explosion {
    fn draw<W: Write>(&self, canvas: &mut Canvas<W>) -> io::Result<()> {
        let glyph = EXPLOSION_GLYPHS[self.frame % EXPLOSION_FRAMES];
        let color = if self.frame < EXPLOSION_FRAMES / 2 {
            Color::Yellow
        } else {
            Color::Red
        };
        canvas.block(&self.rect, color, glyph, glyph)
    }
}

impl Draw for SpriteRef<'_> {
    fn draw<W: Write>(&self, canvas: &mut Canvas<W>) -> io::Result<()> {
        match self {
            SpriteRef::Player(p) => p.draw(canvas),
            SpriteRef::Enemy(e) => e.draw(canvas),
            SpriteRef::Rocket(r) => r.draw(canvas),
            SpriteRef::Explosion(x) => x.draw(canvas),
        }
    }
}

// ── Backgrounds ───────────────────────────────────────────────────────────────

/// Sparse fixed starfield behind the play screen.
fn draw_starfield<W: Write>(canvas: &mut Canvas<W>) -> io::Result<()> {
    canvas.out.queue(style::SetForegroundColor(C_STARS))?;
    for row in 0..canvas.rows {
        for col in 0..canvas.cols {
            let hash = (col as u32)
                .wrapping_mul(73_856_093)
                ^ (row as u32).wrapping_mul(19_349_663);
            if hash % 29 == 0 {
                canvas.out.queue(cursor::MoveTo(col, row))?;
                canvas.out.queue(Print('.'))?;
            }
        }
    }
    Ok(())
}

/// Regular tile pattern behind the menu.
fn draw_tiles<W: Write>(canvas: &mut Canvas<W>) -> io::Result<()> {
    canvas.out.queue(style::SetForegroundColor(C_TILE))?;
    for row in (0..canvas.rows).step_by(2) {
        canvas.out.queue(cursor::MoveTo(0, row))?;
        let line: String = (0..canvas.cols)
            .map(|col| if col % 4 == 0 { '·' } else { ' ' })
            .collect();
        canvas.out.queue(Print(line))?;
    }
    Ok(())
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Title screen: tiles, title, prompt and the looping explosion.
pub fn render_menu<W: Write>(canvas: &mut Canvas<W>, explosion: &Explosion) -> io::Result<()> {
    canvas.begin()?;
    draw_tiles(canvas)?;
    canvas.text(150, 150, C_TEXT, "Space Invaders")?;
    canvas.text(225, 300, C_TEXT, "Press ENTER to start")?;
    SpriteRef::Explosion(explosion).draw(canvas)?;
    canvas.text(
        10,
        HEIGHT - 20,
        C_HINT,
        "← → / A D : Move   SPACE : Fire   ENTER : Start   Q : Quit",
    )?;
    canvas.finish()
}

/// One Playing frame: background, live sprites, score.
pub fn render_session<W: Write>(canvas: &mut Canvas<W>, session: &Session) -> io::Result<()> {
    canvas.begin()?;
    draw_session(canvas, session)?;
    canvas.finish()
}

/// The final frame of a session with the "GAME OVER" overlay on top.
pub fn render_game_over<W: Write>(canvas: &mut Canvas<W>, session: &Session) -> io::Result<()> {
    canvas.begin()?;
    draw_session(canvas, session)?;
    canvas.text(200, 250, C_TEXT, "GAME OVER")?;
    canvas.finish()
}

fn draw_session<W: Write>(canvas: &mut Canvas<W>, session: &Session) -> io::Result<()> {
    draw_starfield(canvas)?;
    for sprite in session.sprites() {
        sprite.draw(canvas)?;
    }
    canvas.text(10, 10, C_TEXT, &format!("SCORE: {}", session.score))
}
