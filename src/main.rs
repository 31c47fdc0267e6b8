mod display;

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::thread_rng;

use space_invaders::config::{frame_time, GAME_OVER_PAUSE};
use space_invaders::entities::Controls;
use space_invaders::game::{advance, Screen};

use display::Canvas;

/// Longest the menu waits for input before redrawing the animation.
const MENU_IDLE: Duration = Duration::from_millis(15);

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(135);

// ── Input ─────────────────────────────────────────────────────────────────────

/// Folds raw terminal events into per-tick `Controls`.
///
/// Movement keys count as held until `HOLD_WINDOW` passes without a
/// press/repeat.  A release event (keyboard-enhanced terminals only) ends the
/// hold early.  Fire / confirm / close are latched on press and cleared when
/// read.
struct Input {
    key_seen: HashMap<KeyCode, Instant>,
    pressed: Controls,
}

impl Input {
    fn new() -> Self {
        Input {
            key_seen: HashMap::new(),
            pressed: Controls::default(),
        }
    }

    fn is_held(&self, key: KeyCode, now: Instant) -> bool {
        self.key_seen
            .get(&key)
            .map(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Wait up to `wait` for the first event, then drain everything pending.
    fn poll<W: Write>(&mut self, rx: &mpsc::Receiver<Event>, canvas: &mut Canvas<W>, wait: Duration) {
        if !wait.is_zero() {
            match rx.recv_timeout(wait) {
                Ok(ev) => self.apply(ev, canvas, Instant::now()),
                Err(RecvTimeoutError::Timeout) => return,
                Err(RecvTimeoutError::Disconnected) => {
                    self.pressed.close = true;
                    return;
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            self.apply(ev, canvas, Instant::now());
        }
    }

    fn apply<W: Write>(&mut self, ev: Event, canvas: &mut Canvas<W>, now: Instant) {
        match ev {
            Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) => match kind {
                KeyEventKind::Press => {
                    self.key_seen.insert(code, now);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.pressed.close = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            self.pressed.close = true;
                        }
                        KeyCode::Enter => self.pressed.confirm = true,
                        KeyCode::Char(' ') => self.pressed.fire = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.key_seen.insert(code, now);
                }
                KeyEventKind::Release => {
                    self.key_seen.remove(&code);
                }
            },
            Event::Resize(cols, rows) => canvas.resize(cols, rows),
            _ => {}
        }
    }

    /// Controls for this tick; latched presses are consumed.
    fn take(&mut self, now: Instant) -> Controls {
        let left = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]
            .into_iter()
            .any(|k| self.is_held(k, now));
        let right = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]
            .into_iter()
            .any(|k| self.is_held(k, now));
        let pressed = std::mem::take(&mut self.pressed);
        Controls {
            left,
            right,
            ..pressed
        }
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Drive the screen state machine until the player closes the game.
fn run<W: Write>(canvas: &mut Canvas<W>, rx: &mpsc::Receiver<Event>) -> io::Result<()> {
    let mut rng = thread_rng();
    let mut input = Input::new();
    let mut screen = Screen::menu(Instant::now());
    log::info!("showing menu");

    loop {
        let frame_start = Instant::now();

        let controls = match &screen {
            Screen::Menu(_) => {
                input.poll(rx, canvas, MENU_IDLE);
                input.take(Instant::now())
            }
            Screen::Playing(_) => {
                input.poll(rx, canvas, Duration::ZERO);
                input.take(Instant::now())
            }
            Screen::GameOver(session) => {
                // Input is not read during the pause; anything typed now is
                // seen by the menu afterwards.
                display::render_game_over(canvas, session)?;
                thread::sleep(GAME_OVER_PAUSE);
                Controls::default()
            }
        };

        let previous = screen.name();
        screen = match advance(screen, &controls, Instant::now(), &mut rng) {
            Some(next) => next,
            None => {
                log::info!("close requested from {previous}");
                return Ok(());
            }
        };
        if screen.name() != previous {
            log::info!("{previous} -> {}", screen.name());
        }

        match &screen {
            Screen::Menu(explosion) => display::render_menu(canvas, explosion)?,
            Screen::Playing(session) => {
                display::render_session(canvas, session)?;
                let elapsed = frame_start.elapsed();
                if elapsed < frame_time() {
                    thread::sleep(frame_time() - elapsed);
                }
            }
            // Drawn with its overlay at the top of the next iteration.
            Screen::GameOver(_) => {}
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let mut canvas = match Canvas::open() {
        Ok(canvas) => canvas,
        Err(err) => {
            display::restore_terminal(&mut io::stdout());
            return Err(err).context("failed to initialise the terminal");
        }
    };

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
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

    let result = run(&mut canvas, &rx);

    // Always restore the terminal
    canvas.close();

    result.context("terminal I/O failed")
}
