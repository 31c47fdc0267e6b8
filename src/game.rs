/// Screen-level state machine: Menu → Playing → GameOver → Menu → …
///
/// One value of `Screen` is threaded through a single outer loop, so any
/// number of restarts runs at constant call depth.

use std::time::Instant;

use rand::Rng;

use crate::compute::{new_session, tick};
use crate::entities::{Controls, Explosion, GameStatus, Session};

#[derive(Clone, Debug)]
pub enum Screen {
    /// Title screen with its looping explosion.
    Menu(Explosion),
    Playing(Session),
    /// The finished session, kept only so its last frame can be shown
    /// under the overlay.
    GameOver(Session),
}

impl Screen {
    pub fn menu(now: Instant) -> Self {
        Screen::Menu(Explosion::new(now))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu(_) => "menu",
            Screen::Playing(_) => "playing",
            Screen::GameOver(_) => "game over",
        }
    }
}

/// Advance the screen by one step.  `None` means the player closed the game.
///
/// GameOver ignores `controls` entirely; the caller is expected to have held
/// the overlay for its pause before stepping it.
pub fn advance(
    screen: Screen,
    controls: &Controls,
    now: Instant,
    rng: &mut impl Rng,
) -> Option<Screen> {
    match screen {
        Screen::Menu(mut explosion) => {
            if controls.close {
                return None;
            }
            if controls.confirm {
                let session = new_session(rng);
                log::info!("new session with {} enemies", session.enemies.len());
                return Some(Screen::Playing(session));
            }
            explosion.advance_to(now);
            Some(Screen::Menu(explosion))
        }
        Screen::Playing(session) => {
            if controls.close {
                return None;
            }
            let session = tick(&session, controls, now, rng);
            match session.status {
                GameStatus::Playing => Some(Screen::Playing(session)),
                GameStatus::GameOver => Some(Screen::GameOver(session)),
            }
        }
        Screen::GameOver(session) => {
            log::debug!("leaving game over after {} ticks", session.frame);
            Some(Screen::menu(now))
        }
    }
}
