/// Session logic: construction, firing, the per-tick update and the
/// collision & spawn engine.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle) and returns a brand-new
/// `Session`.  Side effects are limited to the injected RNG.

use std::time::Instant;

use rand::Rng;

use crate::config::ENEMY_POOL;
use crate::entities::{Controls, Enemy, Frame, GameStatus, Player, Rocket, Session, Sprite};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh session: ship at bottom-centre, rocket stowed, a full enemy pool.
pub fn new_session(rng: &mut impl Rng) -> Session {
    let enemies = (0..ENEMY_POOL).map(|_| Enemy::spawn(rng)).collect();
    Session {
        player: Player::new(),
        rocket: Rocket::new(),
        enemies,
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Launch the rocket from the ship's nose.  No change while it is in flight.
pub fn player_fire(state: &Session) -> Session {
    let mut next = state.clone();
    let (x, y) = next.player.muzzle();
    if next.rocket.fire(x, y) {
        log::trace!("rocket fired from x={x}");
    }
    next
}

// ── Collision & spawn engine ─────────────────────────────────────────────────

/// Rocket against enemies, then ship against enemies.
///
/// At most one enemy is destroyed per call, the first overlapping one in
/// collection order.  The kill is replaced by a fresh spawn so the pool size
/// never changes.
pub fn resolve_collisions(state: &Session, rng: &mut impl Rng) -> Session {
    let mut next = state.clone();

    if next.rocket.is_firing() {
        let rocket = next.rocket.bounds();
        if let Some(hit) = next.enemies.iter().position(|e| e.bounds().overlaps(&rocket)) {
            next.enemies.remove(hit);
            next.score += 1;
            next.rocket.stow();
            next.enemies.push(Enemy::spawn(rng));
            log::debug!("enemy destroyed, score {}", next.score);
        }
    }

    let ship = next.player.bounds();
    if next.enemies.iter().any(|e| e.bounds().overlaps(&ship)) {
        next.status = GameStatus::GameOver;
        log::info!("ship hit, final score {}", next.score);
    }

    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the session by one tick: fire, move everything, collide.
/// A finished session is returned untouched.
pub fn tick(state: &Session, controls: &Controls, now: Instant, rng: &mut impl Rng) -> Session {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let mut next = if controls.fire && state.rocket.is_ready() {
        player_fire(state)
    } else {
        state.clone()
    };

    {
        let mut frame = Frame::new(controls, &mut *rng, now);
        next.player.update(&mut frame);
        for enemy in next.enemies.iter_mut() {
            enemy.update(&mut frame);
        }
        next.rocket.update(&mut frame);
    }

    let mut next = resolve_collisions(&next, rng);
    next.frame += 1;
    next
}
