/// Game entities and their per-tick update rules.
///
/// Every entity owns its own rectangle; none owns another.  The shared
/// `Sprite` capability is what the frame loop and the renderer see.

use std::time::Instant;

use rand::{Rng, RngCore};

use crate::config::{
    BOTTOM_MARGIN, ENEMY_SIZE, ENEMY_SPEED_X, ENEMY_STEP_Y, EXPLOSION_CENTER, EXPLOSION_FRAMES,
    EXPLOSION_FRAME_TIME, EXPLOSION_SIZE, HEIGHT, PLAYER_SIZE, PLAYER_SPEED, ROCKET_SIZE,
    ROCKET_SPEED_Y, SPAWN_BAND, WIDTH,
};
use crate::geometry::{within_horizontal, Rect};

// ── Per-tick input ────────────────────────────────────────────────────────────

/// Logical inputs sampled once per tick.
///
/// `left` / `right` are level-triggered (held), the rest are edge-triggered
/// (pressed since the previous tick).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub confirm: bool,
    pub close: bool,
}

/// Everything an entity may consult while updating.
pub struct Frame<'a> {
    pub controls: &'a Controls,
    pub rng: &'a mut dyn RngCore,
    pub now: Instant,
}

impl<'a> Frame<'a> {
    pub fn new(controls: &'a Controls, rng: &'a mut dyn RngCore, now: Instant) -> Self {
        Frame { controls, rng, now }
    }
}

/// Capability shared by every entity: advance one tick, report its rectangle.
/// Drawing lives in the presentation layer.
pub trait Sprite {
    fn update(&mut self, frame: &mut Frame<'_>);
    fn bounds(&self) -> Rect;
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub speed_x: i32,
}

impl Player {
    /// Bottom-centre of the field, at rest.
    pub fn new() -> Self {
        let mut rect = Rect::sized(PLAYER_SIZE);
        rect.set_centerx(WIDTH / 2);
        rect.set_bottom(HEIGHT - BOTTOM_MARGIN);
        Player { rect, speed_x: 0 }
    }

    pub fn steer(&mut self, controls: &Controls) {
        // Both checks run; with both keys held the right one wins.
        self.speed_x = 0;
        if controls.left {
            self.speed_x = -PLAYER_SPEED;
        }
        if controls.right {
            self.speed_x = PLAYER_SPEED;
        }

        self.rect.x += self.speed_x;
        self.rect.clamp_horizontal(WIDTH);
    }

    /// Launch point for the rocket: top-centre of the ship.
    pub fn muzzle(&self) -> (i32, i32) {
        (self.rect.centerx(), self.rect.top())
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

impl Sprite for Player {
    fn update(&mut self, frame: &mut Frame<'_>) {
        self.steer(frame.controls);
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub speed_x: i32,
    pub step_y: i32,
}

/// Uniformly random top-left corner inside the spawn band.
fn spawn_point<R: Rng + ?Sized>(rng: &mut R, width: i32) -> (i32, i32) {
    let x = rng.gen_range(0..=WIDTH - width);
    let y = rng.gen_range(SPAWN_BAND.0..=SPAWN_BAND.1);
    (x, y)
}

impl Enemy {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut rect = Rect::sized(ENEMY_SIZE);
        let (x, y) = spawn_point(rng, rect.w);
        rect.x = x;
        rect.y = y;
        Enemy {
            rect,
            speed_x: ENEMY_SPEED_X,
            step_y: ENEMY_STEP_Y,
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.rect.x += self.speed_x;

        // One combined wall check: reverse and drop together.
        if !within_horizontal(&self.rect) {
            self.speed_x = -self.speed_x;
            self.rect.y += self.step_y;
        }

        // Fell off the bottom: back into the spawn band, heading unchanged.
        if self.rect.bottom() > HEIGHT {
            let (x, y) = spawn_point(rng, self.rect.w);
            self.rect.x = x;
            self.rect.y = y;
        }
    }
}

impl Sprite for Enemy {
    fn update(&mut self, frame: &mut Frame<'_>) {
        self.advance(&mut *frame.rng);
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

// ── Rocket ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RocketState {
    Ready,
    Firing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rocket {
    pub rect: Rect,
    pub speed_y: i32,
    pub state: RocketState,
}

impl Rocket {
    pub fn new() -> Self {
        let mut rect = Rect::sized(ROCKET_SIZE);
        rect.set_centerx(WIDTH / 2);
        rect.set_bottom(HEIGHT - BOTTOM_MARGIN);
        Rocket {
            rect,
            speed_y: ROCKET_SPEED_Y,
            state: RocketState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == RocketState::Ready
    }

    pub fn is_firing(&self) -> bool {
        self.state == RocketState::Firing
    }

    /// Launch from `(x, y)` = (centre x, bottom y).  Ignored unless ready.
    /// Returns whether the rocket was launched.
    pub fn fire(&mut self, x: i32, y: i32) -> bool {
        if self.state != RocketState::Ready {
            return false;
        }
        self.rect.set_centerx(x);
        self.rect.set_bottom(y);
        self.state = RocketState::Firing;
        true
    }

    /// Back to ready at the stowed height.  Horizontal position is kept;
    /// the next `fire` re-centres it anyway.
    pub fn stow(&mut self) {
        self.state = RocketState::Ready;
        self.rect.set_bottom(HEIGHT - BOTTOM_MARGIN);
    }

    pub fn advance(&mut self) {
        if self.state != RocketState::Firing {
            return;
        }
        self.rect.y += self.speed_y;
        if self.rect.bottom() < 0 {
            self.stow();
        }
    }
}

impl Default for Rocket {
    fn default() -> Self {
        Rocket::new()
    }
}

impl Sprite for Rocket {
    fn update(&mut self, _frame: &mut Frame<'_>) {
        self.advance();
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

/// Looping 12-frame animation shown on the menu.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub rect: Rect,
    pub frame: usize,
    pub last_update: Instant,
}

impl Explosion {
    pub fn new(now: Instant) -> Self {
        let mut rect = Rect::sized(EXPLOSION_SIZE);
        rect.set_center(EXPLOSION_CENTER);
        Explosion {
            rect,
            frame: 0,
            last_update: now,
        }
    }

    pub fn advance_to(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_update) > EXPLOSION_FRAME_TIME {
            self.last_update = now;
            self.frame = (self.frame + 1) % EXPLOSION_FRAMES;
        }
    }
}

impl Sprite for Explosion {
    fn update(&mut self, frame: &mut Frame<'_>) {
        self.advance_to(frame.now);
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Borrowed view of any live entity, for code that walks all of them.
#[derive(Clone, Copy, Debug)]
pub enum SpriteRef<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    Rocket(&'a Rocket),
    Explosion(&'a Explosion),
}

impl SpriteRef<'_> {
    pub fn bounds(&self) -> Rect {
        match self {
            SpriteRef::Player(p) => p.bounds(),
            SpriteRef::Enemy(e) => e.bounds(),
            SpriteRef::Rocket(r) => r.bounds(),
            SpriteRef::Explosion(x) => x.bounds(),
        }
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Everything owned by one Playing session.  Dropped when the session ends;
/// a restart always builds a fresh one.
#[derive(Clone, Debug)]
pub struct Session {
    pub player: Player,
    pub rocket: Rocket,
    pub enemies: Vec<Enemy>,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
}

impl Session {
    /// Live entities in draw order.  The rocket is only listed while firing.
    pub fn sprites(&self) -> Vec<SpriteRef<'_>> {
        let mut sprites = Vec::with_capacity(self.enemies.len() + 2);
        sprites.push(SpriteRef::Player(&self.player));
        sprites.extend(self.enemies.iter().map(SpriteRef::Enemy));
        if self.rocket.is_firing() {
            sprites.push(SpriteRef::Rocket(&self.rocket));
        }
        sprites
    }
}
