use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use space_invaders::config::*;
use space_invaders::entities::*;
use space_invaders::geometry::{within_horizontal, Rect};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn held(left: bool, right: bool) -> Controls {
    Controls {
        left,
        right,
        ..Controls::default()
    }
}

fn enemy_at(x: i32, y: i32, speed_x: i32) -> Enemy {
    Enemy {
        rect: Rect::new(x, y, ENEMY_SIZE.0, ENEMY_SIZE.1),
        speed_x,
        step_y: ENEMY_STEP_Y,
    }
}

fn in_spawn_band(enemy: &Enemy) -> bool {
    (0..=WIDTH - enemy.rect.w).contains(&enemy.rect.x)
        && (SPAWN_BAND.0..=SPAWN_BAND.1).contains(&enemy.rect.y)
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_bottom_centre_at_rest() {
    let p = Player::new();
    assert_eq!(p.rect.centerx(), WIDTH / 2);
    assert_eq!(p.rect.bottom(), HEIGHT - BOTTOM_MARGIN);
    assert_eq!(p.speed_x, 0);
}

#[test]
fn player_moves_by_five() {
    let mut p = Player::new();
    let x0 = p.rect.x;

    p.steer(&held(true, false));
    assert_eq!(p.speed_x, -5);
    assert_eq!(p.rect.x, x0 - 5);

    p.steer(&held(false, true));
    assert_eq!(p.speed_x, 5);
    assert_eq!(p.rect.x, x0);

    p.steer(&held(false, false));
    assert_eq!(p.speed_x, 0);
    assert_eq!(p.rect.x, x0);
}

#[test]
fn player_right_wins_when_both_held() {
    let mut p = Player::new();
    let x0 = p.rect.x;
    p.steer(&held(true, true));
    assert_eq!(p.speed_x, 5);
    assert_eq!(p.rect.x, x0 + 5);
}

#[test]
fn player_clamped_at_walls() {
    let mut p = Player::new();
    p.rect.x = 2;
    p.steer(&held(true, false));
    assert_eq!(p.rect.left(), 0);

    p.rect.set_right(WIDTH - 1);
    p.steer(&held(false, true));
    assert_eq!(p.rect.right(), WIDTH);
}

#[test]
fn player_always_inside_field_after_update() {
    let combos = [
        held(false, false),
        held(true, false),
        held(false, true),
        held(true, true),
    ];
    for x in (-20..=WIDTH + 20).step_by(3) {
        for controls in &combos {
            let mut p = Player::new();
            p.rect.x = x;
            p.steer(controls);
            assert!(0 <= p.rect.left(), "x={x} {controls:?}");
            assert!(p.rect.left() <= p.rect.right());
            assert!(p.rect.right() <= WIDTH, "x={x} {controls:?}");
        }
    }
}

#[test]
fn player_muzzle_is_top_centre() {
    let p = Player::new();
    assert_eq!(p.muzzle(), (p.rect.centerx(), p.rect.top()));
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[test]
fn enemy_spawns_inside_band() {
    let mut rng = seeded_rng();
    for _ in 0..500 {
        let e = Enemy::spawn(&mut rng);
        assert!(in_spawn_band(&e), "{e:?}");
        assert_eq!(e.speed_x, ENEMY_SPEED_X);
        assert_eq!(e.step_y, ENEMY_STEP_Y);
    }
}

#[test]
fn enemy_moves_horizontally() {
    let mut rng = seeded_rng();
    let mut e = enemy_at(100, 100, 4);
    e.advance(&mut rng);
    assert_eq!((e.rect.x, e.rect.y, e.speed_x), (104, 100, 4));
}

#[test]
fn enemy_bounces_off_right_wall_and_drops() {
    let mut rng = seeded_rng();
    let mut e = enemy_at(WIDTH - 64 - 2, 100, 4);
    e.advance(&mut rng);
    assert_eq!(e.speed_x, -4);
    assert_eq!(e.rect.y, 140);
    // Not pushed back: the reversed velocity does that next tick.
    assert_eq!(e.rect.right(), WIDTH + 2);

    e.advance(&mut rng);
    assert_eq!(e.speed_x, -4);
    assert_eq!(e.rect.y, 140);
    assert_eq!(e.rect.right(), WIDTH - 2);
}

#[test]
fn enemy_bounces_off_left_wall_and_drops() {
    let mut rng = seeded_rng();
    let mut e = enemy_at(1, 100, -4);
    e.advance(&mut rng);
    assert_eq!(e.speed_x, 4);
    assert_eq!(e.rect.y, 140);
    assert_eq!(e.rect.x, -3);
}

#[test]
fn enemy_bounce_flips_sign_and_drops_together() {
    let mut rng = seeded_rng();
    for _ in 0..2000 {
        let x = rng.gen_range(0..=WIDTH - ENEMY_SIZE.0);
        let y = rng.gen_range(0..=400);
        let vx = if rng.gen_bool(0.5) { 4 } else { -4 };
        let mut e = enemy_at(x, y, vx);
        e.advance(&mut rng);

        let kept = e.speed_x == vx && e.rect.y == y;
        let bounced = e.speed_x == -vx && e.rect.y == y + ENEMY_STEP_Y;
        assert!(kept ^ bounced, "x={x} y={y} vx={vx} -> {e:?}");
        if kept {
            assert!(within_horizontal(&e.rect), "{e:?}");
        }
    }
}

#[test]
fn enemy_past_bottom_respawns_with_same_velocity() {
    let mut rng = seeded_rng();
    let mut e = enemy_at(100, HEIGHT - 64 + 1, 4);
    e.advance(&mut rng);
    assert!(in_spawn_band(&e), "{e:?}");
    assert_eq!(e.speed_x, 4);
    assert_eq!(e.step_y, ENEMY_STEP_Y);
}

#[test]
fn enemy_bounce_into_floor_respawns_with_reversed_velocity() {
    let mut rng = seeded_rng();
    let mut e = enemy_at(WIDTH - 64, 540, 4);
    e.advance(&mut rng);
    assert!(in_spawn_band(&e), "{e:?}");
    assert_eq!(e.speed_x, -4);
}

#[test]
fn enemy_at_floor_is_not_respawned() {
    let mut rng = seeded_rng();
    let mut e = enemy_at(100, HEIGHT - 64, 4);
    e.advance(&mut rng);
    assert_eq!(e.rect.bottom(), HEIGHT);
    assert_eq!(e.rect.x, 104);
}

// ── Rocket ────────────────────────────────────────────────────────────────────

#[test]
fn rocket_starts_ready_and_stowed() {
    let r = Rocket::new();
    assert!(r.is_ready());
    assert_eq!(r.rect.bottom(), HEIGHT - BOTTOM_MARGIN);
    assert_eq!(r.rect.centerx(), WIDTH / 2);
    assert_eq!(r.speed_y, ROCKET_SPEED_Y);
}

#[test]
fn fire_when_ready_launches_at_target() {
    let mut r = Rocket::new();
    assert!(r.fire(123, 456));
    assert!(r.is_firing());
    assert_eq!(r.rect.centerx(), 123);
    assert_eq!(r.rect.bottom(), 456);
}

#[test]
fn fire_while_firing_is_ignored() {
    let mut r = Rocket::new();
    r.fire(123, 456);
    let before = r.clone();
    assert!(!r.fire(700, 300));
    assert_eq!(r, before);
}

#[test]
fn fire_twice_yields_one_rocket_at_first_target() {
    let mut r = Rocket::new();
    let first = r.fire(200, 500);
    let second = r.fire(300, 400);
    assert!(first);
    assert!(!second);
    assert_eq!(r.rect.centerx(), 200);
    assert_eq!(r.rect.bottom(), 500);
}

#[test]
fn ready_rocket_does_not_move() {
    let mut r = Rocket::new();
    let before = r.clone();
    r.advance();
    assert_eq!(r, before);
}

#[test]
fn firing_rocket_climbs() {
    let mut r = Rocket::new();
    r.fire(400, 500);
    r.advance();
    assert_eq!(r.rect.bottom(), 490);
    assert!(r.is_firing());
}

#[test]
fn rocket_leaving_top_is_stowed() {
    let mut r = Rocket::new();
    r.fire(250, 5);
    r.advance();
    assert!(r.is_ready());
    assert_eq!(r.rect.bottom(), HEIGHT - BOTTOM_MARGIN);
    assert_eq!(r.rect.centerx(), 250);
}

#[test]
fn rocket_at_zero_keeps_flying() {
    let mut r = Rocket::new();
    r.fire(250, 10);
    r.advance();
    assert_eq!(r.rect.bottom(), 0);
    assert!(r.is_firing());
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[test]
fn explosion_centred_on_menu_anchor() {
    let e = Explosion::new(Instant::now());
    assert_eq!(e.frame, 0);
    assert_eq!(e.rect.centerx(), EXPLOSION_CENTER.0);
    assert_eq!(e.rect.centery(), EXPLOSION_CENTER.1);
    assert_eq!((e.rect.w, e.rect.h), EXPLOSION_SIZE);
}

#[test]
fn explosion_waits_strictly_longer_than_frame_time() {
    let t0 = Instant::now();
    let mut e = Explosion::new(t0);

    e.advance_to(t0 + EXPLOSION_FRAME_TIME);
    assert_eq!(e.frame, 0);
    assert_eq!(e.last_update, t0);

    let t1 = t0 + EXPLOSION_FRAME_TIME + Duration::from_millis(1);
    e.advance_to(t1);
    assert_eq!(e.frame, 1);
    assert_eq!(e.last_update, t1);
}

#[test]
fn explosion_loops_after_twelve_frames() {
    let mut now = Instant::now();
    let mut e = Explosion::new(now);
    let step = EXPLOSION_FRAME_TIME + Duration::from_millis(1);
    for expected in 1..EXPLOSION_FRAMES {
        now += step;
        e.advance_to(now);
        assert_eq!(e.frame, expected);
    }
    now += step;
    e.advance_to(now);
    assert_eq!(e.frame, 0);
}

#[test]
fn explosion_advances_one_frame_per_update_even_after_long_gap() {
    let t0 = Instant::now();
    let mut e = Explosion::new(t0);
    e.advance_to(t0 + Duration::from_secs(10));
    assert_eq!(e.frame, 1);
}

// ── Sprite capability ─────────────────────────────────────────────────────────

#[test]
fn sprite_update_dispatches_to_entity_rules() {
    let mut rng = seeded_rng();
    let controls = held(true, false);
    let now = Instant::now();

    let mut player = Player::new();
    let mut enemy = enemy_at(100, 100, 4);
    let mut rocket = Rocket::new();
    rocket.fire(400, 500);
    let mut explosion = Explosion::new(now);

    let later = now + Duration::from_millis(200);
    let mut frame = Frame::new(&controls, &mut rng, later);
    player.update(&mut frame);
    enemy.update(&mut frame);
    rocket.update(&mut frame);
    explosion.update(&mut frame);

    assert_eq!(player.bounds().x, Player::new().rect.x - 5);
    assert_eq!(enemy.bounds().x, 104);
    assert_eq!(rocket.bounds().bottom(), 490);
    assert_eq!(explosion.frame, 1);
}

#[test]
fn sprite_ref_reports_bounds() {
    let p = Player::new();
    let e = enemy_at(10, 60, 4);
    assert_eq!(SpriteRef::Player(&p).bounds(), p.rect);
    assert_eq!(SpriteRef::Enemy(&e).bounds(), e.rect);
}

#[test]
fn session_sprites_hide_stowed_rocket() {
    let mut session = Session {
        player: Player::new(),
        rocket: Rocket::new(),
        enemies: vec![enemy_at(0, 60, 4), enemy_at(200, 60, 4)],
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
    };
    let sprites = session.sprites();
    assert_eq!(sprites.len(), 3);
    assert!(matches!(sprites[0], SpriteRef::Player(_)));
    assert!(!sprites.iter().any(|s| matches!(s, SpriteRef::Rocket(_))));

    session.rocket.fire(400, 500);
    let sprites = session.sprites();
    assert_eq!(sprites.len(), 4);
    assert!(matches!(sprites[3], SpriteRef::Rocket(_)));
}
