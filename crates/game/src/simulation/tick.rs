use glam::Vec2;

use crate::math::modulo;
use crate::physics::move_and_collide;
use crate::player::{HeldKeys, PLAYER_RUN_SPEED};
use crate::sprite::{IDLE_FRAME, PLAYER_ANIM_FPS, PLAYER_RADIUS, Sprite, SpriteType};
use crate::world::World;

/// Speed below which a player sprite is shown standing, squared.
const MOVING_SPEED2: f32 = 0.01;

/// Frame pacing for the client loop: accumulates wall time and hands out
/// fixed-size ticks.
pub struct FixedTimestep {
    tick_rate: u32,
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            dt: 1.0 / tick_rate as f32,
            accumulator: 0.0,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.min(0.25);
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Advances the local player and every sprite by `delta` seconds.
pub fn step(world: &mut World, keys: HeldKeys, delta: f32) {
    move_player(world, keys, delta);
    update_sprites(world, delta);
}

fn move_player(world: &mut World, keys: HeldKeys, delta: f32) {
    if !world.player.is_alive() {
        return;
    }
    let direction = keys.movement_direction(world.player.direction);
    if direction == Vec2::ZERO {
        return;
    }
    move_and_collide(
        &world.map,
        &mut world.player.position,
        direction * (delta * PLAYER_RUN_SPEED),
        PLAYER_RADIUS,
    );
}

fn update_sprites(world: &mut World, delta: f32) {
    let map = &world.map;
    let sprites = world.sprites.as_mut_slice();

    for i in 0..sprites.len() {
        let sprite = &mut sprites[i];
        if !sprite.disabled {
            let (displacement, radius) = (sprite.velocity * delta, sprite.radius());
            let collided = move_and_collide(map, &mut sprite.position, displacement, radius);
            if sprite.kind == SpriteType::Bullet && collided {
                sprite.disabled = true;
            }
        }
        if sprite.kind == SpriteType::Player {
            animate(sprite, delta);
        }

        let sprite = &sprites[i];
        if sprite.disabled || sprite.kind != SpriteType::Player {
            continue;
        }
        let (id, position, radius) = (sprite.id, sprite.position, sprite.radius());

        for (j, other) in sprites.iter_mut().enumerate() {
            if j == i || other.disabled || other.kind != SpriteType::Bullet || other.owner == id {
                continue;
            }
            let reach = radius + other.radius();
            if (other.position - position).length_squared() < reach * reach {
                other.disabled = true;
            }
        }
    }
}

fn animate(sprite: &mut Sprite, delta: f32) {
    if sprite.anim_frame > IDLE_FRAME {
        sprite.anim_frame = (sprite.anim_frame - delta * PLAYER_ANIM_FPS).max(IDLE_FRAME);
    } else if sprite.velocity.length_squared() > MOVING_SPEED2 {
        sprite.anim_frame = modulo(sprite.anim_frame + delta * PLAYER_ANIM_FPS, IDLE_FRAME);
    } else {
        sprite.anim_frame = IDLE_FRAME;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;
    use crate::player::PLAYER_MAX_HEALTH;
    use crate::sprite::FIRING_FRAME;

    fn open_world() -> World {
        let mut world = World::new();
        world.map = Map::from_rows(&[
            "##########",
            "#........#",
            "#........#",
            "#........#",
            "##########",
        ])
        .unwrap();
        world.teleport_player(Vec2::new(2.5, 2.5), 0.0);
        world
    }

    fn bullet(id: u8, owner: u8, position: Vec2, velocity: Vec2) -> Sprite {
        let mut sprite = Sprite::new(id, owner, SpriteType::Bullet);
        sprite.position = position;
        sprite.velocity = velocity;
        sprite
    }

    #[test]
    fn test_player_walks_forward() {
        let mut world = open_world();
        step(&mut world, HeldKeys::FORWARD, 0.1);
        assert!((world.player.position.x - 2.85).abs() < 1e-3);
    }

    #[test]
    fn test_dead_player_stays_put() {
        let mut world = open_world();
        world.player.take_damage(PLAYER_MAX_HEALTH);
        step(&mut world, HeldKeys::FORWARD, 0.1);
        assert_eq!(world.player.position, Vec2::new(2.5, 2.5));
    }

    #[test]
    fn test_bullet_disabled_on_wall() {
        let mut world = open_world();
        world.sprites.insert(bullet(1, 9, Vec2::new(8.5, 2.5), Vec2::new(10.0, 0.0)));
        step(&mut world, HeldKeys::empty(), 0.1);
        let sprite = world.sprites.get(1).unwrap();
        assert!(sprite.disabled);
        let stopped_at = sprite.position.x;

        step(&mut world, HeldKeys::empty(), 0.1);
        assert_eq!(world.sprites.get(1).unwrap().position.x, stopped_at);
    }

    #[test]
    fn test_bullet_hits_other_player_only() {
        let mut world = open_world();
        let mut target = Sprite::new(2, 2, SpriteType::Player);
        target.position = Vec2::new(5.5, 2.5);
        world.sprites.insert(target);
        world.sprites.insert(bullet(3, 2, Vec2::new(5.55, 2.5), Vec2::ZERO));
        world.sprites.insert(bullet(4, 7, Vec2::new(5.45, 2.5), Vec2::ZERO));

        step(&mut world, HeldKeys::empty(), 0.016);
        assert!(!world.sprites.get(3).unwrap().disabled);
        assert!(world.sprites.get(4).unwrap().disabled);
        assert_eq!(world.sprites.len(), 3);
    }

    #[test]
    fn test_firing_pose_decays_to_idle() {
        let mut world = open_world();
        let mut shooter = Sprite::new(2, 2, SpriteType::Player);
        shooter.position = Vec2::new(5.5, 2.5);
        shooter.anim_frame = FIRING_FRAME;
        world.sprites.insert(shooter);

        step(&mut world, HeldKeys::empty(), 0.1);
        let frame = world.sprites.get(2).unwrap().anim_frame;
        assert!((frame - 5.4).abs() < 1e-4);

        step(&mut world, HeldKeys::empty(), 1.0);
        assert_eq!(world.sprites.get(2).unwrap().anim_frame, IDLE_FRAME);
    }

    #[test]
    fn test_walking_cycles_below_idle() {
        let mut world = open_world();
        let mut walker = Sprite::new(2, 2, SpriteType::Player);
        walker.position = Vec2::new(5.5, 2.5);
        walker.velocity = Vec2::new(0.0, 0.5);
        world.sprites.insert(walker);

        for _ in 0..20 {
            step(&mut world, HeldKeys::empty(), 0.05);
            assert!(world.sprites.get(2).unwrap().anim_frame < IDLE_FRAME);
        }
    }

    #[test]
    fn test_fixed_timestep_hands_out_whole_ticks() {
        let mut timestep = FixedTimestep::new(50);
        timestep.accumulate(0.05);
        let mut ticks = 0;
        while timestep.consume_tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
    }
}
