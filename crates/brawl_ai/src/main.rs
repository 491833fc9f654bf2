//! Headless demo: два AI агента друг против друга
//!
//! Scripted host: грубая кинематика + hit detection по дистанции.
//! Только чтобы замкнуть цикл snapshot → AI → ActionRequest → snapshot.

use bevy::prelude::*;
use brawl_ai::{
    create_headless_app, log_info, ActionKind, ActionRequest, AiActionRequested, AiController,
    AiTuning, AttackId, BehaviorStateChanged, CombatantSnapshot, DifficultyLevel, DifficultyProfile,
    Facing, StageGeometry,
};

const FRAMES: u32 = 600;
const GRAVITY: f32 = 0.6;
const RUN_SPEED: f32 = 4.0;
const AIR_SPEED: f32 = 3.0;
const ATTACK_FRAMES: u32 = 24;
const HIT_RANGE: f32 = 50.0;

/// Host-side таймеры бойца (не видны AI)
#[derive(Component, Debug, Clone, Copy, Default)]
struct DemoBody {
    hitstun_frames: u32,
    dodge_frames: u32,
}

fn main() {
    let seed = 42;
    log_info(&format!("Starting brawl AI headless demo (seed: {})", seed));

    let mut app = create_headless_app(seed);
    let world = app.world_mut();

    let left = world
        .spawn((CombatantSnapshot::at(Vec2::new(-150.0, 0.0)), DemoBody::default()))
        .id();
    let right = world
        .spawn((
            CombatantSnapshot {
                facing: Facing::Left,
                ..CombatantSnapshot::at(Vec2::new(150.0, 0.0))
            },
            DemoBody::default(),
        ))
        .id();

    world.entity_mut(left).insert(AiController::bundle(
        right,
        DifficultyProfile::preset(DifficultyLevel::Hard),
        AiTuning::default(),
    ));
    world.entity_mut(right).insert(AiController::bundle(
        left,
        DifficultyProfile::preset(DifficultyLevel::Medium),
        AiTuning::default(),
    ));

    for frame in 0..FRAMES {
        world.run_schedule(FixedUpdate);

        let transitions: Vec<BehaviorStateChanged> = world
            .resource_mut::<Events<BehaviorStateChanged>>()
            .drain()
            .collect();
        for change in transitions {
            log_info(&format!(
                "frame {:>3}: {:?} {} → {}",
                change.frame, change.agent, change.from, change.to
            ));
        }

        let requests: Vec<AiActionRequested> =
            world.resource_mut::<Events<AiActionRequested>>().drain().collect();
        for requested in requests {
            let opponent = if requested.agent == left { right } else { left };
            apply_request(world, requested.agent, opponent, requested.request);
        }

        step_bodies(world, &[left, right]);

        if frame % 100 == 0 {
            for entity in [left, right] {
                if let Some(snapshot) = world.get::<CombatantSnapshot>(entity) {
                    log_info(&format!(
                        "frame {:>3}: {:?} at ({:.0}, {:.0}) damage {:.0}% stocks {}",
                        frame,
                        entity,
                        snapshot.position.x,
                        snapshot.position.y,
                        snapshot.damage,
                        snapshot.stocks
                    ));
                }
            }
        }
    }

    log_info("Demo complete!");
}

/// Применить один ActionRequest к snapshot бойца
fn apply_request(world: &mut World, agent: Entity, opponent: Entity, request: ActionRequest) {
    let Some(mut me) = world.get::<CombatantSnapshot>(agent).cloned() else {
        return;
    };
    let speed = if me.grounded { RUN_SPEED } else { AIR_SPEED };

    match request {
        ActionRequest::MoveLeft => me.velocity.x = -speed,
        ActionRequest::MoveRight => me.velocity.x = speed,
        ActionRequest::Jump if me.grounded => {
            me.velocity.y = 10.0;
            me.grounded = false;
        }
        ActionRequest::DoubleJump if me.jumps_remaining > 0 => {
            me.velocity.y = 9.0;
            me.jumps_remaining -= 1;
        }
        ActionRequest::FastFall if !me.grounded => me.velocity.y = me.velocity.y.min(-8.0),
        ActionRequest::Face(facing) => me.facing = facing,
        ActionRequest::Shield => {
            me.is_shielding = true;
            me.action = ActionKind::Shielding;
        }
        ActionRequest::ReleaseShield => {
            me.is_shielding = false;
            me.action = ActionKind::Idle;
        }
        ActionRequest::SpotDodge | ActionRequest::ForwardDodge | ActionRequest::BackDodge => {
            let shift = match request {
                ActionRequest::ForwardDodge => me.facing.sign() * 60.0,
                ActionRequest::BackDodge => -me.facing.sign() * 60.0,
                _ => 0.0,
            };
            me.position.x += shift;
            me.action = ActionKind::Rolling;
            if let Some(mut body) = world.get_mut::<DemoBody>(agent) {
                body.dodge_frames = 20;
            }
        }
        ActionRequest::AirDodge { direction } => me.position += direction * 40.0,
        ActionRequest::Attack { attack, .. } => {
            if attack == AttackId::UpSpecial {
                me.velocity.y = 12.0;
                me.up_special_available = false;
            }
            me = me.with_attack(attack, 0, ATTACK_FRAMES);
            land_hit(world, &me, opponent, attack);
        }
        _ => {}
    }

    if let Some(mut snapshot) = world.get_mut::<CombatantSnapshot>(agent) {
        *snapshot = me;
    }
}

/// Hit по дистанции: damage, knockback, hitstun
fn land_hit(world: &mut World, attacker: &CombatantSnapshot, target: Entity, attack: AttackId) {
    let Some(mut victim) = world.get::<CombatantSnapshot>(target).cloned() else {
        return;
    };
    if attacker.position.distance(victim.position) > HIT_RANGE || victim.is_shielding {
        return;
    }

    let damage = 4.0 + attack.category().base_threat() * 12.0;
    victim.damage += damage;
    let away = if victim.position.x >= attacker.position.x { 1.0 } else { -1.0 };
    let knockback = 2.0 + victim.damage * 0.05;
    victim.velocity = Vec2::new(away * knockback, knockback * 0.8);
    victim.grounded = false;
    victim.in_hitstun = true;
    victim.action = ActionKind::Hitstun;
    victim.is_attacking = false;
    victim.attack = None;

    if let Some(mut snapshot) = world.get_mut::<CombatantSnapshot>(target) {
        *snapshot = victim;
    }
    if let Some(mut body) = world.get_mut::<DemoBody>(target) {
        body.hitstun_frames = 12 + (knockback * 2.0) as u32;
    }
}

/// Кинематика, таймеры, blast zone
fn step_bodies(world: &mut World, fighters: &[Entity]) {
    let stage = world.resource::<StageGeometry>().clone();
    let Some(main) = stage.main_platform().copied() else {
        return;
    };
    let blast = *stage.blast_zone();

    for &entity in fighters {
        let Some(mut body) = world.get::<DemoBody>(entity).copied() else {
            continue;
        };
        let Some(mut me) = world.get::<CombatantSnapshot>(entity).cloned() else {
            continue;
        };

        if me.is_attacking {
            me.attack_elapsed_frames += 1;
            if me.attack_elapsed_frames >= me.attack_total_frames {
                me.is_attacking = false;
                me.attack = None;
                me.action = ActionKind::Idle;
            }
        }
        body.hitstun_frames = body.hitstun_frames.saturating_sub(1);
        if body.hitstun_frames == 0 && me.in_hitstun {
            me.in_hitstun = false;
            me.action = ActionKind::Idle;
        }
        body.dodge_frames = body.dodge_frames.saturating_sub(1);
        if body.dodge_frames == 0 && me.action == ActionKind::Rolling {
            me.action = ActionKind::Idle;
        }

        if !me.grounded {
            me.velocity.y -= GRAVITY;
        }
        me.position += me.velocity;
        me.velocity.x *= if me.grounded { 0.0 } else { 0.9 };

        // Приземление на main platform
        let over_stage = me.position.x >= main.left && me.position.x <= main.right;
        let at_surface = me.position.y <= main.top && me.position.y > main.top - 20.0;
        if over_stage && at_surface && me.velocity.y <= 0.0 {
            me.position.y = main.top;
            me.velocity.y = 0.0;
            me.grounded = true;
            me.jumps_remaining = 1;
            me.up_special_available = true;
        } else if !over_stage || me.position.y > main.top {
            me.grounded = false;
        }

        // Blast zone → stock lost, respawn
        if blast.is_within_inset(me.position, 0.0) {
            log_info(&format!("{:?} lost a stock at {:.0}%", entity, me.damage));
            let stocks = me.stocks.saturating_sub(1);
            me = CombatantSnapshot::at(Vec2::new(main.center_x(), main.top));
            me.stocks = stocks;
            body = DemoBody::default();
        }

        if let Some(mut snapshot) = world.get_mut::<CombatantSnapshot>(entity) {
            *snapshot = me;
        }
        if let Some(mut stored) = world.get_mut::<DemoBody>(entity) {
            *stored = body;
        }
    }
}
