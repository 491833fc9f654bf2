//! Headless scenario тесты: AI pipeline внутри Bevy App
//!
//! Проверяем:
//! - два AI агента против друг друга без паники
//! - не больше одного committing request на агента за frame
//! - SetDifficulty меняет profile без сброса history
//! - агент off-stage уходит в RECOVER

use bevy::prelude::*;
use brawl_ai::*;

fn spawn_fighter(world: &mut World, snapshot: CombatantSnapshot) -> Entity {
    world.spawn(snapshot).id()
}

fn attach_ai(world: &mut World, agent: Entity, opponent: Entity, level: DifficultyLevel) {
    world
        .entity_mut(agent)
        .insert(AiController::bundle(
            opponent,
            DifficultyProfile::preset(level),
            AiTuning::default(),
        ));
}

#[test]
fn test_two_agents_run_600_frames() {
    let mut app = create_headless_app(7);
    let world = app.world_mut();

    let left = spawn_fighter(world, CombatantSnapshot::at(Vec2::new(-120.0, 0.0)));
    let right = spawn_fighter(world, CombatantSnapshot::at(Vec2::new(120.0, 0.0)));
    attach_ai(world, left, right, DifficultyLevel::Expert);
    attach_ai(world, right, left, DifficultyLevel::Easy);

    let mut total_requests = 0;
    for _ in 0..600 {
        world.run_schedule(FixedUpdate);

        let requests: Vec<AiActionRequested> =
            world.resource_mut::<Events<AiActionRequested>>().drain().collect();
        for agent in [left, right] {
            let commits = requests
                .iter()
                .filter(|r| r.agent == agent && r.request.is_committing())
                .count();
            assert!(
                commits <= 1,
                "{:?} issued {} committing requests in one frame",
                agent,
                commits
            );
        }
        total_requests += requests.len();
    }

    assert!(total_requests > 0);
    for agent in [left, right] {
        let memory = world.get::<AgentMemory>(agent).expect("agent memory");
        assert_eq!(memory.frame, 600);
        assert!((0.0..=1.0).contains(&memory.threat_level));
    }
}

#[test]
fn test_set_difficulty_preserves_history() {
    let mut app = create_headless_app(3);
    let world = app.world_mut();

    let opponent = spawn_fighter(world, CombatantSnapshot::at(Vec2::new(60.0, 0.0)));
    let agent = spawn_fighter(world, CombatantSnapshot::at(Vec2::new(-60.0, 0.0)));
    attach_ai(world, agent, opponent, DifficultyLevel::Easy);

    // Оппонент атакует, AI записывает history
    for frame in 0..30u32 {
        if let Some(mut snapshot) = world.get_mut::<CombatantSnapshot>(opponent) {
            *snapshot = CombatantSnapshot::at(Vec2::new(60.0, 0.0))
                .with_attack(AttackId::Jab, frame % 10, 10);
        }
        world.run_schedule(FixedUpdate);
    }
    let recorded = world.get::<AgentMemory>(agent).expect("memory").attack_count(AttackId::Jab);
    assert!(recorded >= 3);

    world.send_event(SetDifficulty { agent, level: 1.0 });
    world.run_schedule(FixedUpdate);

    let profile = *world.get::<DifficultyProfile>(agent).expect("profile");
    assert_eq!(profile, DifficultyProfile::preset(DifficultyLevel::Expert));
    let memory = world.get::<AgentMemory>(agent).expect("memory");
    assert_eq!(memory.risk_tolerance, profile.risk_tolerance);
    assert!(memory.attack_count(AttackId::Jab) >= recorded);
    assert_eq!(memory.frame, 31);
}

#[test]
fn test_offstage_agent_recovers() {
    let mut app = create_headless_app(11);
    let world = app.world_mut();

    let opponent = spawn_fighter(
        world,
        CombatantSnapshot {
            damage: 120.0,
            ..CombatantSnapshot::at(Vec2::new(360.0, -80.0))
                .with_attack(AttackId::ForwardAir, 6, 20)
        },
    );
    let agent = spawn_fighter(
        world,
        CombatantSnapshot {
            damage: 150.0,
            grounded: false,
            velocity: Vec2::new(0.0, -3.0),
            ..CombatantSnapshot::at(Vec2::new(420.0, -100.0))
        },
    );
    attach_ai(world, agent, opponent, DifficultyLevel::Hard);

    let mut states = Vec::new();
    for _ in 0..60 {
        world.run_schedule(FixedUpdate);
        for change in world.resource_mut::<Events<BehaviorStateChanged>>().drain() {
            states.push(change.to);
        }
    }

    assert_eq!(states.first(), Some(&BehavioralState::Recover));
    let memory = world.get::<AgentMemory>(agent).expect("memory");
    assert_eq!(memory.current_state(), BehavioralState::Recover);
}
