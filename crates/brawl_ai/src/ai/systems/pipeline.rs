//! Per-frame AI pipeline как chain ECS систем.
//!
//! Host пишет CombatantSnapshot до FixedUpdate; внутри frame snapshot'ы
//! только читаются. Порядок (AIPlugin, `.chain()`):
//! 1. begin_agent_frames: frame/stateTimer tick, SetDifficulty
//! 2. assess_threat_and_zones
//! 3. record_opponent_history
//! 4. learn_opponent_patterns
//! 5. decide_behavior_state
//! 6. execute_behavior_state → AiActionRequested

use bevy::prelude::*;

use crate::ai::agent::apply_difficulty;
use crate::ai::assess::assess_frame;
use crate::ai::components::{AgentMemory, AiController, AiTuning, DifficultyProfile};
use crate::ai::decision::decide;
use crate::ai::events::{AiActionRequested, BehaviorStateChanged, SetDifficulty};
use crate::ai::executor::execute;
use crate::ai::frame::FrameView;
use crate::ai::patterns::{learn_patterns, record_history, should_learn};
use crate::components::{CombatantSnapshot, StageGeometry};
use crate::logger;
use crate::DeterministicRng;

/// System: tick frame counter + применение SetDifficulty (history сохраняется)
pub fn begin_agent_frames(
    mut agents: Query<(&mut AgentMemory, &mut DifficultyProfile), With<AiController>>,
    mut difficulty_requests: EventReader<SetDifficulty>,
) {
    for request in difficulty_requests.read() {
        let Ok((mut memory, mut profile)) = agents.get_mut(request.agent) else {
            logger::log_warning(&format!("SetDifficulty: {:?} is not an AI agent", request.agent));
            continue;
        };
        apply_difficulty(&mut profile, &mut memory, request.level);
    }

    for (mut memory, _) in agents.iter_mut() {
        memory.begin_frame();
    }
}

/// System: threat level, zone flags, stock/damage advantage
pub fn assess_threat_and_zones(
    mut agents: Query<(
        &AiController,
        &CombatantSnapshot,
        &mut AgentMemory,
        &DifficultyProfile,
        &AiTuning,
    )>,
    snapshots: Query<&CombatantSnapshot>,
    stage: Res<StageGeometry>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (controller, me, mut memory, profile, tuning) in agents.iter_mut() {
        let Ok(opponent) = snapshots.get(controller.opponent) else {
            continue;
        };
        assess_frame(&mut memory, me, opponent, &stage, profile, tuning, &mut rng.rng);
    }
}

/// System: ring-buffer histories оппонента
pub fn record_opponent_history(
    mut agents: Query<(&AiController, &mut AgentMemory, &AiTuning)>,
    snapshots: Query<&CombatantSnapshot>,
) {
    for (controller, mut memory, tuning) in agents.iter_mut() {
        let Ok(opponent) = snapshots.get(controller.opponent) else {
            continue;
        };
        record_history(&mut memory, opponent, tuning);
    }
}

/// System: пересчёт tendencies каждые pattern_window frames
pub fn learn_opponent_patterns(
    mut agents: Query<(Entity, &mut AgentMemory, &AiTuning),
    With<AiController>>,
) {
    for (entity, mut memory, tuning) in agents.iter_mut() {
        if !should_learn(memory.frame, tuning) {
            continue;
        }
        learn_patterns(&mut memory, tuning);
        let tendencies = memory.tendencies;
        logger::log(&format!(
            "AI {:?} frame {}: tendencies aggression {:.2}, defense {:.2}, ground {}, aerial {}",
            entity,
            memory.frame,
            tendencies.aggression_level,
            tendencies.defense_level,
            tendencies.favors_ground,
            tendencies.favors_aerial
        ));
    }
}

/// System: выбор поведенческого состояния (reaction gating + scoring)
pub fn decide_behavior_state(
    mut agents: Query<(
        Entity,
        &AiController,
        &CombatantSnapshot,
        &mut AgentMemory,
        &DifficultyProfile,
        &AiTuning,
    )>,
    snapshots: Query<&CombatantSnapshot>,
    stage: Res<StageGeometry>,
    mut rng: ResMut<DeterministicRng>,
    mut state_events: EventWriter<BehaviorStateChanged>,
) {
    for (entity, controller, me, mut memory, profile, tuning) in agents.iter_mut() {
        let Ok(opponent) = snapshots.get(controller.opponent) else {
            continue;
        };
        let view = FrameView::new(me, opponent, &stage);
        let decision = decide(&mut memory, &view, profile, tuning, &mut rng.rng);
        if decision.changed() {
            state_events.write(BehaviorStateChanged {
                agent: entity,
                from: decision.previous,
                to: decision.next,
                frame: memory.frame,
            });
        }
    }
}

/// System: executor pass → AiActionRequested (порядок requests сохраняется)
pub fn execute_behavior_state(
    mut agents: Query<(
        Entity,
        &AiController,
        &CombatantSnapshot,
        &mut AgentMemory,
        &DifficultyProfile,
        &AiTuning,
    )>,
    snapshots: Query<&CombatantSnapshot>,
    stage: Res<StageGeometry>,
    mut rng: ResMut<DeterministicRng>,
    mut action_events: EventWriter<AiActionRequested>,
    mut state_events: EventWriter<BehaviorStateChanged>,
) {
    for (entity, controller, me, mut memory, profile, tuning) in agents.iter_mut() {
        let Ok(opponent) = snapshots.get(controller.opponent) else {
            continue;
        };
        let view = FrameView::new(me, opponent, &stage);
        let outcome = execute(&mut memory, view, profile, tuning, &mut rng.rng);

        // Executor handoff (APPROACH → ATTACK, конец combo, ...)
        if let Some(next) = outcome.transition {
            let previous = memory.current_state();
            if memory.transition_to(next) {
                state_events.write(BehaviorStateChanged {
                    agent: entity,
                    from: previous,
                    to: next,
                    frame: memory.frame,
                });
            }
        }

        for request in outcome.plan.into_requests() {
            action_events.write(AiActionRequested {
                agent: entity,
                request,
            });
        }
    }
}
