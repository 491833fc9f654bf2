//! Полный AI pipeline одного агента на один frame, без Bevy App.
//!
//! assess → history → (learn) → decide → execute → handoff.
//! ECS systems вызывают те же стадии по отдельности (см. systems.rs).

use rand::Rng;

use super::assess::assess_frame;
use super::components::{AgentMemory, AiTuning, BehavioralState, DifficultyProfile};
use super::decision::{decide, Decision};
use super::executor::execute;
use super::frame::FrameView;
use super::patterns::{learn_patterns, record_history, should_learn};
use crate::components::{ActionPlan, CombatantSnapshot, StageGeometry};
use crate::logger;

/// Результат frame: решение, action requests и смена состояния от executor
#[derive(Debug, Clone, PartialEq)]
pub struct AgentFrameResult {
    pub decision: Decision,
    pub plan: ActionPlan,
    /// Переход, запрошенный executor (уже применён к memory)
    pub handoff: Option<BehavioralState>,
}

impl AgentFrameResult {
    /// Все смены состояния за frame (decision, затем executor handoff)
    pub fn transitions(&self) -> Vec<(BehavioralState, BehavioralState)> {
        let mut transitions = Vec::new();
        if self.decision.changed() {
            transitions.push((self.decision.previous, self.decision.next));
        }
        if let Some(state) = self.handoff {
            transitions.push((self.decision.next, state));
        }
        transitions
    }
}

/// Один полный frame агента.
///
/// Snapshot'ы `me`/`opponent` читаются как immutable срез на весь pass.
pub fn run_agent_frame(
    memory: &mut AgentMemory,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    stage: &StageGeometry,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) -> AgentFrameResult {
    memory.begin_frame();

    assess_frame(memory, me, opponent, stage, profile, tuning, rng);
    record_history(memory, opponent, tuning);
    if should_learn(memory.frame, tuning) {
        learn_patterns(memory, tuning);
    }

    let view = FrameView::new(me, opponent, stage);
    let decision = decide(memory, &view, profile, tuning, rng);
    let outcome = execute(memory, view, profile, tuning, rng);

    let handoff = outcome.transition.filter(|&state| memory.transition_to(state));

    AgentFrameResult {
        decision,
        plan: outcome.plan,
        handoff,
    }
}

/// SetDifficulty: новый profile без сброса history.
///
/// riskTolerance копируется в live memory, reaction delay тянется заново
/// на следующей оценке (baseline нового profile).
pub fn apply_difficulty(profile: &mut DifficultyProfile, memory: &mut AgentMemory, level: f32) {
    let previous = *profile;
    *profile = DifficultyProfile::from_scalar(level);
    memory.risk_tolerance = profile.risk_tolerance;
    memory.reaction_delay = None;

    logger::log_info(&format!(
        "AI difficulty → {:.2}: reaction {:.0}→{:.0}f, risk {:.2}→{:.2}",
        level,
        previous.reaction_time_base,
        profile.reaction_time_base,
        previous.risk_tolerance,
        profile.risk_tolerance
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::components::DifficultyLevel;
    use crate::components::{AttackId, ObservedActivity};
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_apply_difficulty_keeps_history() {
        let tuning = AiTuning::default();
        let mut profile = DifficultyProfile::preset(DifficultyLevel::Easy);
        let mut memory = AgentMemory::new(&tuning, &profile);
        memory.record_attack(AttackId::Jab);
        memory.state_history.push(ObservedActivity::Shielding);
        memory.reaction_delay = Some(40.0);

        apply_difficulty(&mut profile, &mut memory, 0.9);

        assert_eq!(profile, DifficultyProfile::preset(DifficultyLevel::Expert));
        assert_eq!(memory.risk_tolerance, profile.risk_tolerance);
        assert_eq!(memory.reaction_delay, None);
        assert_eq!(memory.attack_count(AttackId::Jab), 1);
        assert_eq!(memory.state_history.len(), 1);
    }

    #[test]
    fn test_frame_counter_and_single_commit() {
        let tuning = AiTuning::default();
        let profile = DifficultyProfile::default();
        let stage = StageGeometry::battlefield();
        let mut memory = AgentMemory::new(&tuning, &profile);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let me = CombatantSnapshot::at(Vec2::new(-100.0, 0.0));
        let opponent = CombatantSnapshot::at(Vec2::new(-40.0, 0.0))
            .with_attack(AttackId::ForwardTilt, 4, 20);

        for frame in 1..=120u64 {
            let result = run_agent_frame(
                &mut memory,
                &me,
                &opponent,
                &stage,
                &profile,
                &tuning,
                &mut rng,
            );
            assert_eq!(memory.frame, frame);
            let commits = result.plan.requests().iter().filter(|r| r.is_committing()).count();
            assert!(commits <= 1);
        }
        assert_eq!(memory.attack_count(AttackId::ForwardTilt), 1);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let tuning = AiTuning::default();
        let profile = DifficultyProfile::preset(DifficultyLevel::Hard);
        let stage = StageGeometry::battlefield();

        let run = || {
            let mut memory = AgentMemory::new(&tuning, &profile);
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            let me = CombatantSnapshot::at(Vec2::new(-150.0, 0.0));
            let mut log = Vec::new();
            for frame in 0..300u32 {
                let x = 150.0 - (frame % 120) as f32;
                let opponent = if frame % 40 < 10 {
                    CombatantSnapshot::at(Vec2::new(x, 0.0))
                        .with_attack(AttackId::Jab, frame % 40, 10)
                } else {
                    CombatantSnapshot::at(Vec2::new(x, 0.0))
                };
                let result = run_agent_frame(
                    &mut memory,
                    &me,
                    &opponent,
                    &stage,
                    &profile,
                    &tuning,
                    &mut rng,
                );
                log.push((result.transitions(), result.plan.into_requests()));
            }
            log
        };

        assert_eq!(run(), run());
    }
}
