//! PatternLearner: online-статистика по bounded history оппонента.
//!
//! Два шага:
//! - `record_history` каждый frame: новые атаки, position/state samples по cadence
//! - `learn_patterns` раз в pattern_window frames: ratios → tendency flags/scores

use super::components::{AgentMemory, AiTuning, PositionSample, Tendencies};
use crate::components::{CombatantSnapshot, ObservedActivity};

const SHIELD_DEFENSE_WEIGHT: f32 = 0.6;
const ROLL_DEFENSE_WEIGHT: f32 = 0.4;
const AERIAL_AGGRESSION_BONUS: f32 = 0.2;

fn on_cadence(frame: u64, interval: u32) -> bool {
    frame % u64::from(interval.max(1)) == 0
}

/// Запись observation оппонента в histories
pub fn record_history(memory: &mut AgentMemory, opponent: &CombatantSnapshot, tuning: &AiTuning) {
    // Новая атака = другой id или elapsed откатился назад (повтор той же атаки)
    match opponent.attack.filter(|_| opponent.is_attacking) {
        Some(attack) => {
            let elapsed = opponent.attack_elapsed_frames;
            let is_new = match memory.last_seen_attack {
                Some((previous, previous_elapsed)) => {
                    previous != attack || elapsed < previous_elapsed
                }
                None => true,
            };
            if is_new {
                memory.record_attack(attack);
            }
            memory.last_seen_attack = Some((attack, elapsed));
        }
        None => memory.last_seen_attack = None,
    }

    let frame = memory.frame;
    if on_cadence(frame, tuning.position_sample_interval) {
        memory.position_history.push(PositionSample {
            position: opponent.position,
            frame,
        });
    }
    if on_cadence(frame, tuning.state_sample_interval) {
        memory.state_history.push(opponent.observed_activity());
    }
}

/// Пора ли пересчитать tendencies
pub fn should_learn(frame: u64, tuning: &AiTuning) -> bool {
    frame > 0 && on_cadence(frame, tuning.pattern_window)
}

/// Доля выходов из hitstun, сразу за которыми следует airborne sample
fn combo_escape_ratio(history: &[ObservedActivity]) -> Option<f32> {
    // history newest-first: pair[0] новее pair[1]
    let mut exits = 0u32;
    let mut jumped = 0u32;
    for pair in history.windows(2) {
        let (newer, older) = (pair[0], pair[1]);
        if older == ObservedActivity::Hitstun && newer != ObservedActivity::Hitstun {
            exits += 1;
            if newer.is_aerial() {
                jumped += 1;
            }
        }
    }
    (exits > 0).then(|| jumped as f32 / exits as f32)
}

/// Reduce histories → tendencies
pub fn learn_patterns(memory: &mut AgentMemory, tuning: &AiTuning) {
    let history = &memory.state_history;

    let ground = history.ratio(|a| a.is_ground());
    let aerial = history.ratio(|a| a.is_aerial());
    let shield = history.ratio(|a| *a == ObservedActivity::Shielding);
    let roll = history.ratio(|a| *a == ObservedActivity::Rolling);

    // Пустой буфер → все ratios 0, flags false
    let favors_ground = !history.is_empty() && ground >= tuning.ground_ratio_threshold;
    let favors_aerial = !history.is_empty() && aerial >= tuning.aerial_ratio_threshold;
    let shields_often = !history.is_empty() && shield >= tuning.shield_ratio_threshold;
    let rolls_often = !history.is_empty() && roll >= tuning.roll_ratio_threshold;

    let samples: Vec<ObservedActivity> = history.iter().copied().collect();
    let jumps_out_of_combos =
        combo_escape_ratio(&samples).is_some_and(|ratio| ratio >= tuning.combo_escape_threshold);

    let mut aggression_level = if tuning.aggression_attack_count > 0.0 {
        (memory.total_attack_count() as f32 / tuning.aggression_attack_count).min(1.0)
    } else {
        0.0
    };
    if favors_aerial {
        aggression_level = (aggression_level + AERIAL_AGGRESSION_BONUS).min(1.0);
    }

    let mut defense_level = 0.0;
    if shields_often {
        defense_level += SHIELD_DEFENSE_WEIGHT;
    }
    if rolls_often {
        defense_level += ROLL_DEFENSE_WEIGHT;
    }

    memory.tendencies = Tendencies {
        favors_ground,
        favors_aerial,
        shields_often,
        rolls_often,
        jumps_out_of_combos,
        aggression_level,
        defense_level,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::components::DifficultyProfile;
    use crate::components::{ActionKind, AttackId};
    use bevy::prelude::*;

    fn memory() -> AgentMemory {
        AgentMemory::new(&AiTuning::default(), &DifficultyProfile::default())
    }

    #[test]
    fn test_attack_recorded_once_per_swing() {
        let tuning = AiTuning::default();
        let mut memory = memory();
        for elapsed in 0..20 {
            memory.begin_frame();
            let opponent = CombatantSnapshot::default().with_attack(AttackId::Jab, elapsed, 20);
            record_history(&mut memory, &opponent, &tuning);
        }
        assert_eq!(memory.attack_count(AttackId::Jab), 1);

        // Повтор той же атаки (elapsed откатился)
        memory.begin_frame();
        let again = CombatantSnapshot::default().with_attack(AttackId::Jab, 0, 20);
        record_history(&mut memory, &again, &tuning);
        assert_eq!(memory.attack_count(AttackId::Jab), 2);
    }

    #[test]
    fn test_sampling_cadence() {
        let tuning = AiTuning::default();
        let mut memory = memory();
        for _ in 0..100 {
            memory.begin_frame();
            record_history(&mut memory, &CombatantSnapshot::default(), &tuning);
        }
        assert_eq!(memory.position_history.len(), 6);
        assert_eq!(memory.state_history.len(), 20);
        assert_eq!(memory.position_history.newest().map(|s| s.frame), Some(100));
    }

    #[test]
    fn test_empty_history_learns_nothing() {
        let tuning = AiTuning::default();
        let mut memory = memory();
        learn_patterns(&mut memory, &tuning);
        assert_eq!(memory.tendencies, Tendencies::default());
    }

    #[test]
    fn test_shield_heavy_opponent() {
        let tuning = AiTuning::default();
        let mut memory = memory();
        for i in 0..20 {
            memory.state_history.push(if i % 2 == 0 {
                ObservedActivity::Shielding
            } else {
                ObservedActivity::GroundIdle
            });
        }
        learn_patterns(&mut memory, &tuning);
        assert!(memory.tendencies.shields_often);
        assert!(memory.tendencies.favors_ground);
        assert!(!memory.tendencies.favors_aerial);
        assert!((memory.tendencies.defense_level - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_aerial_opponent_gets_aggression_bonus() {
        let tuning = AiTuning::default();
        let mut memory = memory();
        for _ in 0..25 {
            memory.record_attack(AttackId::NeutralAir);
        }
        for _ in 0..10 {
            memory.state_history.push(ObservedActivity::AirAttack);
        }
        learn_patterns(&mut memory, &tuning);
        assert!(memory.tendencies.favors_aerial);
        assert!((memory.tendencies.aggression_level - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_jumps_out_of_combos() {
        let tuning = AiTuning::default();
        let mut memory = memory();
        // Oldest → newest: hitstun, airborne, idle, hitstun, airborne
        for activity in [
            ObservedActivity::Hitstun,
            ObservedActivity::Airborne,
            ObservedActivity::GroundIdle,
            ObservedActivity::Hitstun,
            ObservedActivity::Airborne,
        ] {
            memory.state_history.push(activity);
        }
        learn_patterns(&mut memory, &tuning);
        assert!(memory.tendencies.jumps_out_of_combos);
    }

    #[test]
    fn test_should_learn_every_window() {
        let tuning = AiTuning::default();
        assert!(!should_learn(0, &tuning));
        assert!(!should_learn(59, &tuning));
        assert!(should_learn(60, &tuning));
        assert!(should_learn(120, &tuning));
    }

    #[test]
    fn test_hitstun_snapshot_classified() {
        let mut opponent = CombatantSnapshot::at(Vec2::ZERO);
        opponent.in_hitstun = true;
        opponent.action = ActionKind::Hitstun;
        assert_eq!(opponent.observed_activity(), ObservedActivity::Hitstun);
    }
}
