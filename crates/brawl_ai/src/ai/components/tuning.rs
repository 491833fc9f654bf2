//! AiTuning: именованные, переопределяемые tuning-константы AI.
//!
//! Ни одна из констант не "load-bearing" сама по себе: форма вычислений
//! фиксирована в decision/executor, значения можно ретюнить per agent.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Base priorities кандидатов DecisionEngine
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct StatePriorities {
    pub recover_danger: f32,
    pub recover_safe: f32,
    pub edge_guard: f32,
    /// Добавка к edge_guard, масштабируется opponent damage / damage_ceiling
    pub edge_guard_damage_bonus: f32,
    pub ledge_trap: f32,
    pub combo: f32,
    pub defend: f32,
    /// Добавка к defend, масштабируется threat level
    pub defend_threat_scale: f32,
    pub punish: f32,
    pub attack: f32,
    /// Добавка к attack если opponent damage > high_damage
    pub attack_high_damage_bonus: f32,
    pub pressure: f32,
    /// Добавка к pressure, масштабируется damage advantage / 100
    pub pressure_advantage_scale: f32,
    pub bait: f32,
    pub bait_aggression_bonus: f32,
    pub retreat: f32,
    /// self damage делится на это значение
    pub retreat_damage_divisor: f32,
    pub retreat_stock_bonus: f32,
    pub approach: f32,
    pub approach_center_bonus: f32,
    pub neutral: f32,
}

impl Default for StatePriorities {
    fn default() -> Self {
        Self {
            recover_danger: 10.0,
            recover_safe: 8.5,
            edge_guard: 7.0,
            edge_guard_damage_bonus: 2.0,
            ledge_trap: 6.5,
            combo: 9.0,
            defend: 5.0,
            defend_threat_scale: 4.0,
            punish: 8.0,
            attack: 6.0,
            attack_high_damage_bonus: 2.0,
            pressure: 5.0,
            pressure_advantage_scale: 3.0,
            bait: 4.0,
            bait_aggression_bonus: 1.5,
            retreat: 4.0,
            retreat_damage_divisor: 50.0,
            retreat_stock_bonus: 2.0,
            approach: 3.0,
            approach_center_bonus: 2.0,
            neutral: 2.0,
        }
    }
}

/// Tuning-параметры одного AI агента
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AiTuning {
    // ==================== Distances ====================
    pub close_range: f32,
    pub moderate_range: f32,
    pub far_range: f32,
    /// Дистанция, на которой APPROACH переходит в ATTACK
    pub optimal_spacing: f32,
    pub spacing_tolerance: f32,
    pub retreat_spacing: f32,
    pub pressure_spacing: f32,
    pub bait_spacing: f32,

    // ==================== Threat ====================
    /// Дистанция, на которой distance threat падает до 0
    pub threat_range: f32,
    pub damage_ceiling: f32,
    /// Ceiling при отставании по stocks (осторожнее)
    pub damage_ceiling_behind: f32,
    pub threat_noise: f32,

    // ==================== Zones ====================
    /// Доля ширины main platform от края, считающаяся "near edge"
    pub edge_zone_fraction: f32,
    pub vertical_deadband: f32,
    /// Горизонтальный margin "над stage"
    pub offstage_above_margin: f32,
    /// Строгий margin за краем платформы
    pub offstage_edge_margin: f32,
    pub blast_inset: f32,
    /// Радиус "обнимает ledge" для LEDGE_TRAP
    pub ledge_hug_distance: f32,

    // ==================== Reaction ====================
    pub tunnel_vision_penalty: f32,
    pub recovery_hesitation_penalty: f32,

    // ==================== Pattern learning ====================
    pub pattern_window: u32,
    pub position_sample_interval: u32,
    pub state_sample_interval: u32,
    pub attack_history_len: usize,
    pub position_history_len: usize,
    pub state_history_len: usize,
    pub ground_ratio_threshold: f32,
    pub aerial_ratio_threshold: f32,
    pub shield_ratio_threshold: f32,
    pub roll_ratio_threshold: f32,
    pub combo_escape_threshold: f32,
    /// totalAttackCount, при котором aggression = 1
    pub aggression_attack_count: f32,

    // ==================== Decision ====================
    pub priorities: StatePriorities,
    pub high_damage: f32,
    /// Хвостовая доля атаки, считающаяся punishable endlag
    pub punish_window: f32,
    pub active_risk_bonus: f32,
    pub offstage_risk_bonus: f32,
    pub noise_scale: f32,

    // ==================== Combo ====================
    pub combo_step_interval: u32,
    pub combo_timeout: u32,
    /// Frames после выхода оппонента из hitstun до abandon
    pub combo_grace: u32,
    pub combo_band_width: f32,
    pub combo_position_tolerance: f32,

    // ==================== Executor cadences ====================
    pub low_commit_interval: u32,
    pub low_commit_jitter: u32,
    /// Минимум frames между committing actions
    pub commit_cooldown: u32,

    // ==================== Recovery ====================
    /// Насколько ниже top main platform считается "extreme danger"
    pub recovery_vertical_danger: f32,
    pub up_special_threshold: f32,
    pub air_dodge_range: f32,
    pub edge_guard_tolerance: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            close_range: 80.0,
            moderate_range: 180.0,
            far_range: 320.0,
            optimal_spacing: 60.0,
            spacing_tolerance: 15.0,
            retreat_spacing: 160.0,
            pressure_spacing: 40.0,
            bait_spacing: 110.0,

            threat_range: 300.0,
            damage_ceiling: 150.0,
            damage_ceiling_behind: 100.0,
            threat_noise: 0.1,

            edge_zone_fraction: 0.2,
            vertical_deadband: 30.0,
            offstage_above_margin: 30.0,
            offstage_edge_margin: 10.0,
            blast_inset: 50.0,
            ledge_hug_distance: 30.0,

            tunnel_vision_penalty: 15.0,
            recovery_hesitation_penalty: 8.0,

            pattern_window: 60,
            position_sample_interval: 10,
            state_sample_interval: 5,
            attack_history_len: 10,
            position_history_len: 6,
            state_history_len: 20,
            ground_ratio_threshold: 0.6,
            aerial_ratio_threshold: 0.5,
            shield_ratio_threshold: 0.3,
            roll_ratio_threshold: 0.25,
            combo_escape_threshold: 0.5,
            aggression_attack_count: 50.0,

            priorities: StatePriorities::default(),
            high_damage: 100.0,
            punish_window: 0.4,
            active_risk_bonus: 0.2,
            offstage_risk_bonus: 0.5,
            noise_scale: 3.0,

            combo_step_interval: 10,
            combo_timeout: 120,
            combo_grace: 8,
            combo_band_width: 40.0,
            combo_position_tolerance: 25.0,

            low_commit_interval: 30,
            low_commit_jitter: 10,
            commit_cooldown: 6,

            recovery_vertical_danger: 60.0,
            up_special_threshold: 110.0,
            air_dodge_range: 60.0,
            edge_guard_tolerance: 15.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_ordered() {
        let tuning = AiTuning::default();
        assert!(tuning.close_range < tuning.moderate_range);
        assert!(tuning.moderate_range < tuning.far_range);
        assert!(tuning.optimal_spacing < tuning.close_range);
    }

    #[test]
    fn test_recover_outranks_everything() {
        let p = StatePriorities::default();
        assert!(p.recover_danger > p.combo);
        assert!(p.recover_safe > p.punish);
    }
}
