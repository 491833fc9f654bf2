//! AgentMemory: mutable per-agent состояние на время одного матча.
//!
//! Владелец: агент. Трогается только из simulation thread (FixedUpdate chain).

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyProfile;
use super::history::RingHistory;
use super::state::BehavioralState;
use super::tuning::AiTuning;
use crate::components::{AttackId, ObservedActivity};

/// Sample позиции оппонента (каждые position_sample_interval frames)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub position: Vec2,
    pub frame: u64,
}

/// Выученные тенденции оппонента (обновляет PatternLearner)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tendencies {
    pub favors_ground: bool,
    pub favors_aerial: bool,
    pub shields_often: bool,
    pub rolls_often: bool,
    pub jumps_out_of_combos: bool,
    pub aggression_level: f32,
    pub defense_level: f32,
}

/// Позиционные флаги (ThreatAndZoneAssessor)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneFlags {
    pub near_left_edge: bool,
    pub near_right_edge: bool,
    /// Self выше оппонента (за пределами vertical deadband)
    pub above_opponent: bool,
    pub below_opponent: bool,
    pub self_offstage: bool,
    pub opponent_offstage: bool,
    /// Оппонент висит у края (ledge), но не полностью off-stage
    pub opponent_hugging_ledge: bool,
    pub opponent_near_center: bool,
}

impl ZoneFlags {
    pub fn near_edge(&self) -> bool {
        self.near_left_edge || self.near_right_edge
    }
}

/// Прогресс активного combo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboState {
    pub sequence: Vec<AttackId>,
    pub starting_damage_band: f32,
    pub is_finisher: bool,
    /// Индекс следующего шага в sequence
    pub combo_counter: usize,
    pub started_frame: u64,
    pub last_step_frame: u64,
    /// Frame, когда оппонент вышел из hitstun (grace period)
    pub hitstun_lost_frame: Option<u64>,
}

impl ComboState {
    pub fn is_active(&self) -> bool {
        !self.sequence.is_empty()
    }

    pub fn next_attack(&self) -> Option<AttackId> {
        self.sequence.get(self.combo_counter).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.is_active() && self.combo_counter >= self.sequence.len()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Scratch-состояние executor между frames (cadences, cooldowns)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutorScratch {
    pub last_commit_frame: Option<u64>,
    pub next_low_commit_frame: u64,
    /// Текущее направление dash-dance (+1 / -1)
    pub dash_dance_sign: f32,
    /// Frames, которые ещё держим shield
    pub shield_hold_frames: u32,
    pub shielding: bool,
    /// Pummels за текущий grab
    pub pummels: u8,
}

/// Snapshot для UI/diagnostics (serde)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDiagnostics {
    pub frame: u64,
    pub state: BehavioralState,
    pub state_timer: u32,
    pub threat_level: f32,
    pub expected_reward: f32,
    pub risk_tolerance: f32,
    pub center_control_importance: f32,
    pub stock_advantage: i32,
    pub damage_advantage: f32,
    pub tendencies: Tendencies,
    pub zones: ZoneFlags,
    pub combo_step: Option<(usize, usize)>,
    pub profile: DifficultyProfile,
}

/// Память агента
#[derive(Component, Debug, Clone)]
pub struct AgentMemory {
    pub frame: u64,

    current_state: BehavioralState,
    /// Frames с последней смены состояния
    state_timer: u32,
    /// Latched reaction delay текущего состояния (тянется при первой оценке)
    pub reaction_delay: Option<f32>,

    // === Bounded histories (newest-first) ===
    pub attack_history: RingHistory<AttackId>,
    pub position_history: RingHistory<PositionSample>,
    pub state_history: RingHistory<ObservedActivity>,
    /// Lifetime counts (только растут)
    attack_frequency: BTreeMap<AttackId, u32>,
    total_attack_count: u32,
    /// Последняя увиденная атака оппонента (для детекции начала новой)
    pub last_seen_attack: Option<(AttackId, u32)>,

    pub tendencies: Tendencies,
    pub zones: ZoneFlags,

    pub threat_level: f32,
    pub expected_reward: f32,
    /// Динамическая копия profile.risk_tolerance
    pub risk_tolerance: f32,
    pub center_control_importance: f32,

    pub stock_advantage: i32,
    pub damage_advantage: f32,

    pub combo: ComboState,
    /// X-цель recovery (выбирается раз на вход в RECOVER)
    pub recover_target: Option<f32>,
    pub scratch: ExecutorScratch,
}

impl AgentMemory {
    pub fn new(tuning: &AiTuning, profile: &DifficultyProfile) -> Self {
        Self {
            frame: 0,
            current_state: BehavioralState::Neutral,
            state_timer: 0,
            reaction_delay: None,
            attack_history: RingHistory::with_capacity(tuning.attack_history_len),
            position_history: RingHistory::with_capacity(tuning.position_history_len),
            state_history: RingHistory::with_capacity(tuning.state_history_len),
            attack_frequency: BTreeMap::new(),
            total_attack_count: 0,
            last_seen_attack: None,
            tendencies: Tendencies::default(),
            zones: ZoneFlags::default(),
            threat_level: 0.0,
            expected_reward: 0.0,
            risk_tolerance: profile.risk_tolerance,
            center_control_importance: 0.0,
            stock_advantage: 0,
            damage_advantage: 0.0,
            combo: ComboState::default(),
            recover_target: None,
            scratch: ExecutorScratch {
                dash_dance_sign: 1.0,
                ..Default::default()
            },
        }
    }

    /// Рестарт матча
    pub fn reset(&mut self, tuning: &AiTuning, profile: &DifficultyProfile) {
        *self = Self::new(tuning, profile);
    }

    pub fn current_state(&self) -> BehavioralState {
        self.current_state
    }

    pub fn state_timer(&self) -> u32 {
        self.state_timer
    }

    /// Начало frame: frame counter + stateTimer
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.state_timer = self.state_timer.saturating_add(1);
    }

    /// Переход в состояние. Returns true если состояние сменилось.
    ///
    /// Timer сбрасывается только при смене. comboCounter чистится,
    /// кроме входа в COMBO с уже валидной sequence.
    pub fn transition_to(&mut self, next: BehavioralState) -> bool {
        if next == self.current_state {
            return false;
        }
        let previous = self.current_state;

        if next != BehavioralState::Combo || !self.combo.is_active() {
            self.combo.combo_counter = 0;
        }
        if previous == BehavioralState::Combo && next != BehavioralState::Combo {
            self.combo.clear();
        }
        if previous == BehavioralState::Recover {
            self.recover_target = None;
        }

        self.current_state = next;
        self.state_timer = 0;
        self.reaction_delay = None;

        crate::logger::log(&format!(
            "AI frame {}: {} → {}",
            self.frame, previous, next
        ));
        true
    }

    /// Регистрирует атаку оппонента (history + lifetime frequency)
    pub fn record_attack(&mut self, attack: AttackId) {
        self.attack_history.push(attack);
        *self.attack_frequency.entry(attack).or_insert(0) += 1;
        self.total_attack_count += 1;
    }

    pub fn attack_frequency(&self) -> &BTreeMap<AttackId, u32> {
        &self.attack_frequency
    }

    pub fn attack_count(&self, attack: AttackId) -> u32 {
        self.attack_frequency.get(&attack).copied().unwrap_or(0)
    }

    pub fn total_attack_count(&self) -> u32 {
        self.total_attack_count
    }

    /// Самая частая атака оппонента (при равенстве: меньший AttackId)
    pub fn most_frequent_attack(&self) -> Option<AttackId> {
        let mut best: Option<(AttackId, u32)> = None;
        for (attack, count) in &self.attack_frequency {
            match best {
                Some((_, best_count)) if *count <= best_count => {}
                _ => best = Some((*attack, *count)),
            }
        }
        best.map(|(attack, _)| attack)
    }

    pub fn diagnostics(&self, profile: &DifficultyProfile) -> AgentDiagnostics {
        AgentDiagnostics {
            frame: self.frame,
            state: self.current_state,
            state_timer: self.state_timer,
            threat_level: self.threat_level,
            expected_reward: self.expected_reward,
            risk_tolerance: self.risk_tolerance,
            center_control_importance: self.center_control_importance,
            stock_advantage: self.stock_advantage,
            damage_advantage: self.damage_advantage,
            tendencies: self.tendencies,
            zones: self.zones,
            combo_step: self
                .combo
                .is_active()
                .then(|| (self.combo.combo_counter, self.combo.sequence.len())),
            profile: *profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> AgentMemory {
        AgentMemory::new(&AiTuning::default(), &DifficultyProfile::default())
    }

    #[test]
    fn test_state_timer_resets_only_on_change() {
        let mut memory = memory();
        memory.begin_frame();
        memory.begin_frame();
        assert_eq!(memory.state_timer(), 2);

        assert!(!memory.transition_to(BehavioralState::Neutral));
        assert_eq!(memory.state_timer(), 2);

        assert!(memory.transition_to(BehavioralState::Approach));
        assert_eq!(memory.state_timer(), 0);
        memory.begin_frame();
        assert_eq!(memory.state_timer(), 1);
    }

    #[test]
    fn test_combo_counter_kept_when_entering_combo_with_sequence() {
        let mut memory = memory();
        memory.combo.sequence = vec![AttackId::UpTilt, AttackId::UpAir];
        memory.combo.combo_counter = 1;
        memory.transition_to(BehavioralState::Combo);
        assert_eq!(memory.combo.combo_counter, 1);

        memory.transition_to(BehavioralState::Neutral);
        assert_eq!(memory.combo.combo_counter, 0);
        assert!(!memory.combo.is_active());
    }

    #[test]
    fn test_attack_frequency_only_grows() {
        let mut memory = memory();
        for _ in 0..15 {
            memory.record_attack(AttackId::Jab);
        }
        memory.record_attack(AttackId::ForwardSmash);
        assert_eq!(memory.attack_count(AttackId::Jab), 15);
        assert_eq!(memory.total_attack_count(), 16);
        assert_eq!(memory.attack_history.len(), 10);
        assert_eq!(memory.most_frequent_attack(), Some(AttackId::Jab));
    }

    #[test]
    fn test_recover_target_cleared_on_leaving_recover() {
        let mut memory = memory();
        memory.transition_to(BehavioralState::Recover);
        memory.recover_target = Some(120.0);
        memory.transition_to(BehavioralState::Neutral);
        assert_eq!(memory.recover_target, None);
    }
}
