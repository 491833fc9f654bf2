//! ComboPlanner: статическая база combo и пошаговое исполнение.
//!
//! База строится один раз, лениво, при первой попытке combo.
//! Entry подходит, если lower_bound ≤ opponent damage < lower_bound + band_width.
//! Первая подходящая entry в порядке базы выигрывает.

use bevy::prelude::*;
use once_cell::sync::Lazy;

use super::components::{AgentMemory, AiTuning, BehavioralState};
use crate::components::{AttackId, CombatantSnapshot};

/// Где combo применима
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboContext {
    Any,
    /// Только когда оппонент off-stage (edge-guard string)
    OffStage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboEntry {
    pub sequence: Vec<AttackId>,
    pub starting_damage_lower_bound: f32,
    pub is_finisher: bool,
    pub context: ComboContext,
}

impl ComboEntry {
    fn new(
        sequence: &[AttackId],
        lower_bound: f32,
        is_finisher: bool,
        context: ComboContext,
    ) -> Self {
        Self {
            sequence: sequence.to_vec(),
            starting_damage_lower_bound: lower_bound,
            is_finisher,
            context,
        }
    }

    pub fn matches(&self, opponent_damage: f32, opponent_offstage: bool, band_width: f32) -> bool {
        let in_band = self.starting_damage_lower_bound <= opponent_damage
            && opponent_damage < self.starting_damage_lower_bound + band_width;
        let context_ok = match self.context {
            ComboContext::Any => true,
            ComboContext::OffStage => opponent_offstage,
        };
        in_band && context_ok
    }
}

static COMBO_DATABASE: Lazy<Vec<ComboEntry>> = Lazy::new(|| {
    use AttackId::*;
    crate::logger::log("ComboPlanner: building combo database");
    vec![
        // Edge-guard string: перехват и spike
        ComboEntry::new(&[ForwardAir, BackAir, DownAir], 60.0, true, ComboContext::OffStage),
        // Low-damage starter: juggle → aerial
        ComboEntry::new(&[UpTilt, UpTilt, UpAir, ForwardAir], 0.0, false, ComboContext::Any),
        ComboEntry::new(&[DownTilt, UpAir, NeutralAir], 35.0, false, ComboContext::Any),
        // Mid-damage string
        ComboEntry::new(&[DownTilt, ForwardAir, UpAir, BackAir], 50.0, false, ComboContext::Any),
        // Kill: throw → launcher → vertical kill move
        ComboEntry::new(&[UpThrow, UpTilt, UpSmash], 90.0, true, ComboContext::Any),
        ComboEntry::new(&[DownThrow, ForwardAir, BackAir], 130.0, true, ComboContext::Any),
    ]
});

pub fn combo_database() -> &'static [ComboEntry] {
    &COMBO_DATABASE
}

/// Первая entry, подходящая под damage band и context
pub fn find_combo(
    opponent_damage: f32,
    opponent_offstage: bool,
    band_width: f32,
) -> Option<&'static ComboEntry> {
    combo_database()
        .iter()
        .find(|entry| entry.matches(opponent_damage, opponent_offstage, band_width))
}

/// AttemptCombo: оппонент в hitstun И есть entry под его damage band.
///
/// Новая combo сбрасывает comboCounter в 0. Активная combo в состоянии COMBO
/// сохраняет прогресс.
pub fn attempt_combo(
    memory: &mut AgentMemory,
    opponent: &CombatantSnapshot,
    tuning: &AiTuning,
) -> bool {
    if !opponent.in_hitstun {
        return false;
    }
    let offstage = memory.zones.opponent_offstage;
    let Some(entry) = find_combo(opponent.damage, offstage, tuning.combo_band_width) else {
        return false;
    };

    // Активная combo (включая завершённую, её закрывает executor) не перезапускается
    if memory.current_state() == BehavioralState::Combo && memory.combo.is_active() {
        return true;
    }

    let combo = &mut memory.combo;
    combo.sequence = entry.sequence.clone();
    combo.starting_damage_band = entry.starting_damage_lower_bound;
    combo.is_finisher = entry.is_finisher;
    combo.combo_counter = 0;
    combo.started_frame = memory.frame;
    combo.last_step_frame = memory.frame;
    combo.hitstun_lost_frame = None;
    true
}

/// Результат шага исполнения combo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComboStep {
    /// Встать в позицию для следующего удара
    Reposition { target: Vec2, next: AttackId },
    /// Выполнить удар (counter уже продвинут)
    Strike(AttackId),
    /// Sequence завершена
    Finished { finisher: bool },
    Abandoned,
}

impl ComboStep {
    /// Состояние после завершения/срыва combo
    pub fn exit_state(self) -> Option<BehavioralState> {
        match self {
            ComboStep::Finished { finisher: true } | ComboStep::Abandoned => {
                Some(BehavioralState::Neutral)
            }
            ComboStep::Finished { finisher: false } => Some(BehavioralState::Pressure),
            _ => None,
        }
    }
}

/// Целевая позиция self относительно оппонента для следующего удара.
///
/// `toward`: знак направления от self к оппоненту.
pub fn step_offset(attack: AttackId, toward: f32) -> Vec2 {
    use AttackId::*;
    match attack {
        // Оппонент прямо над нами
        UpTilt | UpSmash | UpAir => Vec2::new(0.0, -50.0),
        DownAir => Vec2::new(0.0, 50.0),
        // Оппонент по диагонали вперёд-вверх
        ForwardAir | NeutralAir => Vec2::new(-toward * 40.0, -30.0),
        BackAir => Vec2::new(-toward * 45.0, -20.0),
        Grab | Pummel | ForwardThrow | BackThrow | UpThrow | DownThrow => Vec2::new(
            -toward * 20.0,
            0.0,
        ),
        _ => Vec2::new(-toward * 40.0, 0.0),
    }
}

fn in_position(me: &CombatantSnapshot, target: Vec2, attack: AttackId, tolerance: f32) -> bool {
    let horizontal = (me.position.x - target.x).abs() <= tolerance;
    if attack.is_aerial() {
        horizontal && (me.position.y - target.y).abs() <= tolerance * 2.0
    } else {
        horizontal
    }
}

/// Продвинуть активную combo на один frame.
///
/// `ready` = боец может начать committing действие в этом frame.
pub fn advance_combo(
    memory: &mut AgentMemory,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    tuning: &AiTuning,
    ready: bool,
) -> ComboStep {
    let frame = memory.frame;
    let combo = &mut memory.combo;

    if !combo.is_active() {
        return ComboStep::Abandoned;
    }
    if combo.is_complete() {
        return ComboStep::Finished { finisher: combo.is_finisher };
    }
    if frame.saturating_sub(combo.started_frame) > u64::from(tuning.combo_timeout) {
        return ComboStep::Abandoned;
    }

    if opponent.in_hitstun {
        combo.hitstun_lost_frame = None;
    } else {
        let lost = *combo.hitstun_lost_frame.get_or_insert(frame);
        if frame.saturating_sub(lost) > u64::from(tuning.combo_grace) {
            return ComboStep::Abandoned;
        }
    }

    let Some(next) = combo.next_attack() else {
        return ComboStep::Finished { finisher: combo.is_finisher };
    };

    let toward = if opponent.position.x >= me.position.x { 1.0 } else { -1.0 };
    let target = opponent.position + step_offset(next, toward);

    let cadence_ok = combo.combo_counter == 0
        || frame.saturating_sub(combo.last_step_frame) >= u64::from(tuning.combo_step_interval);

    if ready && cadence_ok && in_position(me, target, next, tuning.combo_position_tolerance) {
        combo.combo_counter += 1;
        combo.last_step_frame = frame;
        ComboStep::Strike(next)
    } else {
        ComboStep::Reposition { target, next }
    }
}
