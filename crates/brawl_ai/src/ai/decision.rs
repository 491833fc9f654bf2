//! DecisionEngine: выбор поведенческого состояния.
//!
//! Pipeline одного решения:
//! 1. Reaction gating (latched delay + penalties)
//! 2. Candidate generation (state, base priority), все сработавшие условия
//! 3. Risk/reward adjustment → score
//! 4. Difficulty noise (1 - decision_quality)
//! 5. Selection: строго наибольший score, ties → первый, ничего > 0 → NEUTRAL

use rand::Rng;

use super::assess::unit;
use super::combo::attempt_combo;
use super::components::{AgentMemory, AiTuning, BehavioralState, DifficultyProfile};
use super::frame::FrameView;

/// Кандидат с посчитанным score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub state: BehavioralState,
    pub base_priority: f32,
    pub risk: f32,
    pub reward: f32,
    pub score: f32,
}

/// Итог decide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub previous: BehavioralState,
    pub next: BehavioralState,
    /// false = reaction gating удержал текущее состояние
    pub reevaluated: bool,
}

impl Decision {
    pub fn changed(&self) -> bool {
        self.previous != self.next
    }
}

// ============================================================================
// 1. Reaction gating
// ============================================================================

/// Reaction delay текущего состояния (frames).
///
/// Случайная часть тянется один раз на состояние, penalties добавляются каждый раз.
pub fn reaction_delay(
    memory: &mut AgentMemory,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) -> f32 {
    let base = *memory.reaction_delay.get_or_insert_with(|| {
        profile.reaction_time_base
            + rng.gen::<f32>() * profile.reaction_time_variance * (1.0 - profile.decision_quality)
    });

    let state = memory.current_state();
    let mut delay = base;
    if profile.adaptability < 0.5 && state.is_committed_offense_or_flight() {
        delay += tuning.tunnel_vision_penalty;
    }
    if profile.recovery_skill < 0.5 && state == BehavioralState::Recover {
        delay += tuning.recovery_hesitation_penalty;
    }
    delay
}

pub fn should_reevaluate(
    memory: &mut AgentMemory,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) -> bool {
    let delay = reaction_delay(memory, profile, tuning, rng);
    if (memory.state_timer() as f32) >= delay {
        return true;
    }
    profile.adaptability >= 0.8 || memory.current_state().reevaluates_early()
}

// ============================================================================
// 2. Candidate generation
// ============================================================================

fn recover_in_danger(view: &FrameView, tuning: &AiTuning) -> bool {
    let me = view.me;
    let Some(main) = view.main_platform() else {
        return true;
    };
    let below_ledge = me.position.y < main.top - tuning.recovery_vertical_danger;
    let edge_gap = (me.position.x - main.nearest_edge_x(me.position.x)).abs();
    let far_out = edge_gap > tuning.up_special_threshold * 2.0;
    let no_resources = !me.grounded && me.jumps_remaining == 0 && !me.up_special_available;
    below_ledge || far_out || no_resources
}

/// Все сработавшие кандидаты с base priority (порядок фиксирован)
pub fn generate_candidates(
    memory: &mut AgentMemory,
    view: &FrameView,
    tuning: &AiTuning,
) -> Vec<(BehavioralState, f32)> {
    let p = &tuning.priorities;
    let me = view.me;
    let opponent = view.opponent;
    let distance = view.distance();
    let zones = memory.zones;
    let mut candidates = Vec::with_capacity(12);

    if zones.self_offstage {
        let priority = if recover_in_danger(view, tuning) {
            p.recover_danger
        } else {
            p.recover_safe
        };
        candidates.push((BehavioralState::Recover, priority));
    }

    if zones.opponent_offstage && !zones.self_offstage {
        let damage_scale = if tuning.damage_ceiling > 0.0 {
            unit(opponent.damage / tuning.damage_ceiling)
        } else {
            0.0
        };
        candidates.push((
            BehavioralState::EdgeGuard,
            p.edge_guard + p.edge_guard_damage_bonus * damage_scale,
        ));
    }

    if zones.opponent_hugging_ledge && !zones.self_offstage {
        candidates.push((BehavioralState::LedgeTrap, p.ledge_trap));
    }

    // Combo только со stage; активная combo живёт в пределах grace (закрывает executor)
    if !zones.self_offstage {
        let live_combo =
            memory.current_state() == BehavioralState::Combo && memory.combo.is_active();
        if attempt_combo(memory, opponent, tuning) || live_combo {
            candidates.push((BehavioralState::Combo, p.combo));
        }
    }

    if (opponent.is_attacking || opponent.is_grabbing) && distance < tuning.close_range {
        let mut priority = p.defend + p.defend_threat_scale * memory.threat_level;
        if opponent.is_in_endlag(tuning.punish_window) {
            priority *= 0.5;
        }
        candidates.push((BehavioralState::Defend, priority));
    }

    if opponent.is_in_endlag(tuning.punish_window) && distance < tuning.moderate_range {
        candidates.push((BehavioralState::Punish, p.punish));
    }

    if distance < tuning.close_range {
        let mut priority = p.attack;
        if opponent.damage > tuning.high_damage {
            priority += p.attack_high_damage_bonus;
        }
        if opponent.is_shielding {
            priority *= 0.5;
        }
        candidates.push((BehavioralState::Attack, priority));
    }

    if memory.damage_advantage > 0.0 && distance < tuning.moderate_range {
        candidates.push((
            BehavioralState::Pressure,
            p.pressure + p.pressure_advantage_scale * unit(memory.damage_advantage / 100.0),
        ));
    }

    let tendencies = memory.tendencies;
    if tendencies.aggression_level > 0.5 || tendencies.shields_often {
        let mut priority = p.bait;
        if tendencies.aggression_level > 0.7 {
            priority += p.bait_aggression_bonus;
        }
        candidates.push((BehavioralState::Bait, priority));
    }

    if me.damage > tuning.high_damage || memory.threat_level > 0.6 {
        let mut priority = p.retreat;
        if p.retreat_damage_divisor > 0.0 {
            priority += me.damage.min(tuning.damage_ceiling) / p.retreat_damage_divisor;
        }
        if memory.stock_advantage < 0 {
            priority += p.retreat_stock_bonus;
        }
        candidates.push((BehavioralState::Retreat, priority));
    }

    let mut approach = p.approach;
    if zones.opponent_near_center && memory.center_control_importance > 0.5 {
        approach += p.approach_center_bonus;
    }
    candidates.push((BehavioralState::Approach, approach));

    let idling =
        !opponent.is_attacking && !opponent.in_hitstun && opponent.velocity.length_squared() < 1.0;
    if distance > tuning.far_range || idling {
        candidates.push((BehavioralState::Neutral, p.neutral));
    }

    candidates
}

// ============================================================================
// 3. Risk / reward
// ============================================================================

/// Базовые (risk, reward) состояния до shared adjustments
pub fn base_risk_reward(state: BehavioralState, view: &FrameView) -> (f32, f32) {
    let self_damage = view.me.damage;
    let opponent_damage = view.opponent.damage;
    match state {
        BehavioralState::Recover => (0.7 + 0.1 * (self_damage / 150.0).min(1.0), 1.0),
        BehavioralState::EdgeGuard => (0.5, 0.8 + opponent_damage / 500.0),
        BehavioralState::LedgeTrap => (0.3, 0.7),
        BehavioralState::Combo => (0.2, (1.0 - opponent_damage / 150.0).clamp(0.2, 1.0)),
        BehavioralState::Defend => (0.2, 0.4),
        BehavioralState::Punish => (0.25, 0.85),
        BehavioralState::Attack => (0.45, 0.6 + opponent_damage / 400.0),
        BehavioralState::Pressure => (0.4, 0.6),
        BehavioralState::Bait => (0.35, 0.5),
        BehavioralState::Retreat => (0.15, 0.3),
        BehavioralState::Approach => (0.3, 0.4),
        BehavioralState::Neutral => (0.1, 0.2),
    }
}

/// (risk, reward) с shared adjustments, оба в [0, 1]
pub fn risk_reward(
    state: BehavioralState,
    memory: &AgentMemory,
    view: &FrameView,
    tuning: &AiTuning,
) -> (f32, f32) {
    let (mut risk, reward) = base_risk_reward(state, view);
    if view.opponent.is_mid_active() {
        risk += tuning.active_risk_bonus;
    }
    if memory.zones.self_offstage && state != BehavioralState::Recover {
        risk += tuning.offstage_risk_bonus;
    }
    (unit(risk), unit(reward))
}

/// riskTolerance · (0.8 впереди по stocks / 1.3 позади / 1.0)
pub fn effective_tolerance(memory: &AgentMemory) -> f32 {
    let factor = match memory.stock_advantage {
        s if s > 0 => 0.8,
        s if s < 0 => 1.3,
        _ => 1.0,
    };
    unit(memory.risk_tolerance * factor)
}

/// Score без noise: base · (1 − risk·(1 − tolerance)) · (0.5 + 0.5·reward)
pub fn score_candidates(
    memory: &AgentMemory,
    view: &FrameView,
    tuning: &AiTuning,
    candidates: &[(BehavioralState, f32)],
) -> Vec<Candidate> {
    let tolerance = effective_tolerance(memory);
    candidates
        .iter()
        .map(|&(state, base_priority)| {
            let (risk, reward) = risk_reward(state, memory, view, tuning);
            Candidate {
                state,
                base_priority,
                risk,
                reward,
                score: base_priority * (1.0 - risk * (1.0 - tolerance)) * (0.5 + 0.5 * reward),
            }
        })
        .collect()
}

// ============================================================================
// 4. Noise + 5. Selection
// ============================================================================

/// Независимый noise на каждый кандидат
pub fn apply_noise(
    candidates: &mut [Candidate],
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) {
    let amplitude = (1.0 - profile.decision_quality) * tuning.noise_scale;
    if amplitude <= 0.0 {
        return;
    }
    for candidate in candidates.iter_mut() {
        candidate.score += amplitude * rng.gen_range(-1.0f32..=1.0);
    }
}

/// Строго наибольший score; ties оставляют первого; нет score > 0 → None
pub fn select(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        if candidate.score <= 0.0 || candidate.score.is_nan() {
            continue;
        }
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Полный decision pass
pub fn decide(
    memory: &mut AgentMemory,
    view: &FrameView,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) -> Decision {
    let previous = memory.current_state();
    if !should_reevaluate(memory, profile, tuning, rng) {
        return Decision {
            previous,
            next: previous,
            reevaluated: false,
        };
    }

    let candidates = generate_candidates(memory, view, tuning);
    let mut scored = score_candidates(memory, view, tuning, &candidates);
    apply_noise(&mut scored, profile, tuning, rng);

    let (next, reward) = match select(&scored) {
        Some(best) => (best.state, best.reward),
        None => {
            let (_, reward) = risk_reward(BehavioralState::Neutral, memory, view, tuning);
            (BehavioralState::Neutral, reward)
        }
    };

    // Кандидат COMBO, который не выбрали, не должен оставлять sequence
    if next != BehavioralState::Combo && previous != BehavioralState::Combo {
        memory.combo.clear();
    }

    memory.expected_reward = reward;
    memory.transition_to(next);

    Decision {
        previous,
        next,
        reevaluated: true,
    }
}
