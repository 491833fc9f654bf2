//! ThreatAndZoneAssessor: мгновенная оценка угрозы и позиционных зон.
//!
//! Запускается каждый frame до decision. Пишет в AgentMemory:
//! threat_level ∈ [0, 1], zone flags, stock/damage advantage, center control.

use bevy::prelude::*;
use rand::Rng;

use super::components::{AgentMemory, AiTuning, DifficultyProfile, ZoneFlags};
use crate::components::{ActionKind, CombatantSnapshot, StageGeometry};

// ============================================================================
// Weights
// ============================================================================

const DISTANCE_WEIGHT: f32 = 0.3;
const ATTACK_WEIGHT: f32 = 0.4;
const DAMAGE_WEIGHT: f32 = 0.2;
const POSITION_WEIGHT: f32 = 0.1;

/// Clamp в [0, 1]; NaN → 0
pub fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Off-stage классификация позиции.
///
/// Off-stage = (НЕ над main platform в пределах above-margin И за строгим
/// edge-margin по горизонтали) ИЛИ в пределах blast inset.
pub fn is_offstage(position: Vec2, stage: &StageGeometry, tuning: &AiTuning) -> bool {
    let near_blast = stage
        .blast_zone()
        .is_within_inset(position, tuning.blast_inset);

    let Some(main) = stage.main_platform() else {
        return near_blast;
    };

    let above_stage = position.x >= main.left - tuning.offstage_above_margin
        && position.x <= main.right + tuning.offstage_above_margin
        && position.y >= main.top;
    let beyond_edges = position.x < main.left - tuning.offstage_edge_margin
        || position.x > main.right + tuning.offstage_edge_margin;

    (!above_stage && beyond_edges) || near_blast
}

/// Startup / active / endlag envelope по доле прошедших frames.
///
/// Ramp 0→1 на первых 20%, плато до 60%, ramp 1→0 до конца.
pub fn attack_envelope(progress: f32) -> f32 {
    let p = unit(progress);
    if p < 0.2 {
        p / 0.2
    } else if p <= 0.6 {
        1.0
    } else {
        (1.0 - p) / 0.4
    }
}

fn distance_threat(me: &CombatantSnapshot, opponent: &CombatantSnapshot, tuning: &AiTuning) -> f32 {
    if tuning.threat_range <= 0.0 {
        return 0.0;
    }
    unit(1.0 - me.position.distance(opponent.position) / tuning.threat_range)
}

fn attack_threat(opponent: &CombatantSnapshot) -> f32 {
    match (opponent.attack, opponent.attack_progress()) {
        (Some(attack), Some(progress)) => {
            attack.category().base_threat() * attack_envelope(progress)
        }
        _ => 0.0,
    }
}

fn damage_threat(opponent: &CombatantSnapshot, stock_advantage: i32, tuning: &AiTuning) -> f32 {
    let ceiling = if stock_advantage < 0 {
        tuning.damage_ceiling_behind
    } else {
        tuning.damage_ceiling
    };
    if ceiling <= 0.0 {
        return 0.0;
    }
    unit(opponent.damage / ceiling)
}

fn position_threat(
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    zones: &ZoneFlags,
    stage: &StageGeometry,
) -> f32 {
    if zones.self_offstage {
        return 1.0;
    }
    if zones.near_edge() {
        let center = stage.main_platform().map_or(0.0, |p| p.center_x());
        let cornered = (opponent.position.x - center).abs() < (me.position.x - center).abs();
        return if cornered { 0.8 } else { 0.5 };
    }
    0.1
}

/// Threat level: 0.3·distance + 0.4·attack + 0.2·damage + 0.1·position + noise(1 - dq)
#[allow(clippy::too_many_arguments)]
pub fn threat_level(
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    zones: &ZoneFlags,
    stock_advantage: i32,
    stage: &StageGeometry,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) -> f32 {
    let raw = DISTANCE_WEIGHT * distance_threat(me, opponent, tuning)
        + ATTACK_WEIGHT * attack_threat(opponent)
        + DAMAGE_WEIGHT * damage_threat(opponent, stock_advantage, tuning)
        + POSITION_WEIGHT * position_threat(me, opponent, zones, stage);

    let noise =
        tuning.threat_noise * (1.0 - profile.decision_quality) * rng.gen_range(-1.0f32..=1.0);
    unit(raw + noise)
}

/// Позиционные флаги self/opponent относительно main platform
pub fn zone_flags(
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    stage: &StageGeometry,
    tuning: &AiTuning,
) -> ZoneFlags {
    let self_offstage = is_offstage(me.position, stage, tuning);
    let opponent_offstage = is_offstage(opponent.position, stage, tuning);

    let dy = me.position.y - opponent.position.y;
    let mut zones = ZoneFlags {
        above_opponent: dy > tuning.vertical_deadband,
        below_opponent: -dy > tuning.vertical_deadband,
        self_offstage,
        opponent_offstage,
        ..Default::default()
    };

    let Some(main) = stage.main_platform() else {
        return zones;
    };

    let edge_zone = main.width() * tuning.edge_zone_fraction;
    zones.near_left_edge = me.position.x < main.left + edge_zone;
    zones.near_right_edge = me.position.x > main.right - edge_zone;
    zones.opponent_near_center = (opponent.position.x - main.center_x()).abs() < edge_zone;

    let hugging_edge = (opponent.position.x - main.nearest_edge_x(opponent.position.x)).abs()
        <= tuning.ledge_hug_distance
        && opponent.position.y <= main.top + tuning.ledge_hug_distance;
    zones.opponent_hugging_ledge =
        !opponent_offstage && (opponent.action == ActionKind::LedgeHang || hugging_edge);

    zones
}

/// Важность контроля центра: 0.3 база, +0.3 у края, +0.2 при отставании по stocks,
/// +0.2 если оппонент держит центр
pub fn center_control_importance(zones: &ZoneFlags, stock_advantage: i32) -> f32 {
    let mut importance = 0.3;
    if zones.near_edge() {
        importance += 0.3;
    }
    if stock_advantage < 0 {
        importance += 0.2;
    }
    if zones.opponent_near_center {
        importance += 0.2;
    }
    unit(importance)
}

/// Полная оценка frame → AgentMemory
pub fn assess_frame(
    memory: &mut AgentMemory,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    stage: &StageGeometry,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) {
    memory.stock_advantage = i32::from(me.stocks) - i32::from(opponent.stocks);
    memory.damage_advantage = opponent.damage - me.damage;

    let zones = zone_flags(me, opponent, stage, tuning);
    memory.threat_level = threat_level(
        me,
        opponent,
        &zones,
        memory.stock_advantage,
        stage,
        profile,
        tuning,
        rng,
    );
    memory.center_control_importance = center_control_importance(&zones, memory.stock_advantage);
    memory.zones = zones;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AttackId;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tuning() -> AiTuning {
        AiTuning::default()
    }

    #[test]
    fn test_above_main_platform_is_onstage() {
        let stage = StageGeometry::battlefield();
        assert!(!is_offstage(Vec2::new(0.0, 10.0), &stage, &tuning()));
        assert!(!is_offstage(Vec2::new(290.0, 400.0), &stage, &tuning()));
        // Над краем в пределах above margin
        assert!(!is_offstage(Vec2::new(320.0, 50.0), &stage, &tuning()));
    }

    #[test]
    fn test_beyond_edge_is_offstage() {
        let stage = StageGeometry::battlefield();
        assert!(is_offstage(Vec2::new(360.0, -40.0), &stage, &tuning()));
        assert!(is_offstage(Vec2::new(-360.0, 20.0), &stage, &tuning()));
        // Под краем, но в пределах edge margin: ещё на stage
        assert!(!is_offstage(Vec2::new(305.0, -40.0), &stage, &tuning()));
    }

    #[test]
    fn test_blast_inset_is_offstage() {
        let stage = StageGeometry::battlefield();
        assert!(is_offstage(Vec2::new(0.0, 780.0), &stage, &tuning()));
    }

    #[test]
    fn test_envelope_shape() {
        assert_eq!(attack_envelope(0.0), 0.0);
        assert!((attack_envelope(0.1) - 0.5).abs() < 1e-6);
        assert_eq!(attack_envelope(0.4), 1.0);
        assert!(attack_envelope(0.9) < 0.5);
        assert_eq!(attack_envelope(1.0), 0.0);
    }

    #[test]
    fn test_smash_midswing_raises_threat() {
        let stage = StageGeometry::battlefield();
        let profile = DifficultyProfile::preset(crate::ai::components::DifficultyLevel::Expert);
        let me = CombatantSnapshot::at(Vec2::new(0.0, 0.0));
        let idle = CombatantSnapshot::at(Vec2::new(50.0, 0.0));
        let smashing = idle.clone().with_attack(AttackId::ForwardSmash, 10, 25);
        let zones = zone_flags(&me, &idle, &stage, &tuning());

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let calm = threat_level(&me, &idle, &zones, 0, &stage, &profile, &tuning(), &mut rng);
        let danger = threat_level(&me, &smashing, &zones, 0, &stage, &profile, &tuning(), &mut rng);
        assert!(danger > calm + 0.2);
    }

    #[test]
    fn test_center_control_importance() {
        let zones = ZoneFlags {
            near_left_edge: true,
            opponent_near_center: true,
            ..Default::default()
        };
        assert!((center_control_importance(&zones, -1) - 1.0).abs() < 1e-6);
        assert!((center_control_importance(&ZoneFlags::default(), 0) - 0.3).abs() < 1e-6);
    }

    proptest! {
        /// Property: threat всегда в [0, 1] при экстремальных входах
        #[test]
        fn prop_threat_clamped(
            damage in 0.0f32..999.0,
            x in -10_000.0f32..10_000.0,
            y in -10_000.0f32..10_000.0,
            elapsed in 0u32..200,
            total in 0u32..200,
            seed in any::<u64>(),
            difficulty in 0.0f32..=1.0,
        ) {
            let stage = StageGeometry::battlefield();
            let profile = DifficultyProfile::interpolated(difficulty);
            let me = CombatantSnapshot::at(Vec2::new(x, y));
            let mut opponent = CombatantSnapshot::at(Vec2::ZERO)
                .with_attack(AttackId::UpSmash, elapsed, total);
            opponent.damage = damage;
            let zones = zone_flags(&me, &opponent, &stage, &tuning());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let threat = threat_level(
                &me,
                &opponent,
                &zones,
                -2,
                &stage,
                &profile,
                &tuning(),
                &mut rng,
            );
            prop_assert!((0.0..=1.0).contains(&threat));
        }

        /// Property: над main platform (вне blast inset): никогда не off-stage
        #[test]
        fn prop_above_platform_never_offstage(x in -300.0f32..=300.0, y in 0.0f32..700.0) {
            let stage = StageGeometry::battlefield();
            prop_assert!(!is_offstage(Vec2::new(x, y), &stage, &tuning()));
        }

        /// Property: за обоими margins по горизонтали: всегда off-stage
        #[test]
        fn prop_beyond_margin_always_offstage(
            dx in 31.0f32..500.0,
            y in -550.0f32..750.0,
            left in any::<bool>(),
        ) {
            let stage = StageGeometry::battlefield();
            let x = if left { -300.0 - dx } else { 300.0 + dx };
            prop_assert!(is_offstage(Vec2::new(x, y), &stage, &tuning()));
        }
    }
}
