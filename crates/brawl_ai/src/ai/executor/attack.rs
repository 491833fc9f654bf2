//! ATTACK handler: utility-scored выбор атаки.
//!
//! Закрытый набор AttackOption, у каждого utility(context) и is_viable(context).
//! Viable опции сортируются по utility, при низкой execution_precision
//! возможна подмена на одну из top-3 (imperfect execution).

use rand::Rng;

use super::Executor;
use crate::ai::assess::unit;
use crate::ai::frame::FrameView;
use crate::components::{ActionRequest, AttackId};

// ============================================================================
// Step 1: Context
// ============================================================================

/// Геометрия и состояние оппонента, по которым считается utility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackContext {
    pub distance: f32,
    /// Горизонтальная дистанция (abs)
    pub dx: f32,
    /// Opponent.y - self.y
    pub dy: f32,
    pub opponent_damage: f32,
    pub opponent_shielding: bool,
    pub opponent_airborne: bool,
    pub opponent_in_endlag: bool,
    pub self_airborne: bool,
}

impl AttackContext {
    pub fn from_view(view: &FrameView, punish_window: f32) -> Self {
        let relative = view.relative();
        Self {
            distance: view.distance(),
            dx: relative.x.abs(),
            dy: relative.y,
            opponent_damage: view.opponent.damage,
            opponent_shielding: view.opponent.is_shielding,
            opponent_airborne: view.opponent.is_airborne(),
            opponent_in_endlag: view.opponent.is_in_endlag(punish_window),
            self_airborne: view.me.is_airborne(),
        }
    }

    fn kill_factor(&self) -> f32 {
        unit(self.opponent_damage / 120.0)
    }
}

// ============================================================================
// Step 2: Options
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOption {
    Jab,
    ForwardTilt,
    UpTilt,
    DownTilt,
    DashAttack,
    ForwardSmash,
    UpSmash,
    DownSmash,
    Grab,
    NeutralAir,
    ForwardAir,
    BackAir,
    UpAir,
    DownAir,
}

impl AttackOption {
    pub const ALL: [AttackOption; 14] = [
        AttackOption::Jab,
        AttackOption::ForwardTilt,
        AttackOption::UpTilt,
        AttackOption::DownTilt,
        AttackOption::DashAttack,
        AttackOption::ForwardSmash,
        AttackOption::UpSmash,
        AttackOption::DownSmash,
        AttackOption::Grab,
        AttackOption::NeutralAir,
        AttackOption::ForwardAir,
        AttackOption::BackAir,
        AttackOption::UpAir,
        AttackOption::DownAir,
    ];

    pub fn attack_id(self) -> AttackId {
        match self {
            AttackOption::Jab => AttackId::Jab,
            AttackOption::ForwardTilt => AttackId::ForwardTilt,
            AttackOption::UpTilt => AttackId::UpTilt,
            AttackOption::DownTilt => AttackId::DownTilt,
            AttackOption::DashAttack => AttackId::DashAttack,
            AttackOption::ForwardSmash => AttackId::ForwardSmash,
            AttackOption::UpSmash => AttackId::UpSmash,
            AttackOption::DownSmash => AttackId::DownSmash,
            AttackOption::Grab => AttackId::Grab,
            AttackOption::NeutralAir => AttackId::NeutralAir,
            AttackOption::ForwardAir => AttackId::ForwardAir,
            AttackOption::BackAir => AttackId::BackAir,
            AttackOption::UpAir => AttackId::UpAir,
            AttackOption::DownAir => AttackId::DownAir,
        }
    }

    /// Range/airborne preconditions
    pub fn is_viable(self, ctx: &AttackContext) -> bool {
        let grounded = !ctx.self_airborne;
        let level = ctx.dy.abs() < 25.0;
        match self {
            AttackOption::Jab => grounded && level && ctx.dx <= 35.0,
            AttackOption::ForwardTilt => grounded && level && ctx.dx <= 55.0,
            AttackOption::UpTilt => grounded && ctx.dx <= 30.0 && ctx.dy > 10.0 && ctx.dy < 90.0,
            AttackOption::DownTilt => grounded && level && ctx.dx <= 50.0,
            AttackOption::DashAttack => grounded && level && (40.0..=120.0).contains(&ctx.dx),
            AttackOption::ForwardSmash => grounded && level && ctx.dx <= 60.0,
            AttackOption::UpSmash => grounded && ctx.dx <= 35.0 && ctx.dy > -10.0 && ctx.dy < 110.0,
            AttackOption::DownSmash => grounded && level && ctx.dx <= 45.0,
            AttackOption::Grab => grounded && level && ctx.dx <= 35.0 && !ctx.opponent_airborne,
            AttackOption::NeutralAir => ctx.self_airborne && ctx.distance <= 40.0,
            AttackOption::ForwardAir => ctx.self_airborne && ctx.dx <= 55.0 && ctx.dy.abs() < 40.0,
            AttackOption::BackAir => ctx.self_airborne && ctx.dx <= 55.0 && ctx.dy.abs() < 35.0,
            AttackOption::UpAir => ctx.self_airborne && ctx.dx <= 35.0 && ctx.dy > 15.0,
            AttackOption::DownAir => ctx.self_airborne && ctx.dx <= 35.0 && ctx.dy < -15.0,
        }
    }

    /// Utility 0..~1.5 (выше = лучше)
    pub fn utility(self, ctx: &AttackContext) -> f32 {
        let kill = ctx.kill_factor();
        let endlag_bonus = if ctx.opponent_in_endlag { 0.3 } else { 0.0 };
        let shield_penalty = if ctx.opponent_shielding { 0.4 } else { 0.0 };
        let base = match self {
            AttackOption::Jab => 0.55 + 0.2 * (1.0 - ctx.dx / 35.0),
            AttackOption::ForwardTilt => 0.5 + 0.2 * unit(ctx.dx / 55.0),
            AttackOption::UpTilt => 0.55 + 0.25 * (1.0 - kill),
            AttackOption::DownTilt => 0.5 + 0.2 * (1.0 - kill),
            AttackOption::DashAttack => 0.4 + 0.2 * unit(ctx.dx / 120.0),
            AttackOption::ForwardSmash => 0.3 + 0.7 * kill + endlag_bonus,
            AttackOption::UpSmash => {
                0.3 + 0.6 * kill + if ctx.opponent_airborne { 0.2 } else { 0.0 }
            }
            AttackOption::DownSmash => 0.25 + 0.6 * kill + endlag_bonus,
            AttackOption::Grab => 0.45 + if ctx.opponent_shielding { 0.8 } else { 0.0 },
            AttackOption::NeutralAir => 0.6,
            AttackOption::ForwardAir => 0.55 + 0.2 * kill,
            AttackOption::BackAir => 0.5 + 0.3 * kill,
            AttackOption::UpAir => 0.5 + 0.25 * (1.0 - kill),
            AttackOption::DownAir => 0.4 + 0.4 * kill,
        };
        match self {
            AttackOption::Grab => base,
            _ => base - shield_penalty,
        }
    }
}

/// Viable опции по убыванию utility (stable: при равенстве порядок ALL)
pub fn ranked_options(ctx: &AttackContext) -> Vec<(AttackOption, f32)> {
    let mut ranked: Vec<(AttackOption, f32)> = AttackOption::ALL
        .iter()
        .filter(|option| option.is_viable(ctx))
        .map(|option| (*option, option.utility(ctx)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

// ============================================================================
// Step 3: Choose
// ============================================================================

/// Выбор атаки.
///
/// При низкой precision с вероятностью (1 - precision) берётся случайная из top-3.
/// Нет viable → jab на близкой дистанции, иначе neutral special.
pub fn choose_attack(
    ctx: &AttackContext,
    execution_precision: f32,
    close_range: f32,
    rng: &mut impl Rng,
) -> AttackId {
    let ranked = ranked_options(ctx);
    if ranked.is_empty() {
        return if ctx.distance <= close_range * 0.5 && !ctx.self_airborne {
            AttackId::Jab
        } else {
            AttackId::NeutralSpecial
        };
    }

    let top = ranked.len().min(3);
    let index = if top > 1 && rng.gen::<f32>() < 1.0 - execution_precision {
        rng.gen_range(0..top)
    } else {
        0
    };
    ranked[index].0.attack_id()
}

impl<R: Rng> Executor<'_, R> {
    pub(super) fn attack(&mut self) {
        self.face_opponent();

        if !self.can_commit() {
            return;
        }
        let distance = self.view.distance();
        if distance > self.tuning.close_range {
            // Вне досягаемости: сближаемся до optimal spacing
            let toward = self.view.toward_opponent();
            let target = self.view.opponent.position.x - toward * self.tuning.optimal_spacing * 0.5;
            self.move_toward_x(target, self.tuning.spacing_tolerance * 0.5);
            return;
        }

        let ctx = AttackContext::from_view(&self.view, self.tuning.punish_window);
        let attack = choose_attack(
            &ctx,
            self.profile.execution_precision,
            self.tuning.close_range,
            &mut *self.rng,
        );
        let request = if attack.is_smash() {
            // Charge: выше precision и damage → дольше
            let charge = self.profile.execution_precision * 0.6 * ctx.kill_factor();
            ActionRequest::smash(attack, charge)
        } else {
            ActionRequest::attack(attack)
        };
        self.commit(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grounded_ctx(dx: f32) -> AttackContext {
        AttackContext {
            distance: dx,
            dx,
            dy: 0.0,
            opponent_damage: 0.0,
            opponent_shielding: false,
            opponent_airborne: false,
            opponent_in_endlag: false,
            self_airborne: false,
        }
    }

    #[test]
    fn test_ranked_only_viable_and_sorted() {
        let ranked = ranked_options(&grounded_ctx(20.0));
        assert!(!ranked.is_empty());
        assert!(ranked.iter().all(|(option, _)| option.is_viable(&grounded_ctx(20.0))));
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(ranked.iter().all(|(option, _)| !option.attack_id().is_aerial()));
    }

    #[test]
    fn test_grab_beats_shield() {
        let mut ctx = grounded_ctx(25.0);
        ctx.opponent_shielding = true;
        assert_eq!(ranked_options(&ctx)[0].0, AttackOption::Grab);
    }

    #[test]
    fn test_smash_at_kill_percent() {
        let mut ctx = grounded_ctx(40.0);
        ctx.opponent_damage = 140.0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(choose_attack(&ctx, 1.0, 80.0, &mut rng).is_smash());
    }

    #[test]
    fn test_fallbacks() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // Нет viable: далеко
        assert_eq!(
            choose_attack(&grounded_ctx(200.0), 1.0, 80.0, &mut rng),
            AttackId::NeutralSpecial
        );

        let mut airborne_far = grounded_ctx(200.0);
        airborne_far.self_airborne = true;
        assert_eq!(choose_attack(&airborne_far, 1.0, 80.0, &mut rng), AttackId::NeutralSpecial);
    }

    #[test]
    fn test_low_precision_stays_in_top_three() {
        let ctx = grounded_ctx(30.0);
        let top: Vec<AttackId> = ranked_options(&ctx)
            .iter()
            .take(3)
            .map(|(o, _)| o.attack_id())
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let attack = choose_attack(&ctx, 0.0, 80.0, &mut rng);
            assert!(top.contains(&attack));
        }
    }
}
