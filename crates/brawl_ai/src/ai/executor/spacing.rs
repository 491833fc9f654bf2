//! Spacing handlers: NEUTRAL, RETREAT, PRESSURE, BAIT, PUNISH.
//!
//! Держат целевую дистанцию, подмешивают low-commit действия
//! (dash-dance, empty hop, короткий shield) на jittered cadence и
//! эскалируют в ATTACK/DEFEND/PUNISH по триггерам.

use rand::Rng;

use super::attack::{choose_attack, AttackContext};
use super::Executor;
use crate::ai::components::BehavioralState;
use crate::components::{ActionRequest, AttackId};

/// Frames короткого shield в low-commit
const LOW_COMMIT_SHIELD_FRAMES: u32 = 4;

impl<R: Rng> Executor<'_, R> {
    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Одно направление dash-dance; направление чередуется каждый вызов
    pub(super) fn dash_dance(&mut self, toward: f32) {
        let scratch = &mut self.memory.scratch;
        scratch.dash_dance_sign = -scratch.dash_dance_sign;
        let request = if scratch.dash_dance_sign * toward >= 0.0 {
            ActionRequest::MoveRight
        } else {
            ActionRequest::MoveLeft
        };
        self.push(request);
    }

    /// Low-commit действие на cadence low_commit_interval + jitter.
    /// Returns true если действие выполнено в этом frame.
    fn low_commit(&mut self) -> bool {
        let frame = self.memory.frame;
        if frame < self.memory.scratch.next_low_commit_frame {
            return false;
        }
        let jitter = self.rng.gen_range(0..=self.tuning.low_commit_jitter);
        self.memory.scratch.next_low_commit_frame =
            frame + u64::from(self.tuning.low_commit_interval) + u64::from(jitter);

        let toward = self.view.toward_opponent();
        // В воздухе только drift: ни hop, ни shield
        let options = if self.view.me.grounded { 3u8 } else { 1 };
        match self.rng.gen_range(0..options) {
            0 => self.dash_dance(toward),
            1 => self.push(ActionRequest::Jump),
            _ => self.hold_shield(LOW_COMMIT_SHIELD_FRAMES),
        }
        true
    }

    /// Держать дистанцию `spacing` от оппонента (в пределах main platform)
    fn keep_spacing(&mut self, spacing: f32) {
        let toward = self.view.toward_opponent();
        let mut target = self.view.opponent.position.x - toward * spacing;
        if let Some(main) = self.view.main_platform() {
            let margin = main.width() * self.tuning.edge_zone_fraction * 0.5;
            target = target.clamp(main.left + margin, main.right - margin);
        }
        self.move_toward_x(target, self.tuning.spacing_tolerance);
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    pub(super) fn neutral(&mut self) {
        self.face_opponent();
        if self.low_commit() {
            return;
        }

        // Контроль центра, если он важен
        if self.memory.center_control_importance > 0.5 {
            let center = self.view.stage_center_x();
            let toward_center = center - self.view.me.position.x;
            let between = (self.view.opponent.position.x - center) * toward_center <= 0.0;
            if between || self.view.distance() > self.tuning.optimal_spacing * 2.0 {
                self.move_toward_x(center, self.tuning.spacing_tolerance);
                return;
            }
        }
        if self.view.distance() < self.tuning.optimal_spacing {
            self.keep_spacing(self.tuning.optimal_spacing);
        }
    }

    pub(super) fn retreat(&mut self) {
        if self.opponent_threatening() {
            self.request_transition(BehavioralState::Defend);
            return;
        }

        // Зажаты у края, оппонент рядом → отбиваемся
        let cornered =
            self.memory.zones.near_edge() && self.view.distance() < self.tuning.close_range;
        if cornered {
            self.request_transition(BehavioralState::Attack);
            return;
        }

        self.face_opponent();
        if self.low_commit() {
            return;
        }
        self.keep_spacing(self.tuning.retreat_spacing);
    }

    pub(super) fn pressure(&mut self) {
        if self.opponent_threatening() {
            self.request_transition(BehavioralState::Defend);
            return;
        }
        self.face_opponent();

        let distance = self.view.distance();
        let in_band = distance <= self.tuning.pressure_spacing + self.tuning.spacing_tolerance;
        if in_band && self.can_commit() {
            let attack = if self.view.opponent.is_shielding {
                AttackId::Grab
            } else if self.chance(0.5) {
                AttackId::Jab
            } else {
                AttackId::DownTilt
            };
            self.commit(ActionRequest::attack(attack));
            return;
        }
        if self.low_commit() {
            return;
        }
        self.keep_spacing(self.tuning.pressure_spacing);
    }

    pub(super) fn bait(&mut self) {
        let opponent = self.view.opponent;
        if opponent.is_in_endlag(self.tuning.punish_window) {
            // Оппонент промахнулся
            self.request_transition(BehavioralState::Punish);
            return;
        }
        if self.opponent_threatening() {
            self.request_transition(BehavioralState::Defend);
            return;
        }

        self.face_opponent();
        if self.low_commit() {
            return;
        }
        self.keep_spacing(self.tuning.bait_spacing);
    }

    pub(super) fn punish(&mut self) {
        let opponent = self.view.opponent;
        if !opponent.is_in_endlag(self.tuning.punish_window) {
            // Окно закрылось
            self.request_transition(BehavioralState::Neutral);
            return;
        }

        self.face_opponent();
        let distance = self.view.distance();
        if distance > self.tuning.close_range {
            self.move_toward_x(opponent.position.x, self.tuning.optimal_spacing * 0.5);
            return;
        }

        let ctx = AttackContext::from_view(&self.view, self.tuning.punish_window);
        let grounded_exchange = !ctx.self_airborne && !ctx.opponent_airborne;
        let below_kill = ctx.opponent_damage < self.tuning.high_damage;
        let attack = if ctx.dx <= 35.0 && grounded_exchange && below_kill {
            AttackId::Grab
        } else {
            choose_attack(
                &ctx,
                self.profile.execution_precision,
                self.tuning.close_range,
                &mut *self.rng,
            )
        };
        let request = if attack.is_smash() {
            ActionRequest::smash(attack, 0.0)
        } else {
            ActionRequest::attack(attack)
        };
        self.commit(request);
    }
}
