//! EDGE_GUARD / LEDGE_TRAP handlers.
//!
//! Встаём у спорного края, предсказываем опцию оппонента по tendencies
//! и выбираем counter в пределах tolerance window.

use rand::Rng;

use super::Executor;
use crate::ai::components::Tendencies;
use crate::components::{ActionRequest, AttackId, Facing};

/// Отступ позиции edge-guard внутрь от края
const EDGE_GUARD_INSET: f32 = 20.0;
/// Отступ позиции ledge-trap внутрь от края (вне досягаемости getup attack)
const LEDGE_TRAP_INSET: f32 = 45.0;

/// Ожидаемая опция оппонента у края
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetupPrediction {
    Roll,
    Jump,
    Attack,
    Neutral,
}

/// favors-ground → roll, favors-aerial → jump, high aggression → attack, иначе neutral
pub fn predict_getup(tendencies: &Tendencies) -> GetupPrediction {
    if tendencies.favors_ground {
        GetupPrediction::Roll
    } else if tendencies.favors_aerial {
        GetupPrediction::Jump
    } else if tendencies.aggression_level > 0.7 {
        GetupPrediction::Attack
    } else {
        GetupPrediction::Neutral
    }
}

impl<R: Rng> Executor<'_, R> {
    /// X спорного края и знак "внутрь stage" от него
    fn contested_edge(&self) -> Option<(f32, f32)> {
        let main = self.view.main_platform()?;
        let edge = main.nearest_edge_x(self.view.opponent.position.x);
        let inward = if edge <= main.center_x() { 1.0 } else { -1.0 };
        Some((edge, inward))
    }

    /// Дойти до guard позиции. Returns true если уже в tolerance window.
    fn hold_edge_position(&mut self, inset: f32) -> bool {
        let Some((edge, inward)) = self.contested_edge() else {
            return false;
        };
        let guard_x = edge + inward * inset;
        let tolerance = self.tuning.edge_guard_tolerance;
        if (self.view.me.position.x - guard_x).abs() > tolerance {
            self.move_toward_x(guard_x, tolerance * 0.5);
            return false;
        }
        // Лицом к краю
        let outward = if inward > 0.0 { Facing::Left } else { Facing::Right };
        if self.view.me.facing != outward {
            self.push(ActionRequest::Face(outward));
        }
        true
    }

    fn counter(&mut self, prediction: GetupPrediction) {
        let opponent = self.view.opponent;
        let distance = self.view.distance();
        match prediction {
            GetupPrediction::Roll => {
                // Smash charge туда, где закончится roll
                if let Some((_, inward)) = self.contested_edge() {
                    let facing = if inward > 0.0 { Facing::Right } else { Facing::Left };
                    if self.view.me.facing != facing {
                        self.push(ActionRequest::Face(facing));
                    }
                }
                if self.view.me.grounded {
                    let charge = 0.3 + 0.5 * self.profile.execution_precision;
                    self.commit(ActionRequest::smash(AttackId::ForwardSmash, charge));
                } else {
                    self.commit(ActionRequest::attack(AttackId::ForwardAir));
                }
            }
            GetupPrediction::Jump => {
                // Перехват в воздухе
                if opponent.position.y > self.view.me.position.y + self.tuning.vertical_deadband {
                    if self.view.me.grounded {
                        self.push(ActionRequest::Jump);
                    }
                    self.commit(ActionRequest::attack(AttackId::UpAir));
                } else if distance < self.tuning.close_range {
                    self.commit(ActionRequest::attack(AttackId::ForwardAir));
                }
            }
            GetupPrediction::Attack => {
                // Shield, затем grab после атаки
                if opponent.is_attacking && !opponent.is_in_endlag(self.tuning.punish_window) {
                    self.hold_shield(6);
                } else if opponent.is_in_endlag(self.tuning.punish_window) && distance <= 40.0 {
                    self.commit(ActionRequest::attack(AttackId::Grab));
                } else {
                    self.hold_shield(4);
                }
            }
            GetupPrediction::Neutral => {
                // Timed jab/grab
                let cadence = u64::from(self.tuning.combo_step_interval.max(1));
                let timed = self.memory.frame % cadence == 0;
                if distance <= 35.0 && timed {
                    self.commit(ActionRequest::attack(AttackId::Grab));
                } else if distance <= 50.0 && timed {
                    self.commit(ActionRequest::attack(AttackId::Jab));
                }
            }
        }
    }

    pub(super) fn edge_guard(&mut self) {
        if !self.hold_edge_position(EDGE_GUARD_INSET) {
            return;
        }

        let opponent = self.view.opponent;
        let Some(main) = self.view.main_platform() else {
            return;
        };
        // Оппонент ниже stage и рядом: spike / перехват
        let below_stage = opponent.position.y < main.top - self.tuning.vertical_deadband;
        let in_reach = self.view.distance() < self.tuning.close_range * 1.5;
        if below_stage && in_reach && self.chance(self.profile.execution_precision) {
            self.push(ActionRequest::Jump);
            let toward = self.view.toward_opponent();
            self.plan.push_opt(ActionRequest::move_toward(0.0, toward, 0.0));
            self.commit(ActionRequest::attack(AttackId::DownAir));
            return;
        }

        if self.view.distance() < self.tuning.moderate_range {
            let prediction = predict_getup(&self.memory.tendencies);
            self.counter(prediction);
        }
    }

    pub(super) fn ledge_trap(&mut self) {
        if !self.hold_edge_position(LEDGE_TRAP_INSET) {
            return;
        }
        let prediction = predict_getup(&self.memory.tendencies);
        if self.view.distance() < self.tuning.moderate_range {
            self.counter(prediction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_priority() {
        let mut tendencies = Tendencies {
            favors_ground: true,
            favors_aerial: true,
            aggression_level: 0.9,
            ..Default::default()
        };
        assert_eq!(predict_getup(&tendencies), GetupPrediction::Roll);
        tendencies.favors_ground = false;
        assert_eq!(predict_getup(&tendencies), GetupPrediction::Jump);
        tendencies.favors_aerial = false;
        assert_eq!(predict_getup(&tendencies), GetupPrediction::Attack);
        tendencies.aggression_level = 0.2;
        assert_eq!(predict_getup(&tendencies), GetupPrediction::Neutral);
    }
}
