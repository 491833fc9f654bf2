//! DEFEND handler: shield / spot-dodge / roll / jump-away + air-dodge.
//!
//! Действует только пока оппонент атакует или хватает.

use bevy::prelude::*;
use rand::Rng;

use super::Executor;
use crate::ai::components::BehavioralState;
use crate::components::ActionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefenseOption {
    Shield,
    SpotDodge,
    RollAway,
    JumpAway,
}

impl<R: Rng> Executor<'_, R> {
    pub(super) fn defend(&mut self) {
        let opponent = self.view.opponent;
        if !opponent.is_attacking && !opponent.is_grabbing {
            self.release_shield();
            return;
        }
        if opponent.is_in_endlag(self.tuning.punish_window) {
            self.release_shield();
            self.request_transition(BehavioralState::Punish);
            return;
        }

        self.face_opponent();
        let away = -self.view.toward_opponent();

        if self.view.me.is_airborne() {
            self.commit(ActionRequest::AirDodge {
                direction: Vec2::new(away, 0.3).normalize_or_zero(),
            });
            return;
        }

        match self.pick_defense() {
            DefenseOption::Shield => self.hold_shield(8),
            DefenseOption::SpotDodge => {
                self.commit(ActionRequest::SpotDodge);
            }
            DefenseOption::RollAway => {
                // Лицом к оппоненту: BackDodge = прочь
                self.commit(ActionRequest::BackDodge);
            }
            DefenseOption::JumpAway => {
                self.push(ActionRequest::Jump);
                self.plan.push_opt(ActionRequest::move_toward(0.0, away, 0.0));
                self.commit(ActionRequest::AirDodge {
                    direction: Vec2::new(away, 0.5).normalize_or_zero(),
                });
            }
        }
    }

    /// Взвешенный выбор защиты: precision и близость
    fn pick_defense(&mut self) -> DefenseOption {
        let precision = self.profile.execution_precision;
        let proximity = 1.0 - (self.view.distance() / self.tuning.close_range).clamp(0.0, 1.0);
        let grabbed_at = self.view.opponent.is_grabbing;
        let back_to_edge = self.memory.zones.near_edge();

        let weights = [
            (
                DefenseOption::Shield,
                if grabbed_at { 0.1 } else { 1.0 + self.view.me.shield_health },
            ),
            (DefenseOption::SpotDodge, precision * (0.3 + proximity)),
            (
                DefenseOption::RollAway,
                if back_to_edge { 0.05 } else { precision * 0.8 },
            ),
            (DefenseOption::JumpAway, 0.5 * (1.0 - proximity) + if grabbed_at { 0.5 } else { 0.0 }),
        ];

        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return DefenseOption::Shield;
        }
        let mut roll = self.rng.gen::<f32>() * total;
        for (option, weight) in weights {
            if roll < weight {
                return option;
            }
            roll -= weight;
        }
        DefenseOption::Shield
    }
}
