//! APPROACH handler: сближение до optimal spacing.

use rand::Rng;

use super::Executor;
use crate::ai::components::BehavioralState;
use crate::components::{ActionRequest, AttackId};

impl<R: Rng> Executor<'_, R> {
    pub(super) fn approach(&mut self) {
        self.face_opponent();

        let tuning = self.tuning;
        let toward = self.view.toward_opponent();
        let gap = (self.view.opponent.position.x - self.view.me.position.x).abs();
        let spacing = tuning.optimal_spacing;

        // В spacing band → ATTACK с вероятностью execution_precision
        if (gap - spacing).abs() <= tuning.spacing_tolerance {
            if self.chance(self.profile.execution_precision) {
                self.request_transition(BehavioralState::Attack);
            }
            return;
        }

        if gap < spacing - tuning.spacing_tolerance {
            // Слишком близко: шаг назад
            let target = self.view.opponent.position.x - toward * spacing;
            self.move_toward_x(target, 0.0);
            return;
        }

        let tech = self.profile.tech_skill;
        let grounded = self.view.me.grounded;

        // Dash-dance на дальней дистанции
        if grounded && gap > tuning.moderate_range && self.chance(tech * 0.15) {
            self.dash_dance(toward);
            return;
        }

        // Short-hop aerial на подходе
        let mid_range = gap < tuning.moderate_range && gap > tuning.close_range;
        if grounded && mid_range && self.chance(tech * 0.1) && self.can_commit() {
            self.push(ActionRequest::Jump);
            self.move_toward_x(self.view.opponent.position.x, 0.0);
            self.commit(ActionRequest::attack(AttackId::ForwardAir));
            return;
        }

        let target = self.view.opponent.position.x - toward * spacing;
        self.move_toward_x(target, tuning.spacing_tolerance * 0.5);
    }
}
