//! COMBO handler: исполнение шагов активной combo.

use rand::Rng;

use super::Executor;
use crate::ai::combo::{advance_combo, ComboStep};
use crate::components::{ActionRequest, AttackId};

impl<R: Rng> Executor<'_, R> {
    pub(super) fn combo(&mut self) {
        let ready = self.can_commit();
        let step = advance_combo(self.memory, self.view.me, self.view.opponent, self.tuning, ready);

        match step {
            ComboStep::Reposition { target, next } => {
                let me = self.view.me;
                let tolerance = self.tuning.combo_position_tolerance;
                self.move_toward_x(target.x, tolerance * 0.5);
                if next.is_aerial() {
                    if me.grounded && target.y > me.position.y + self.tuning.vertical_deadband {
                        self.push(ActionRequest::Jump);
                    } else if !me.grounded && target.y < me.position.y - tolerance {
                        self.push(ActionRequest::FastFall);
                    }
                }
            }
            ComboStep::Strike(attack) => {
                self.face_opponent();
                if attack.is_aerial() && self.view.me.grounded {
                    self.push(ActionRequest::Jump);
                }
                if attack.is_throw() && !self.view.me.holding_opponent {
                    // Throw-шаг без захвата: сначала grab, сам throw бросает grab_follow_up
                    let combo = &mut self.memory.combo;
                    combo.combo_counter = combo.combo_counter.saturating_sub(1);
                    self.commit(ActionRequest::attack(AttackId::Grab));
                    return;
                }
                let request = if attack.is_smash() {
                    ActionRequest::smash(attack, 0.0)
                } else {
                    ActionRequest::attack(attack)
                };
                self.commit(request);
            }
            ComboStep::Finished { .. } | ComboStep::Abandoned => {
                let outcome = if matches!(step, ComboStep::Abandoned) {
                    "abandoned"
                } else {
                    "finished"
                };
                crate::logger::log(&format!(
                    "AI frame {}: combo {} at step {}/{}",
                    self.memory.frame,
                    outcome,
                    self.memory.combo.combo_counter,
                    self.memory.combo.sequence.len()
                ));
                if let Some(state) = step.exit_state() {
                    self.request_transition(state);
                }
            }
        }
    }
}
