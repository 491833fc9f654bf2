//! RECOVER handler: возврат на main platform.
//!
//! Цель по x выбирается раз на вход в RECOVER:
//! - низкий recovery_skill → центр stage с ошибкой (иногда overshoot)
//! - высокий → чуть внутри ближнего края
//!
//! Ресурсы расходуются по порядку: double jump → up-special → air-dodge к ledge.

use bevy::prelude::*;
use rand::Rng;

use super::Executor;
use crate::components::{ActionRequest, AttackId, Platform};

/// Вероятность пропуска ввода при precision = 0
const MAX_PANIC_CHANCE: f32 = 0.25;

/// Выбор x-цели recovery
pub fn recovery_target_x(
    main: &Platform,
    from_x: f32,
    recovery_skill: f32,
    rng: &mut impl Rng,
) -> f32 {
    if recovery_skill < 0.5 {
        let error = (1.0 - recovery_skill) * main.width() * 0.3;
        main.center_x() + rng.gen_range(-1.0f32..=1.0) * error
    } else {
        let inset = 20.0 + (1.0 - recovery_skill) * 40.0;
        let edge = main.nearest_edge_x(from_x);
        if edge <= main.center_x() {
            edge + inset
        } else {
            edge - inset
        }
    }
}

impl<R: Rng> Executor<'_, R> {
    pub(super) fn recover(&mut self) {
        let Some(main) = self.view.main_platform() else {
            return;
        };
        let me = self.view.me;

        // Паника: пропущенный ввод
        if self.chance((1.0 - self.profile.execution_precision) * MAX_PANIC_CHANCE) {
            return;
        }

        let target_x = match self.memory.recover_target {
            Some(x) => x,
            None => {
                let x = recovery_target_x(
                    main,
                    me.position.x,
                    self.profile.recovery_skill,
                    &mut *self.rng,
                );
                self.memory.recover_target = Some(x);
                x
            }
        };

        self.move_toward_x(target_x, 5.0);
        let facing = crate::components::Facing::toward(me.position.x, target_x);
        if me.facing != facing {
            self.push(ActionRequest::Face(facing));
        }

        if me.grounded {
            return;
        }

        let tuning = self.tuning;
        let ledge = Vec2::new(main.nearest_edge_x(me.position.x), main.top);
        let below = main.top - me.position.y;
        let horizontal_gap = (me.position.x - ledge.x).abs();
        let falling = me.velocity.y <= 0.0;

        // 1. Double jump, пока падаем ниже уровня stage (или далеко)
        let out_of_reach = below > 0.0 || horizontal_gap > tuning.up_special_threshold;
        if me.jumps_remaining > 0 && falling && out_of_reach {
            self.push(ActionRequest::DoubleJump);
            return;
        }

        // 2. Up-special, когда прыжков нет и опасно по вертикали/горизонтали
        let vertical_danger = below > tuning.recovery_vertical_danger;
        let in_up_special_reach = horizontal_gap <= tuning.up_special_threshold;
        let needs_up_special = vertical_danger || !in_up_special_reach || below > 0.0;
        if me.jumps_remaining == 0 && me.up_special_available && falling && needs_up_special {
            self.commit(ActionRequest::attack(AttackId::UpSpecial));
            return;
        }

        // 3. Air-dodge к ledge, если ресурсов нет, а ledge рядом
        let to_ledge = ledge - me.position;
        let exhausted = me.jumps_remaining == 0 && !me.up_special_available;
        if exhausted && to_ledge.length() <= tuning.air_dodge_range {
            self.commit(ActionRequest::AirDodge {
                direction: to_ledge.normalize_or_zero(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_skilled_target_inside_near_edge() {
        let main = Platform::solid(-300.0, 300.0, 0.0, -60.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let right = recovery_target_x(&main, 420.0, 0.95, &mut rng);
        assert!(right < 300.0 && right > 250.0);
        let left = recovery_target_x(&main, -420.0, 0.95, &mut rng);
        assert!(left > -300.0 && left < -250.0);
    }

    #[test]
    fn test_unskilled_target_near_center_with_error() {
        let main = Platform::solid(-300.0, 300.0, 0.0, -60.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let x = recovery_target_x(&main, 420.0, 0.2, &mut rng);
            assert!(x.abs() <= 600.0 * 0.3 * 0.8 + 1e-3);
        }
    }
}
