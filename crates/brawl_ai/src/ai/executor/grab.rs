//! Grab follow-up: throw/pummel, пока реально держим оппонента.
//!
//! is_grabbing без holding_opponent (stale/whiffed grab) → no-op.

use rand::Rng;

use super::Executor;
use crate::ai::components::{AiTuning, BehavioralState, DifficultyProfile, ZoneFlags};
use crate::components::{ActionRequest, AttackId, CombatantSnapshot, Facing};

/// Максимум pummel за один grab
const MAX_PUMMELS: u8 = 2;
/// Ниже этого damage: combo-starter throw
const COMBO_THROW_DAMAGE: f32 = 50.0;

/// Выбор follow-up для удерживаемого оппонента
pub fn choose_throw(
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    zones: &ZoneFlags,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    pummels: u8,
) -> AttackId {
    let damage = opponent.damage;
    if damage >= tuning.high_damage {
        // Kill throw: спиной к ближнему blast zone → back throw
        let back_to_left_edge = zones.near_left_edge && me.facing == Facing::Right;
        let back_to_right_edge = zones.near_right_edge && me.facing == Facing::Left;
        return if back_to_left_edge || back_to_right_edge {
            AttackId::BackThrow
        } else {
            AttackId::UpThrow
        };
    }
    if damage < COMBO_THROW_DAMAGE {
        return AttackId::DownThrow;
    }
    if profile.tech_skill >= 0.5 && pummels < MAX_PUMMELS {
        return AttackId::Pummel;
    }
    AttackId::ForwardThrow
}

impl<R: Rng> Executor<'_, R> {
    pub(super) fn grab_follow_up(&mut self) {
        if !self.view.me.holding_opponent {
            return;
        }
        let combo_throw = self.combo_throw();
        let throw = combo_throw.unwrap_or_else(|| {
            choose_throw(
                self.view.me,
                self.view.opponent,
                &self.memory.zones,
                self.profile,
                self.tuning,
                self.memory.scratch.pummels,
            )
        });
        // Grab: сам по себе атака host'а; throw разрешаем без attack gate
        if self.plan.push(ActionRequest::attack(throw)) {
            self.memory.scratch.last_commit_frame = Some(self.memory.frame);
            if throw == AttackId::Pummel {
                self.memory.scratch.pummels += 1;
            }
            if combo_throw.is_some() {
                let frame = self.memory.frame;
                let combo = &mut self.memory.combo;
                combo.combo_counter += 1;
                combo.last_step_frame = frame;
            }
        }
    }

    /// Throw-шаг активной combo (COMBO state, следующий шаг = throw)
    fn combo_throw(&self) -> Option<AttackId> {
        if self.memory.current_state() != BehavioralState::Combo {
            return None;
        }
        self.memory.combo.next_attack().filter(|attack| attack.is_throw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    fn holding(damage: f32) -> (CombatantSnapshot, CombatantSnapshot) {
        let mut me = CombatantSnapshot::at(Vec2::ZERO);
        me.is_grabbing = true;
        me.holding_opponent = true;
        let mut opponent = CombatantSnapshot::at(Vec2::new(20.0, 0.0));
        opponent.damage = damage;
        (me, opponent)
    }

    #[test]
    fn test_low_damage_combo_throw() {
        let (me, opponent) = holding(10.0);
        let throw = choose_throw(
            &me,
            &opponent,
            &ZoneFlags::default(),
            &DifficultyProfile::default(),
            &AiTuning::default(),
            0,
        );
        assert_eq!(throw, AttackId::DownThrow);
    }

    #[test]
    fn test_kill_throw_back_to_edge() {
        let (mut me, opponent) = holding(130.0);
        me.facing = Facing::Right;
        let zones = ZoneFlags {
            near_left_edge: true,
            ..Default::default()
        };
        let throw = choose_throw(
            &me,
            &opponent,
            &zones,
            &DifficultyProfile::default(),
            &AiTuning::default(),
            0,
        );
        assert_eq!(throw, AttackId::BackThrow);

        let centered = choose_throw(
            &me,
            &opponent,
            &ZoneFlags::default(),
            &DifficultyProfile::default(),
            &AiTuning::default(),
            0,
        );
        assert_eq!(centered, AttackId::UpThrow);
    }

    #[test]
    fn test_pummel_then_throw_for_skilled() {
        let (me, opponent) = holding(70.0);
        let mut profile = DifficultyProfile::default();
        profile.tech_skill = 0.9;
        let tuning = AiTuning::default();
        assert_eq!(
            choose_throw(&me, &opponent, &ZoneFlags::default(), &profile, &tuning, 0),
            AttackId::Pummel
        );
        assert_eq!(
            choose_throw(&me, &opponent, &ZoneFlags::default(), &profile, &tuning, 2),
            AttackId::ForwardThrow
        );
    }
}
