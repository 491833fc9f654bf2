//! CombatantSnapshot: read-only срез бойца на текущий frame.
//!
//! Host (physics/animation layer) пишет snapshot ДО FixedUpdate.
//! AI только читает: никаких прямых мутаций бойца, только ActionRequest.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::attack::AttackId;

/// Направление взгляда бойца
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 для Left, +1.0 для Right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing в сторону target_x (при равенстве: Right)
    pub fn toward(from_x: f32, target_x: f32) -> Self {
        if target_x < from_x {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// Текущее (не-атакующее) действие бойца, как его видит host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ActionKind {
    #[default]
    Idle,
    Walking,
    Running,
    Jumping,
    Falling,
    Shielding,
    Rolling,
    SpotDodging,
    AirDodging,
    Attacking,
    Grabbing,
    Hitstun,
    LedgeHang,
    /// Helpless fall после up-special
    Helpless,
}

/// Классификация поведения оппонента для state history (pattern learning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ObservedActivity {
    GroundIdle,
    GroundMove,
    GroundAttack,
    Airborne,
    AirAttack,
    Shielding,
    Rolling,
    Hitstun,
    LedgeHang,
}

impl ObservedActivity {
    pub fn is_ground(self) -> bool {
        matches!(
            self,
            ObservedActivity::GroundIdle
                | ObservedActivity::GroundMove
                | ObservedActivity::GroundAttack
                | ObservedActivity::Shielding
                | ObservedActivity::Rolling
        )
    }

    pub fn is_aerial(self) -> bool {
        matches!(self, ObservedActivity::Airborne | ObservedActivity::AirAttack)
    }
}

/// Snapshot бойца (единственный источник внешних данных для AI)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CombatantSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    /// Damage percent (0..999)
    pub damage: f32,
    pub stocks: u8,
    pub action: ActionKind,

    /// Текущая атака (None = не атакует или unknown raw id)
    pub attack: Option<AttackId>,
    pub attack_elapsed_frames: u32,
    pub attack_total_frames: u32,

    pub is_shielding: bool,
    pub is_attacking: bool,
    pub is_grabbing: bool,
    pub in_hitstun: bool,
    /// true только если grab реально держит оппонента
    pub holding_opponent: bool,
    pub shield_health: f32,

    // === Recovery resources ===
    pub grounded: bool,
    pub jumps_remaining: u8,
    pub up_special_available: bool,
}

impl Default for CombatantSnapshot {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

impl CombatantSnapshot {
    /// Боец стоит на земле в позиции, full shield, 3 stocks
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            damage: 0.0,
            stocks: 3,
            action: ActionKind::Idle,
            attack: None,
            attack_elapsed_frames: 0,
            attack_total_frames: 0,
            is_shielding: false,
            is_attacking: false,
            is_grabbing: false,
            in_hitstun: false,
            holding_opponent: false,
            shield_health: 1.0,
            grounded: true,
            jumps_remaining: 1,
            up_special_available: true,
        }
    }

    /// Установить атаку по raw index от host.
    ///
    /// Unknown index → атака сбрасывается (treated as "no attack").
    pub fn with_raw_attack(mut self, raw: u16, elapsed: u32, total: u32) -> Self {
        match AttackId::from_raw(raw) {
            Some(attack) => {
                self.attack = Some(attack);
                self.attack_elapsed_frames = elapsed;
                self.attack_total_frames = total;
                self.is_attacking = true;
                self.action = ActionKind::Attacking;
            }
            None => {
                self.attack = None;
                self.attack_elapsed_frames = 0;
                self.attack_total_frames = 0;
                self.is_attacking = false;
            }
        }
        self
    }

    /// Установить атаку (тесты и demo host)
    pub fn with_attack(mut self, attack: AttackId, elapsed: u32, total: u32) -> Self {
        self.attack = Some(attack);
        self.attack_elapsed_frames = elapsed;
        self.attack_total_frames = total;
        self.is_attacking = true;
        self.action = ActionKind::Attacking;
        self
    }

    /// Прогресс текущей атаки 0..1 (None если атаки нет или total == 0)
    pub fn attack_progress(&self) -> Option<f32> {
        if !self.is_attacking || self.attack.is_none() || self.attack_total_frames == 0 {
            return None;
        }
        Some((self.attack_elapsed_frames as f32 / self.attack_total_frames as f32).clamp(0.0, 1.0))
    }

    /// Атака в хвостовой части (endlag): progress ≥ 1 - trailing_fraction
    pub fn is_in_endlag(&self, trailing_fraction: f32) -> bool {
        self.attack_progress()
            .is_some_and(|progress| progress >= 1.0 - trailing_fraction)
    }

    /// Атака в active frames (20%..60% длительности)
    pub fn is_mid_active(&self) -> bool {
        self.attack_progress()
            .is_some_and(|progress| (0.2..=0.6).contains(&progress))
    }

    pub fn is_airborne(&self) -> bool {
        !self.grounded
    }

    /// Классификация для opponent state history
    pub fn observed_activity(&self) -> ObservedActivity {
        if self.in_hitstun || self.action == ActionKind::Hitstun {
            return ObservedActivity::Hitstun;
        }
        if self.action == ActionKind::LedgeHang {
            return ObservedActivity::LedgeHang;
        }
        if self.is_shielding || self.action == ActionKind::Shielding {
            return ObservedActivity::Shielding;
        }
        if matches!(self.action, ActionKind::Rolling | ActionKind::SpotDodging) {
            return ObservedActivity::Rolling;
        }
        match (self.grounded, self.is_attacking) {
            (true, true) => ObservedActivity::GroundAttack,
            (false, true) => ObservedActivity::AirAttack,
            (false, false) => ObservedActivity::Airborne,
            (true, false) => match self.action {
                ActionKind::Walking | ActionKind::Running => ObservedActivity::GroundMove,
                _ => ObservedActivity::GroundIdle,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_progress_none_without_attack() {
        let snapshot = CombatantSnapshot::default();
        assert_eq!(snapshot.attack_progress(), None);
        assert!(!snapshot.is_in_endlag(0.4));
    }

    #[test]
    fn test_attack_progress_zero_total_frames() {
        let snapshot = CombatantSnapshot::default().with_attack(AttackId::Jab, 3, 0);
        assert_eq!(snapshot.attack_progress(), None);
    }

    #[test]
    fn test_endlag_window() {
        let early = CombatantSnapshot::default().with_attack(AttackId::ForwardSmash, 10, 50);
        let late = CombatantSnapshot::default().with_attack(AttackId::ForwardSmash, 40, 50);

        assert!(!early.is_in_endlag(0.4));
        assert!(late.is_in_endlag(0.4));
        assert!(early.is_mid_active());
        assert!(!late.is_mid_active());
    }

    #[test]
    fn test_raw_attack_out_of_range_means_no_attack() {
        let snapshot = CombatantSnapshot::default().with_raw_attack(999, 5, 20);
        assert_eq!(snapshot.attack, None);
        assert!(!snapshot.is_attacking);
        assert_eq!(snapshot.attack_progress(), None);
    }

    #[test]
    fn test_observed_activity_classification() {
        let mut snapshot = CombatantSnapshot::default();
        assert_eq!(snapshot.observed_activity(), ObservedActivity::GroundIdle);

        snapshot.grounded = false;
        assert_eq!(snapshot.observed_activity(), ObservedActivity::Airborne);

        snapshot.in_hitstun = true;
        assert_eq!(snapshot.observed_activity(), ObservedActivity::Hitstun);

        let shielding = CombatantSnapshot {
            is_shielding: true,
            ..CombatantSnapshot::default()
        };
        assert_eq!(shielding.observed_activity(), ObservedActivity::Shielding);
        assert!(shielding.observed_activity().is_ground());
    }

    #[test]
    fn test_facing_toward() {
        assert_eq!(Facing::toward(0.0, -10.0), Facing::Left);
        assert_eq!(Facing::toward(0.0, 10.0), Facing::Right);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
