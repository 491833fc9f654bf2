//! Attack identifiers: закрытый enum, общий для snapshot, combo database и executor.
//!
//! Атаки передаются по значению (Copy), никаких ссылок на move data персонажа.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Идентификатор атаки (полный словарь action vocabulary)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
pub enum AttackId {
    Jab,
    ForwardTilt,
    UpTilt,
    DownTilt,
    DashAttack,
    ForwardSmash,
    UpSmash,
    DownSmash,
    NeutralAir,
    ForwardAir,
    BackAir,
    UpAir,
    DownAir,
    NeutralSpecial,
    SideSpecial,
    UpSpecial,
    DownSpecial,
    Grab,
    Pummel,
    ForwardThrow,
    BackThrow,
    UpThrow,
    DownThrow,
}

/// Категория атаки (для threat assessment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackCategory {
    Smash,
    Special,
    Grab,
    Aerial,
    Ground,
}

impl AttackId {
    /// Все атаки в порядке raw index (host передаёт u16 index)
    pub const ALL: [AttackId; 23] = [
        AttackId::Jab,
        AttackId::ForwardTilt,
        AttackId::UpTilt,
        AttackId::DownTilt,
        AttackId::DashAttack,
        AttackId::ForwardSmash,
        AttackId::UpSmash,
        AttackId::DownSmash,
        AttackId::NeutralAir,
        AttackId::ForwardAir,
        AttackId::BackAir,
        AttackId::UpAir,
        AttackId::DownAir,
        AttackId::NeutralSpecial,
        AttackId::SideSpecial,
        AttackId::UpSpecial,
        AttackId::DownSpecial,
        AttackId::Grab,
        AttackId::Pummel,
        AttackId::ForwardThrow,
        AttackId::BackThrow,
        AttackId::UpThrow,
        AttackId::DownThrow,
    ];

    /// Raw index от host → AttackId.
    ///
    /// Out-of-range значения = "нет атаки" (None), а не ошибка.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn category(self) -> AttackCategory {
        match self {
            AttackId::ForwardSmash | AttackId::UpSmash | AttackId::DownSmash => {
                AttackCategory::Smash
            }
            AttackId::NeutralSpecial
            | AttackId::SideSpecial
            | AttackId::UpSpecial
            | AttackId::DownSpecial => AttackCategory::Special,
            AttackId::Grab
            | AttackId::Pummel
            | AttackId::ForwardThrow
            | AttackId::BackThrow
            | AttackId::UpThrow
            | AttackId::DownThrow => AttackCategory::Grab,
            AttackId::NeutralAir
            | AttackId::ForwardAir
            | AttackId::BackAir
            | AttackId::UpAir
            | AttackId::DownAir => AttackCategory::Aerial,
            AttackId::Jab
            | AttackId::ForwardTilt
            | AttackId::UpTilt
            | AttackId::DownTilt
            | AttackId::DashAttack => AttackCategory::Ground,
        }
    }

    pub fn is_smash(self) -> bool {
        self.category() == AttackCategory::Smash
    }

    pub fn is_aerial(self) -> bool {
        self.category() == AttackCategory::Aerial
    }

    pub fn is_throw(self) -> bool {
        matches!(
            self,
            AttackId::ForwardThrow | AttackId::BackThrow | AttackId::UpThrow | AttackId::DownThrow
        )
    }
}

impl AttackCategory {
    /// Базовая угроза категории (до startup/active/endlag envelope)
    pub fn base_threat(self) -> f32 {
        match self {
            AttackCategory::Smash => 0.8,
            AttackCategory::Grab => 0.75,
            AttackCategory::Special => 0.7,
            AttackCategory::Aerial => 0.6,
            AttackCategory::Ground => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_in_range() {
        assert_eq!(AttackId::from_raw(0), Some(AttackId::Jab));
        assert_eq!(AttackId::from_raw(22), Some(AttackId::DownThrow));
    }

    #[test]
    fn test_from_raw_out_of_range_is_none() {
        assert_eq!(AttackId::from_raw(23), None);
        assert_eq!(AttackId::from_raw(u16::MAX), None);
    }

    #[test]
    fn test_category_threat_ordering() {
        let threat = |attack: AttackId| attack.category().base_threat();
        assert!(threat(AttackId::ForwardSmash) > threat(AttackId::Grab));
        assert!(threat(AttackId::Grab) > threat(AttackId::UpSpecial));
        assert!(threat(AttackId::UpSpecial) > threat(AttackId::ForwardAir));
        assert!(threat(AttackId::ForwardAir) > threat(AttackId::Jab));
    }

    #[test]
    fn test_throw_classification() {
        assert!(AttackId::UpThrow.is_throw());
        assert!(!AttackId::Grab.is_throw());
        assert_eq!(AttackId::Pummel.category(), AttackCategory::Grab);
    }
}
