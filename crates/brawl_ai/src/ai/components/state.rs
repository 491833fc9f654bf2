//! BehavioralState: 12 взаимоисключающих поведенческих состояний агента.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Поведенческое состояние AI (ровно одно активно в каждый момент)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehavioralState {
    /// Ожидание, контроль центра
    #[default]
    Neutral,
    /// Сокращаем дистанцию до optimal spacing
    Approach,
    Attack,
    /// Давим с близкой дистанции
    Pressure,
    /// Провоцируем оппонента на commit
    Bait,
    Defend,
    /// Наказываем endlag оппонента
    Punish,
    /// Возврат на stage
    Recover,
    Retreat,
    /// Перехват оппонента, возвращающегося на stage
    EdgeGuard,
    /// Покрытие опций оппонента на ledge
    LedgeTrap,
    Combo,
}

impl BehavioralState {
    pub const ALL: [BehavioralState; 12] = [
        BehavioralState::Neutral,
        BehavioralState::Approach,
        BehavioralState::Attack,
        BehavioralState::Pressure,
        BehavioralState::Bait,
        BehavioralState::Defend,
        BehavioralState::Punish,
        BehavioralState::Recover,
        BehavioralState::Retreat,
        BehavioralState::EdgeGuard,
        BehavioralState::LedgeTrap,
        BehavioralState::Combo,
    ];

    /// Состояния, где низкая adaptability даёт "tunnel vision" (reaction penalty)
    pub fn is_committed_offense_or_flight(self) -> bool {
        matches!(
            self,
            BehavioralState::Attack | BehavioralState::Retreat | BehavioralState::Pressure
        )
    }

    /// Состояния, которым разрешено пересматривать решение раньше reaction delay
    pub fn reevaluates_early(self) -> bool {
        matches!(self, BehavioralState::Recover | BehavioralState::Combo)
    }

    pub fn name(self) -> &'static str {
        match self {
            BehavioralState::Neutral => "NEUTRAL",
            BehavioralState::Approach => "APPROACH",
            BehavioralState::Attack => "ATTACK",
            BehavioralState::Pressure => "PRESSURE",
            BehavioralState::Bait => "BAIT",
            BehavioralState::Defend => "DEFEND",
            BehavioralState::Punish => "PUNISH",
            BehavioralState::Recover => "RECOVER",
            BehavioralState::Retreat => "RETREAT",
            BehavioralState::EdgeGuard => "EDGE_GUARD",
            BehavioralState::LedgeTrap => "LEDGE_TRAP",
            BehavioralState::Combo => "COMBO",
        }
    }
}

impl std::fmt::Display for BehavioralState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
