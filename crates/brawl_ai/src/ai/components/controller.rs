//! AiController: маркер AI-управляемого бойца.

use bevy::prelude::*;

use super::{AgentMemory, AiTuning, DifficultyProfile};

/// Боец под управлением AI. `opponent`: entity с CombatantSnapshot соперника.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AiController {
    pub opponent: Entity,
}

impl AiController {
    /// Полный набор AI компонентов для spawn/insert рядом с CombatantSnapshot
    pub fn bundle(
        opponent: Entity,
        profile: DifficultyProfile,
        tuning: AiTuning,
    ) -> (AiController, AgentMemory, DifficultyProfile, AiTuning) {
        let memory = AgentMemory::new(&tuning, &profile);
        (AiController { opponent }, memory, profile, tuning)
    }
}
