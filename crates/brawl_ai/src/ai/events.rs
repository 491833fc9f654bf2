//! AI Events: вход (SetDifficulty) и выход (action requests, transitions) AI pipeline
//!
//! Host читает AiActionRequested и применяет к своему combatant-control.
//! AI никогда не мутирует бойца напрямую.

use bevy::prelude::*;

use super::components::BehavioralState;
use crate::components::ActionRequest;

/// Запрос действия от AI агента (один event на ActionRequest, порядок сохраняется)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AiActionRequested {
    pub agent: Entity,
    pub request: ActionRequest,
}

/// Смена поведенческого состояния (diagnostics/UI)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BehaviorStateChanged {
    pub agent: Entity,
    pub from: BehavioralState,
    pub to: BehavioralState,
    pub frame: u64,
}

/// Переопределить difficulty агента без сброса AgentMemory history
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SetDifficulty {
    pub agent: Entity,
    /// Difficulty scalar 0..1
    pub level: f32,
}
