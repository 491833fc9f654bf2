//! Adaptive combat AI
//!
//! Один агент = AiController + AgentMemory + DifficultyProfile + AiTuning.
//! Каждый frame: assess → history → learn (раз в pattern window) → decide → execute.
//!
//! Стадии: чистые функции над snapshot'ами (`agent::run_agent_frame`),
//! ECS системы (`systems`) только связывают их с World.

use bevy::prelude::*;

pub mod agent;
pub mod assess;
pub mod combo;
pub mod components;
pub mod decision;
pub mod events;
pub mod executor;
pub mod frame;
pub mod patterns;
pub mod systems;


// Re-export основных типов
pub use agent::{apply_difficulty, run_agent_frame, AgentFrameResult};
pub use combo::{combo_database, find_combo, ComboContext, ComboEntry, ComboStep};
pub use components::*;
pub use decision::Decision;
pub use events::{AiActionRequested, BehaviorStateChanged, SetDifficulty};
pub use executor::{execute, ExecutorOutcome};
pub use frame::FrameView;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. begin_agent_frames: frame counter, stateTimer, SetDifficulty
/// 2. assess_threat_and_zones: threat level, zone flags
/// 3. record_opponent_history: ring buffers оппонента
/// 4. learn_opponent_patterns: tendencies (каждые pattern_window frames)
/// 5. decide_behavior_state: выбор BehavioralState
/// 6. execute_behavior_state: AiActionRequested события
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AiActionRequested>()
            .add_event::<BehaviorStateChanged>()
            .add_event::<SetDifficulty>()
            .add_systems(
                FixedUpdate,
                (
                    systems::begin_agent_frames,
                    systems::assess_threat_and_zones,
                    systems::record_opponent_history,
                    systems::learn_opponent_patterns,
                    systems::decide_behavior_state,
                    systems::execute_behavior_state,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
