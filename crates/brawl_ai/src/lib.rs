//! Brawl AI Core
//!
//! Adaptive combat AI для platform fighter на Bevy 0.16 ECS.
//!
//! HOST / AI SPLIT:
//! - Host = physics, hitboxes, rendering, netcode; пишет CombatantSnapshot каждый frame
//! - AI = observe snapshot → decide BehavioralState → emit ActionRequest'ы
//!
//! AI никогда не мутирует бойца напрямую: только AiActionRequested события.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{
    apply_difficulty, run_agent_frame, AIPlugin, AgentFrameResult, AgentMemory, AiActionRequested,
    AiController, AiTuning, BehaviorStateChanged, BehavioralState, DifficultyLevel,
    DifficultyProfile, SetDifficulty,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};

/// Главный plugin AI (stage, RNG, fixed timestep, pipeline)
pub struct BrawlAiPlugin;

impl Plugin for BrawlAiPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz: все frame-константы AI в 1/60 s
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .init_resource::<StageGeometry>()
            .add_plugins(AIPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// RNG и stage вставляются после plugin, чтобы seed не перетирался.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, BrawlAiPlugin))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(StageGeometry::battlefield())
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
