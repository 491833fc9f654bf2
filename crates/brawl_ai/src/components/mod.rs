//! ECS Components и value types, общие для AI и host
//!
//! Организация по доменам:
//! - attack: закрытый словарь атак (AttackId, AttackCategory)
//! - combatant: read-only snapshot бойца (CombatantSnapshot, Facing, ActionKind)
//! - stage: геометрия уровня (Platform, BlastZone, StageGeometry)
//! - action: выходной словарь AI (ActionRequest, ActionPlan)

pub mod action;
pub mod attack;
pub mod combatant;
pub mod stage;

// Re-exports для удобного импорта
pub use action::*;
pub use attack::*;
pub use combatant::*;
pub use stage::*;
