//! ActionRequest: фиксированный словарь команд AI → combatant control.
//!
//! За один decision pass: максимум ОДНО committing действие (attack/grab/dodge)
//! плюс любое количество movement/facing запросов. Инвариант держит ActionPlan.

use bevy::prelude::*;

use super::attack::AttackId;
use super::combatant::Facing;

/// Запрос действия к внешнему combatant-control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionRequest {
    // === Movement ===
    MoveLeft,
    MoveRight,
    Jump,
    DoubleJump,
    FastFall,
    DropThroughPlatform,
    Face(Facing),

    // === Defense ===
    Shield,
    ReleaseShield,
    SpotDodge,
    /// Roll вперёд (по facing)
    ForwardDodge,
    /// Roll назад
    BackDodge,
    AirDodge { direction: Vec2 },

    // === Offense ===
    /// Атака. `charge` (0..1) имеет смысл только для smash attacks.
    Attack { attack: AttackId, charge: f32 },
}

impl ActionRequest {
    pub fn attack(attack: AttackId) -> Self {
        Self::Attack {
            attack,
            charge: 0.0,
        }
    }

    pub fn smash(attack: AttackId, charge: f32) -> Self {
        Self::Attack {
            attack,
            charge: if attack.is_smash() { charge.clamp(0.0, 1.0) } else { 0.0 },
        }
    }

    /// Направленный move к x (None если уже в deadzone)
    pub fn move_toward(from_x: f32, to_x: f32, deadzone: f32) -> Option<Self> {
        let delta = to_x - from_x;
        if delta.abs() <= deadzone {
            None
        } else if delta < 0.0 {
            Some(Self::MoveLeft)
        } else {
            Some(Self::MoveRight)
        }
    }

    /// Committing = attack / grab / dodge (занимает бойца на N frames)
    pub fn is_committing(&self) -> bool {
        matches!(
            self,
            ActionRequest::SpotDodge
                | ActionRequest::ForwardDodge
                | ActionRequest::BackDodge
                | ActionRequest::AirDodge { .. }
                | ActionRequest::Attack { .. }
        )
    }
}

/// Результат одного decision pass (ordered requests)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionPlan {
    requests: Vec<ActionRequest>,
    committed: bool,
}

impl ActionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить запрос.
    ///
    /// Второй committing запрос отбрасывается (returns false).
    pub fn push(&mut self, request: ActionRequest) -> bool {
        if request.is_committing() {
            if self.committed {
                crate::logger::log_warning(&format!(
                    "ActionPlan: dropped second committing request {:?}",
                    request
                ));
                return false;
            }
            self.committed = true;
        }
        self.requests.push(request);
        true
    }

    /// Добавить Option (удобно с ActionRequest::move_toward)
    pub fn push_opt(&mut self, request: Option<ActionRequest>) {
        if let Some(request) = request {
            self.push(request);
        }
    }

    pub fn has_committed(&self) -> bool {
        self.committed
    }

    pub fn requests(&self) -> &[ActionRequest] {
        &self.requests
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn into_requests(self) -> Vec<ActionRequest> {
        self.requests
    }

    /// Committing запрос этого pass (если есть)
    pub fn committed_request(&self) -> Option<&ActionRequest> {
        self.requests.iter().find(|r| r.is_committing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_allows_single_commit() {
        let mut plan = ActionPlan::new();
        assert!(plan.push(ActionRequest::MoveLeft));
        assert!(plan.push(ActionRequest::attack(AttackId::Jab)));
        assert!(!plan.push(ActionRequest::SpotDodge));
        assert!(plan.push(ActionRequest::Face(Facing::Left)));

        assert_eq!(plan.requests().len(), 3);
        assert!(plan.has_committed());
        assert_eq!(plan.committed_request(), Some(&ActionRequest::attack(AttackId::Jab)));
    }

    #[test]
    fn test_shield_and_jump_are_not_committing() {
        assert!(!ActionRequest::Shield.is_committing());
        assert!(!ActionRequest::Jump.is_committing());
        assert!(!ActionRequest::DoubleJump.is_committing());
        assert!(ActionRequest::AirDodge { direction: Vec2::X }.is_committing());
    }

    #[test]
    fn test_smash_charge_only_for_smashes() {
        assert_eq!(
            ActionRequest::smash(AttackId::Jab, 0.9),
            ActionRequest::Attack {
                attack: AttackId::Jab,
                charge: 0.0,
            }
        );
        assert_eq!(
            ActionRequest::smash(AttackId::UpSmash, 3.0),
            ActionRequest::Attack {
                attack: AttackId::UpSmash,
                charge: 1.0,
            }
        );
    }

    #[test]
    fn test_move_toward_deadzone() {
        assert_eq!(ActionRequest::move_toward(0.0, 5.0, 10.0), None);
        assert_eq!(ActionRequest::move_toward(0.0, 50.0, 10.0), Some(ActionRequest::MoveRight));
        assert_eq!(ActionRequest::move_toward(0.0, -50.0, 10.0), Some(ActionRequest::MoveLeft));
    }
}
