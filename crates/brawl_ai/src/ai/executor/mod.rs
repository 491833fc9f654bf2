//! ActionExecutor: один tactical handler на BehavioralState.
//!
//! Handler переводит выбранное состояние в ActionRequest'ы (ActionPlan).
//! Никаких прямых мутаций бойца. Handler может запросить смену состояния
//! (escalation APPROACH → ATTACK, завершение combo и т.д.), её применяет agent.
//!
//! Порядок одного pass:
//! 1. Grab follow-up (только если реально держим оппонента)
//! 2. Hitstun → DI к центру stage
//! 3. Shield release, если угроза прошла
//! 4. Dispatch по состоянию

mod approach;
mod attack;
mod combo;
mod defend;
mod edge_guard;
mod grab;
mod recover;
mod spacing;

pub use attack::{choose_attack, AttackContext, AttackOption};
pub use edge_guard::{predict_getup, GetupPrediction};
pub use grab::choose_throw;

use rand::Rng;

use super::components::{AgentMemory, AiTuning, BehavioralState, DifficultyProfile};
use super::frame::FrameView;
use crate::components::{ActionPlan, ActionRequest};

/// Результат executor pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutorOutcome {
    pub plan: ActionPlan,
    pub transition: Option<BehavioralState>,
}

/// Рабочий контекст executor на один frame
pub(crate) struct Executor<'a, R: Rng> {
    pub memory: &'a mut AgentMemory,
    pub view: FrameView<'a>,
    pub profile: &'a DifficultyProfile,
    pub tuning: &'a AiTuning,
    pub rng: &'a mut R,
    pub plan: ActionPlan,
    pub transition: Option<BehavioralState>,
}

impl<'a, R: Rng> Executor<'a, R> {
    fn new(
        memory: &'a mut AgentMemory,
        view: FrameView<'a>,
        profile: &'a DifficultyProfile,
        tuning: &'a AiTuning,
        rng: &'a mut R,
    ) -> Self {
        Self {
            memory,
            view,
            profile,
            tuning,
            rng,
            plan: ActionPlan::new(),
            transition: None,
        }
    }

    /// Можно ли начинать committing действие (не в атаке, не в hitstun, cooldown прошёл)
    pub fn can_commit(&self) -> bool {
        let me = self.view.me;
        if me.is_attacking || me.in_hitstun || self.plan.has_committed() {
            return false;
        }
        match self.memory.scratch.last_commit_frame {
            Some(last) => {
                self.memory.frame.saturating_sub(last) >= u64::from(self.tuning.commit_cooldown)
            }
            None => true,
        }
    }

    /// Committing запрос через gate. Returns true если принят.
    pub fn commit(&mut self, request: ActionRequest) -> bool {
        if !self.can_commit() {
            return false;
        }
        if self.plan.push(request) {
            self.memory.scratch.last_commit_frame = Some(self.memory.frame);
            if self.memory.scratch.shielding {
                self.memory.scratch.shielding = false;
            }
            return true;
        }
        false
    }

    /// Non-committing запрос (movement / facing / shield)
    pub fn push(&mut self, request: ActionRequest) {
        self.plan.push(request);
    }

    pub fn move_toward_x(&mut self, target_x: f32, deadzone: f32) {
        let request = ActionRequest::move_toward(self.view.me.position.x, target_x, deadzone);
        self.plan.push_opt(request);
    }

    pub fn face_opponent(&mut self) {
        let facing = self.view.facing_opponent();
        if self.view.me.facing != facing {
            self.push(ActionRequest::Face(facing));
        }
    }

    /// Shield только на земле; в воздухе no-op
    pub fn hold_shield(&mut self, frames: u32) {
        if !self.view.me.grounded {
            return;
        }
        if !self.memory.scratch.shielding {
            self.push(ActionRequest::Shield);
        }
        self.memory.scratch.shielding = true;
        self.memory.scratch.shield_hold_frames = frames;
    }

    pub fn release_shield(&mut self) {
        if self.memory.scratch.shielding {
            self.push(ActionRequest::ReleaseShield);
            self.memory.scratch.shielding = false;
            self.memory.scratch.shield_hold_frames = 0;
        }
    }

    pub fn request_transition(&mut self, state: BehavioralState) {
        if state != self.memory.current_state() {
            self.transition = Some(state);
        }
    }

    /// Bernoulli draw
    pub fn chance(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }

    /// Opponent угрожает атакой/grab на близкой дистанции
    pub fn opponent_threatening(&self) -> bool {
        let opponent = self.view.opponent;
        (opponent.is_attacking || opponent.is_grabbing)
            && self.view.distance() < self.tuning.close_range
    }

    fn finish(self) -> ExecutorOutcome {
        ExecutorOutcome {
            plan: self.plan,
            transition: self.transition,
        }
    }

    fn hitstun_influence(&mut self) {
        // DI к центру stage
        let center = self.view.stage_center_x();
        self.move_toward_x(center, 0.0);
    }

    fn manage_shield(&mut self, state: BehavioralState) {
        if !self.memory.scratch.shielding {
            return;
        }
        let scratch = &mut self.memory.scratch;
        scratch.shield_hold_frames = scratch.shield_hold_frames.saturating_sub(1);

        let threat_passed = !self.view.opponent.is_attacking && !self.view.opponent.is_grabbing;
        let holding = scratch.shield_hold_frames > 0;
        let shield_breaking = self.view.me.shield_health < 0.2;
        if shield_breaking || (!holding && (state != BehavioralState::Defend || threat_passed)) {
            self.release_shield();
        }
    }

    fn dispatch(&mut self, state: BehavioralState) {
        match state {
            BehavioralState::Neutral => self.neutral(),
            BehavioralState::Approach => self.approach(),
            BehavioralState::Attack => self.attack(),
            BehavioralState::Pressure => self.pressure(),
            BehavioralState::Bait => self.bait(),
            BehavioralState::Defend => self.defend(),
            BehavioralState::Punish => self.punish(),
            BehavioralState::Recover => self.recover(),
            BehavioralState::Retreat => self.retreat(),
            BehavioralState::EdgeGuard => self.edge_guard(),
            BehavioralState::LedgeTrap => self.ledge_trap(),
            BehavioralState::Combo => self.combo(),
        }
    }
}

/// Executor pass для текущего состояния memory
pub fn execute(
    memory: &mut AgentMemory,
    view: FrameView,
    profile: &DifficultyProfile,
    tuning: &AiTuning,
    rng: &mut impl Rng,
) -> ExecutorOutcome {
    let state = memory.current_state();
    let mut executor = Executor::new(memory, view, profile, tuning, rng);

    if view.me.is_grabbing {
        executor.grab_follow_up();
        return executor.finish();
    }
    executor.memory.scratch.pummels = 0;

    if view.me.in_hitstun {
        executor.hitstun_influence();
        return executor.finish();
    }

    executor.manage_shield(state);
    executor.dispatch(state);
    executor.finish()
}
