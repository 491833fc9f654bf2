//! FrameView: immutable срез frame для decision/executor.
//!
//! Snapshot захватывается в начале frame и не перечитывается до конца pass.

use bevy::prelude::*;

use crate::components::{CombatantSnapshot, Facing, Platform, StageGeometry};

#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub me: &'a CombatantSnapshot,
    pub opponent: &'a CombatantSnapshot,
    pub stage: &'a StageGeometry,
}

impl<'a> FrameView<'a> {
    pub fn new(
        me: &'a CombatantSnapshot,
        opponent: &'a CombatantSnapshot,
        stage: &'a StageGeometry,
    ) -> Self {
        Self {
            me,
            opponent,
            stage,
        }
    }

    pub fn distance(&self) -> f32 {
        self.me.position.distance(self.opponent.position)
    }

    /// Opponent - self
    pub fn relative(&self) -> Vec2 {
        self.opponent.position - self.me.position
    }

    /// Знак направления к оппоненту (+1 вправо, -1 влево)
    pub fn toward_opponent(&self) -> f32 {
        if self.opponent.position.x >= self.me.position.x {
            1.0
        } else {
            -1.0
        }
    }

    pub fn facing_opponent(&self) -> Facing {
        Facing::toward(self.me.position.x, self.opponent.position.x)
    }

    pub fn main_platform(&self) -> Option<&'a Platform> {
        self.stage.main_platform()
    }

    /// X центра main platform (0 если stage пустой)
    pub fn stage_center_x(&self) -> f32 {
        self.main_platform().map_or(0.0, |p| p.center_x())
    }
}
