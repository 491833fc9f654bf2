//! DifficultyProfile: неизменяемый на матч набор skill-скаляров.
//!
//! Выводится один раз из difficulty scalar ∈ [0, 1]:
//! - `from_scalar`: band lookup (easy / medium / hard / expert presets)
//! - `interpolated`: piecewise-linear между четырьмя anchors (монотонно)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
        DifficultyLevel::Expert,
    ];

    /// Band по scalar: [0, .25) easy, [.25, .5) medium, [.5, .75) hard, [.75, 1] expert.
    ///
    /// Non-finite scalar → Medium.
    pub fn from_scalar(difficulty: f32) -> Self {
        if !difficulty.is_finite() {
            return DifficultyLevel::Medium;
        }
        let d = difficulty.clamp(0.0, 1.0);
        if d < 0.25 {
            DifficultyLevel::Easy
        } else if d < 0.5 {
            DifficultyLevel::Medium
        } else if d < 0.75 {
            DifficultyLevel::Hard
        } else {
            DifficultyLevel::Expert
        }
    }

    /// Позиция anchor на шкале [0, 1] (для interpolation)
    pub fn anchor(self) -> f32 {
        match self {
            DifficultyLevel::Easy => 0.0,
            DifficultyLevel::Medium => 1.0 / 3.0,
            DifficultyLevel::Hard => 2.0 / 3.0,
            DifficultyLevel::Expert => 1.0,
        }
    }
}

/// Skill profile агента
///
/// Все поля 0..1, кроме двух reaction полей (frames).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct DifficultyProfile {
    /// Базовая задержка реакции (frames)
    pub reaction_time_base: f32,
    /// Случайная добавка к задержке (frames, масштабируется (1 - decision_quality))
    pub reaction_time_variance: f32,
    pub decision_quality: f32,
    pub execution_precision: f32,
    pub risk_tolerance: f32,
    pub combo_proficiency: f32,
    pub adaptability: f32,
    pub recovery_skill: f32,
    pub tech_skill: f32,
}

impl DifficultyProfile {
    /// Compiled-in presets
    pub fn preset(level: DifficultyLevel) -> Self {
        match level {
            DifficultyLevel::Easy => Self {
                reaction_time_base: 30.0,
                reaction_time_variance: 20.0,
                decision_quality: 0.3,
                execution_precision: 0.35,
                risk_tolerance: 0.3,
                combo_proficiency: 0.2,
                adaptability: 0.2,
                recovery_skill: 0.35,
                tech_skill: 0.1,
            },
            DifficultyLevel::Medium => Self {
                reaction_time_base: 20.0,
                reaction_time_variance: 14.0,
                decision_quality: 0.55,
                execution_precision: 0.6,
                risk_tolerance: 0.5,
                combo_proficiency: 0.45,
                adaptability: 0.45,
                recovery_skill: 0.6,
                tech_skill: 0.35,
            },
            DifficultyLevel::Hard => Self {
                reaction_time_base: 12.0,
                reaction_time_variance: 8.0,
                decision_quality: 0.8,
                execution_precision: 0.8,
                risk_tolerance: 0.65,
                combo_proficiency: 0.7,
                adaptability: 0.7,
                recovery_skill: 0.8,
                tech_skill: 0.65,
            },
            DifficultyLevel::Expert => Self {
                reaction_time_base: 6.0,
                reaction_time_variance: 4.0,
                decision_quality: 0.95,
                execution_precision: 0.95,
                risk_tolerance: 0.8,
                combo_proficiency: 0.9,
                adaptability: 0.9,
                recovery_skill: 0.95,
                tech_skill: 0.9,
            },
        }
    }

    /// Band preset по scalar
    pub fn from_scalar(difficulty: f32) -> Self {
        Self::preset(DifficultyLevel::from_scalar(difficulty))
    }

    /// Piecewise-linear interpolation между anchors (easy=0, medium=1/3, hard=2/3, expert=1)
    pub fn interpolated(difficulty: f32) -> Self {
        let d = if difficulty.is_finite() {
            difficulty.clamp(0.0, 1.0)
        } else {
            DifficultyLevel::Medium.anchor()
        };

        let levels = DifficultyLevel::ALL;
        for pair in levels.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            if d <= high.anchor() {
                let t = (d - low.anchor()) / (high.anchor() - low.anchor());
                return Self::lerp(&Self::preset(low), &Self::preset(high), t);
            }
        }
        Self::preset(DifficultyLevel::Expert)
    }

    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: f32, y: f32| x + (y - x) * t;
        Self {
            reaction_time_base: mix(a.reaction_time_base, b.reaction_time_base),
            reaction_time_variance: mix(a.reaction_time_variance, b.reaction_time_variance),
            decision_quality: mix(a.decision_quality, b.decision_quality),
            execution_precision: mix(a.execution_precision, b.execution_precision),
            risk_tolerance: mix(a.risk_tolerance, b.risk_tolerance),
            combo_proficiency: mix(a.combo_proficiency, b.combo_proficiency),
            adaptability: mix(a.adaptability, b.adaptability),
            recovery_skill: mix(a.recovery_skill, b.recovery_skill),
            tech_skill: mix(a.tech_skill, b.tech_skill),
        }
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::preset(DifficultyLevel::Medium)
    }
}
