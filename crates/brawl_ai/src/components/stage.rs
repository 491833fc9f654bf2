//! Stage geometry: платформы + blast zone.
//!
//! Координаты: y вверх, x вправо. Платформа = прямоугольник [left, right] × [bottom, top].
//! Main stage = платформа с наибольшей площадью (первая при равенстве).

use bevy::prelude::*;
use thiserror::Error;

/// Тип платформы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PlatformKind {
    /// Нельзя пройти сквозь (main stage)
    Solid,
    /// Можно спрыгнуть вниз (drop-through)
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Platform {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn solid(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            kind: PlatformKind::Solid,
        }
    }

    pub fn pass_through(left: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom: top - 4.0,
            kind: PlatformKind::PassThrough,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// Расстояние по x до ближайшего края (0 если за краем)
    pub fn distance_to_nearest_edge(&self, x: f32) -> f32 {
        (x - self.left).abs().min((self.right - x).abs())
    }

    /// X ближайшего края
    pub fn nearest_edge_x(&self, x: f32) -> f32 {
        if x < self.center_x() {
            self.left
        } else {
            self.right
        }
    }
}

/// Границы blast zone (выход за них = потеря stock)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct BlastZone {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl BlastZone {
    /// Находится ли точка в пределах inset от любой границы (или уже за ней)
    pub fn is_within_inset(&self, position: Vec2, inset: f32) -> bool {
        position.x <= self.left + inset
            || position.x >= self.right - inset
            || position.y >= self.top - inset
            || position.y <= self.bottom + inset
    }
}

/// Ошибки валидации geometry (на этапе match configuration, не per-frame)
#[derive(Debug, Error, PartialEq)]
pub enum StageError {
    #[error("stage has no platforms")]
    NoPlatforms,
    #[error("platform {index} has non-positive width or height")]
    DegeneratePlatform { index: usize },
    #[error("blast zone does not enclose the stage")]
    InvalidBlastZone,
}

/// Stage geometry resource
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StageGeometry {
    platforms: Vec<Platform>,
    blast_zone: BlastZone,
}

impl StageGeometry {
    pub fn new(platforms: Vec<Platform>, blast_zone: BlastZone) -> Result<Self, StageError> {
        if platforms.is_empty() {
            return Err(StageError::NoPlatforms);
        }
        for (index, platform) in platforms.iter().enumerate() {
            if platform.width() <= 0.0 || platform.height() <= 0.0 {
                return Err(StageError::DegeneratePlatform { index });
            }
        }
        let encloses = platforms.iter().all(|p| {
            p.left > blast_zone.left
                && p.right < blast_zone.right
                && p.top < blast_zone.top
                && p.bottom > blast_zone.bottom
        });
        if !encloses {
            return Err(StageError::InvalidBlastZone);
        }

        Ok(Self {
            platforms,
            blast_zone,
        })
    }

    /// Стандартный stage: main platform + 3 pass-through платформы
    pub fn battlefield() -> Self {
        Self {
            platforms: vec![
                Platform::solid(-300.0, 300.0, 0.0, -60.0),
                Platform::pass_through(-190.0, -70.0, 90.0),
                Platform::pass_through(70.0, 190.0, 90.0),
                Platform::pass_through(-60.0, 60.0, 180.0),
            ],
            blast_zone: BlastZone {
                left: -900.0,
                right: 900.0,
                top: 800.0,
                bottom: -600.0,
            },
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn blast_zone(&self) -> &BlastZone {
        &self.blast_zone
    }

    /// Main stage (наибольшая площадь, первая при равенстве).
    ///
    /// Пустой список: нарушение контракта host: падаем в debug/test сборке.
    pub fn main_platform(&self) -> Option<&Platform> {
        debug_assert!(!self.platforms.is_empty(), "stage geometry without platforms");

        let mut best: Option<&Platform> = None;
        for platform in &self.platforms {
            match best {
                Some(current) if platform.area() <= current.area() => {}
                _ => best = Some(platform),
            }
        }
        best
    }
}

impl Default for StageGeometry {
    fn default() -> Self {
        Self::battlefield()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_platform_is_largest() {
        let stage = StageGeometry::battlefield();
        let main = stage.main_platform().unwrap();
        assert_eq!(main.kind, PlatformKind::Solid);
        assert_eq!(main.width(), 600.0);
    }

    fn wide_blast() -> BlastZone {
        BlastZone {
            left: -1000.0,
            right: 1000.0,
            top: 1000.0,
            bottom: -1000.0,
        }
    }

    #[test]
    fn test_main_platform_tie_keeps_first() {
        let blast = wide_blast();
        let stage = StageGeometry::new(
            vec![
                Platform::solid(-100.0, 0.0, 0.0, -10.0),
                Platform::solid(0.0, 100.0, 0.0, -10.0),
            ],
            blast,
        )
        .unwrap();
        assert_eq!(stage.main_platform().unwrap().left, -100.0);
    }

    #[test]
    fn test_new_rejects_empty() {
        let blast = wide_blast();
        assert_eq!(StageGeometry::new(vec![], blast), Err(StageError::NoPlatforms));
    }

    #[test]
    fn test_new_rejects_degenerate_platform() {
        let blast = wide_blast();
        let result = StageGeometry::new(vec![Platform::solid(10.0, 10.0, 0.0, -10.0)], blast);
        assert_eq!(result, Err(StageError::DegeneratePlatform { index: 0 }));
    }

    #[test]
    fn test_new_rejects_blast_zone_inside_stage() {
        let blast = BlastZone {
            left: -50.0,
            ..wide_blast()
        };
        let result = StageGeometry::new(vec![Platform::solid(-100.0, 100.0, 0.0, -10.0)], blast);
        assert_eq!(result, Err(StageError::InvalidBlastZone));
    }

    #[test]
    fn test_blast_zone_inset() {
        let blast = StageGeometry::battlefield().blast_zone;
        assert!(blast.is_within_inset(Vec2::new(-880.0, 0.0), 50.0));
        assert!(blast.is_within_inset(Vec2::new(0.0, -560.0), 50.0));
        assert!(!blast.is_within_inset(Vec2::new(0.0, 0.0), 50.0));
    }

    #[test]
    fn test_nearest_edge() {
        let platform = Platform::solid(-300.0, 300.0, 0.0, -60.0);
        assert_eq!(platform.nearest_edge_x(-10.0), -300.0);
        assert_eq!(platform.nearest_edge_x(10.0), 300.0);
        assert_eq!(platform.distance_to_nearest_edge(250.0), 50.0);
    }
}
