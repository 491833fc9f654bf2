//! Tests for DifficultyProfile presets and interpolation.

#[cfg(test)]
mod tests {
    use super::super::difficulty::{DifficultyLevel, DifficultyProfile};

    fn bands() -> Vec<DifficultyProfile> {
        DifficultyLevel::ALL
            .iter()
            .map(|level| DifficultyProfile::preset(*level))
            .collect()
    }

    #[test]
    fn test_reaction_strictly_decreases_across_bands() {
        let profiles = bands();
        for pair in profiles.windows(2) {
            assert!(pair[1].reaction_time_base < pair[0].reaction_time_base);
            assert!(pair[1].reaction_time_variance < pair[0].reaction_time_variance);
        }
    }

    #[test]
    fn test_skills_strictly_increase_across_bands() {
        let profiles = bands();
        for pair in profiles.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            assert!(hi.decision_quality > lo.decision_quality);
            assert!(hi.execution_precision > lo.execution_precision);
            assert!(hi.risk_tolerance > lo.risk_tolerance);
            assert!(hi.combo_proficiency > lo.combo_proficiency);
            assert!(hi.adaptability > lo.adaptability);
            assert!(hi.recovery_skill > lo.recovery_skill);
            assert!(hi.tech_skill > lo.tech_skill);
        }
    }

    #[test]
    fn test_from_scalar_bands() {
        assert_eq!(DifficultyLevel::from_scalar(0.0), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_scalar(0.3), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::from_scalar(0.6), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::from_scalar(1.0), DifficultyLevel::Expert);
        assert_eq!(DifficultyLevel::from_scalar(-4.0), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_scalar(f32::NAN), DifficultyLevel::Medium);
    }

    #[test]
    fn test_interpolated_hits_anchors() {
        for level in DifficultyLevel::ALL {
            let interpolated = DifficultyProfile::interpolated(level.anchor());
            let preset = DifficultyProfile::preset(level);
            assert!((interpolated.reaction_time_base - preset.reaction_time_base).abs() < 1e-3);
            assert!((interpolated.decision_quality - preset.decision_quality).abs() < 1e-4);
        }
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(
            DifficultyProfile::default(),
            DifficultyProfile::preset(DifficultyLevel::Medium)
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: interpolation monotonic по всей шкале
            #[test]
            fn prop_interpolated_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let p_lo = DifficultyProfile::interpolated(lo);
                let p_hi = DifficultyProfile::interpolated(hi);
                prop_assert!(p_hi.reaction_time_base <= p_lo.reaction_time_base + 1e-4);
                prop_assert!(p_hi.decision_quality + 1e-5 >= p_lo.decision_quality);
                prop_assert!(p_hi.recovery_skill + 1e-5 >= p_lo.recovery_skill);
            }

            /// Property: все normalized поля в [0, 1]
            #[test]
            fn prop_fields_normalized(d in -2.0f32..3.0) {
                let profiles = [
                    DifficultyProfile::interpolated(d),
                    DifficultyProfile::from_scalar(d),
                ];
                for profile in profiles {
                    for value in [
                        profile.decision_quality,
                        profile.execution_precision,
                        profile.risk_tolerance,
                        profile.combo_proficiency,
                        profile.adaptability,
                        profile.recovery_skill,
                        profile.tech_skill,
                    ] {
                        prop_assert!((0.0..=1.0).contains(&value));
                    }
                    prop_assert!(profile.reaction_time_base > 0.0);
                }
            }
        }
    }
}
