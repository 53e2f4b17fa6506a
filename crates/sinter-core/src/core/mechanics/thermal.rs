use serde::Deserialize;

/// How the heat generated by one bond is divided between its partners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatSplit {
    /// Half to each partner.
    #[default]
    Even,
    /// The given share to the first partner, the remainder to the second.
    Fraction(f64),
}

impl HeatSplit {
    /// Divides a heat quantity between the two partners.
    ///
    /// The two shares always sum to the input, so splitting conserves energy
    /// regardless of the policy.
    pub fn split(&self, heat: f64) -> (f64, f64) {
        match self {
            HeatSplit::Even => (0.5 * heat, 0.5 * heat),
            HeatSplit::Fraction(share) => (share * heat, (1.0 - share) * heat),
        }
    }
}

/// Heat generated from dissipated mechanical power.
pub fn dissipation_heat(power: f64, kh: f64) -> f64 {
    kh * power
}

/// Conductive heat flowing into the first partner from the second.
///
/// Positive when the second partner is hotter, so heat always runs down the
/// temperature gradient for a non-negative conductance.
pub fn conduction(kcond: f64, temp_a: f64, temp_b: f64) -> f64 {
    kcond * (temp_b - temp_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn even_split_halves_the_heat() {
        let (qa, qb) = HeatSplit::Even.split(45.0);
        assert_eq!(qa, 22.5);
        assert_eq!(qb, 22.5);
    }

    #[test]
    fn fraction_split_respects_the_share() {
        let (qa, qb) = HeatSplit::Fraction(0.75).split(8.0);
        assert!((qa - 6.0).abs() < TOLERANCE);
        assert!((qb - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn any_split_conserves_the_total() {
        for policy in [HeatSplit::Even, HeatSplit::Fraction(0.3), HeatSplit::Fraction(1.0)] {
            let (qa, qb) = policy.split(13.7);
            assert!((qa + qb - 13.7).abs() < TOLERANCE);
        }
    }

    #[test]
    fn dissipation_heat_scales_power_by_kh() {
        assert_eq!(dissipation_heat(45.0, 1.0), 45.0);
        assert_eq!(dissipation_heat(45.0, 0.5), 22.5);
        assert_eq!(dissipation_heat(10.0, 0.0), 0.0);
    }

    #[test]
    fn conduction_runs_down_the_temperature_gradient() {
        // Hotter second partner heats the first.
        assert!(conduction(0.5, 300.0, 400.0) > 0.0);
        // Hotter first partner loses heat.
        assert!(conduction(0.5, 400.0, 300.0) < 0.0);
        // Equal temperatures exchange nothing.
        assert_eq!(conduction(0.5, 350.0, 350.0), 0.0);
        assert_eq!(conduction(0.5, 300.0, 400.0), 50.0);
    }

    #[test]
    fn heat_split_deserializes_from_toml_forms() {
        #[derive(Deserialize)]
        struct Probe {
            split: HeatSplit,
        }

        let even: Probe = toml::from_str(r#"split = "even""#).unwrap();
        assert_eq!(even.split, HeatSplit::Even);

        let fraction: Probe = toml::from_str("split = { fraction = 0.7 }").unwrap();
        assert_eq!(fraction.split, HeatSplit::Fraction(0.7));
    }
}
