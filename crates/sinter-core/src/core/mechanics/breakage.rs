use super::elastic::ElasticForces;
use super::params::BondTypeParams;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static BREAK_RULE_NAMES: Map<&'static str, BreakRule> = phf_map! {
    "sum" => BreakRule::Sum,
    "max" => BreakRule::Max,
    "quadratic" => BreakRule::Quadratic,
    "rss" => BreakRule::Quadratic,
};

/// How per-channel load ratios combine into the scalar failure metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakRule {
    /// Sum of all ratios; channels weaken each other linearly.
    #[default]
    Sum,
    /// Worst single channel decides.
    Max,
    /// Root sum of squares; an elliptical failure surface.
    Quadratic,
}

#[derive(Debug, Error)]
#[error("Invalid break rule string")]
pub struct ParseBreakRuleError;

impl FromStr for BreakRule {
    type Err = ParseBreakRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BREAK_RULE_NAMES
            .get(s.to_ascii_lowercase().as_str())
            .copied()
            .ok_or(ParseBreakRuleError)
    }
}

impl fmt::Display for BreakRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BreakRule::Sum => "sum",
                BreakRule::Max => "max",
                BreakRule::Quadratic => "quadratic",
            }
        )
    }
}

/// Combines raw per-channel elastic loads into the scalar failure metric.
///
/// Each channel contributes its load divided by the critical load of that
/// channel. Only tension loads the normal ratio, so compressed bonds cannot
/// fail through the normal channel. When a temperature is supplied and the
/// bond type carries a thermal block, a weakening ratio proportional to both
/// tension and temperature joins the combination.
pub fn combined_metric(
    loads: &ElasticForces,
    params: &BondTypeParams,
    temperature: Option<f64>,
) -> f64 {
    let thermal_ratio = match (temperature, &params.thermal) {
        (Some(t), Some(tp)) => (loads.tension / tp.fch) * (t / tp.t_ref),
        _ => 0.0,
    };

    let ratios = [
        loads.tension / params.fcr,
        loads.shear_mag / params.fcs,
        loads.twist_mag / params.tct,
        loads.bend_mag / params.tcb,
        thermal_ratio,
    ];

    match params.break_rule {
        BreakRule::Sum => ratios.iter().sum(),
        BreakRule::Max => ratios.iter().fold(0.0, |acc, r| r.max(acc)),
        BreakRule::Quadratic => ratios.iter().map(|r| r * r).sum::<f64>().sqrt(),
    }
}

/// Whether a failure metric trips the bond. The inequality is strict, so a
/// bond loaded exactly to its failure surface survives.
#[inline]
pub fn breaks(metric: f64) -> bool {
    metric > 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mechanics::model::BondModelKind;
    use crate::core::mechanics::params::ThermalParams;

    const TOLERANCE: f64 = 1e-12;

    fn params_with(rule: BreakRule) -> BondTypeParams {
        BondTypeParams {
            kr: 100.0,
            ks: 80.0,
            kt: 30.0,
            kb: 40.0,
            gnorm: 0.0,
            gslide: 0.0,
            groll: 0.0,
            gtwist: 0.0,
            fcr: 10.0,
            fcs: 8.0,
            tct: 5.0,
            tcb: 5.0,
            break_rule: rule,
            model: BondModelKind::Rotational,
            thermal: None,
        }
    }

    fn loads(tension: f64, shear: f64, twist: f64, bend: f64) -> ElasticForces {
        ElasticForces {
            tension,
            shear_mag: shear,
            twist_mag: twist,
            bend_mag: bend,
            ..Default::default()
        }
    }

    #[test]
    fn sum_rule_adds_all_channel_ratios() {
        let params = params_with(BreakRule::Sum);
        let metric = combined_metric(&loads(5.0, 4.0, 1.0, 2.0), &params, None);
        // 0.5 + 0.5 + 0.2 + 0.4
        assert!((metric - 1.6).abs() < TOLERANCE);
    }

    #[test]
    fn max_rule_takes_the_worst_channel() {
        let params = params_with(BreakRule::Max);
        let metric = combined_metric(&loads(5.0, 4.0, 1.0, 4.5), &params, None);
        assert!((metric - 0.9).abs() < TOLERANCE);
    }

    #[test]
    fn quadratic_rule_forms_an_elliptical_surface() {
        let params = params_with(BreakRule::Quadratic);
        // Ratios 0.6 and 0.8 lie exactly on the unit circle.
        let metric = combined_metric(&loads(6.0, 6.4, 0.0, 0.0), &params, None);
        assert!((metric - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn overload_in_a_single_channel_trips_the_metric() {
        let params = params_with(BreakRule::Sum);
        // Tension of 20 against a critical force of 10.
        let metric = combined_metric(&loads(20.0, 0.0, 0.0, 0.0), &params, None);
        assert!((metric - 2.0).abs() < TOLERANCE);
        assert!(breaks(metric));
    }

    #[test]
    fn breaking_is_strict_at_the_surface() {
        assert!(!breaks(1.0));
        assert!(breaks(1.0 + 1e-9));
        assert!(!breaks(0.999_999));
    }

    #[test]
    fn thermal_term_weakens_hot_tense_bonds() {
        let mut params = params_with(BreakRule::Sum);
        params.thermal = Some(ThermalParams {
            kh: 1.0,
            fch: 20.0,
            kcond: 0.0,
            t_ref: 300.0,
        });

        let cold = combined_metric(&loads(20.0, 0.0, 0.0, 0.0), &params, Some(0.0));
        let hot = combined_metric(&loads(20.0, 0.0, 0.0, 0.0), &params, Some(600.0));
        // (20/20) * (600/300) adds 2.0 on top of the tension ratio.
        assert!((cold - 2.0).abs() < TOLERANCE);
        assert!((hot - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn thermal_term_requires_both_block_and_temperature() {
        let mut with_block = params_with(BreakRule::Sum);
        with_block.thermal = Some(ThermalParams {
            kh: 1.0,
            fch: 20.0,
            kcond: 0.0,
            t_ref: 300.0,
        });
        let without_block = params_with(BreakRule::Sum);

        let base = loads(20.0, 0.0, 0.0, 0.0);
        assert!((combined_metric(&base, &with_block, None) - 2.0).abs() < TOLERANCE);
        assert!((combined_metric(&base, &without_block, Some(600.0)) - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn compression_does_not_accumulate_toward_failure() {
        let params = params_with(BreakRule::Sum);
        // Tension is floored at zero upstream, so only the other channels count.
        let metric = combined_metric(&loads(0.0, 4.0, 0.0, 0.0), &params, None);
        assert!((metric - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn from_str_parses_known_rules_case_insensitively() {
        assert_eq!("sum".parse::<BreakRule>().unwrap(), BreakRule::Sum);
        assert_eq!("Max".parse::<BreakRule>().unwrap(), BreakRule::Max);
        assert_eq!(
            "QUADRATIC".parse::<BreakRule>().unwrap(),
            BreakRule::Quadratic
        );
        assert_eq!("rss".parse::<BreakRule>().unwrap(), BreakRule::Quadratic);
        assert!("melt".parse::<BreakRule>().is_err());
    }

    #[test]
    fn display_names_parse_back() {
        for rule in [BreakRule::Sum, BreakRule::Max, BreakRule::Quadratic] {
            assert_eq!(rule.to_string().parse::<BreakRule>().unwrap(), rule);
        }
    }

    #[test]
    fn default_rule_is_sum() {
        assert_eq!(BreakRule::default(), BreakRule::Sum);
    }
}
