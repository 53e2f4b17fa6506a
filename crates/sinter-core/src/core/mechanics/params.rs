use super::breakage::BreakRule;
use super::model::BondModelKind;
use crate::core::models::ids::BondTypeId;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Thermal coupling coefficients of a bond type.
///
/// Presence of this block switches on heat generation, conduction, and
/// thermal weakening for bonds of the type, provided the engine's global
/// heat flag is also set.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThermalParams {
    /// Fraction of dissipated mechanical power converted into heat.
    pub kh: f64,
    /// Tension scale of the thermal weakening term in the breakage metric.
    pub fch: f64,
    /// Thermal conductance of the bond for partner-to-partner heat exchange.
    #[serde(default)]
    pub kcond: f64,
    /// Reference temperature normalizing the thermal weakening term.
    pub t_ref: f64,
}

/// The full coefficient set of one bond type.
///
/// Stiffnesses and damping coefficients may be zero to disable a channel;
/// breakage thresholds must be strictly positive because they appear as
/// denominators in the failure metric.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BondTypeParams {
    /// Normal (stretch) stiffness.
    pub kr: f64,
    /// Tangential (shear) stiffness.
    pub ks: f64,
    /// Twisting stiffness about the bond axis.
    pub kt: f64,
    /// Bending stiffness perpendicular to the bond axis.
    pub kb: f64,
    /// Normal damping coefficient.
    pub gnorm: f64,
    /// Sliding (tangential) damping coefficient.
    pub gslide: f64,
    /// Rolling damping coefficient.
    pub groll: f64,
    /// Twisting damping coefficient.
    pub gtwist: f64,
    /// Critical normal force.
    pub fcr: f64,
    /// Critical shear force.
    pub fcs: f64,
    /// Critical twisting torque.
    pub tct: f64,
    /// Critical bending torque.
    pub tcb: f64,
    /// How the per-channel load ratios combine into one failure metric.
    #[serde(default)]
    pub break_rule: BreakRule,
    /// Which mechanical formulation bonds of this type respond with.
    #[serde(default)]
    pub model: BondModelKind,
    /// Optional thermal coupling block.
    #[serde(default)]
    pub thermal: Option<ThermalParams>,
}

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Bond type key '{key}' in '{path}' is not a valid integer id")]
    InvalidTypeId { path: String, key: String },
    #[error("Bond type {type_id}: coefficient '{name}' must be finite and non-negative, got {value}")]
    NegativeCoefficient {
        type_id: BondTypeId,
        name: &'static str,
        value: f64,
    },
    #[error("Bond type {type_id}: threshold '{name}' must be finite and strictly positive, got {value}")]
    NonPositiveThreshold {
        type_id: BondTypeId,
        name: &'static str,
        value: f64,
    },
}

impl BondTypeParams {
    /// Checks every coefficient against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::NegativeCoefficient` for a stiffness or damping
    /// coefficient that is negative or non-finite, and
    /// `ParamError::NonPositiveThreshold` for a breakage threshold (or
    /// thermal scale) that is not strictly positive.
    pub fn validate(&self, type_id: BondTypeId) -> Result<(), ParamError> {
        let non_negative = [
            ("kr", self.kr),
            ("ks", self.ks),
            ("kt", self.kt),
            ("kb", self.kb),
            ("gnorm", self.gnorm),
            ("gslide", self.gslide),
            ("groll", self.groll),
            ("gtwist", self.gtwist),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamError::NegativeCoefficient {
                    type_id,
                    name,
                    value,
                });
            }
        }

        let positive = [
            ("fcr", self.fcr),
            ("fcs", self.fcs),
            ("tct", self.tct),
            ("tcb", self.tcb),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::NonPositiveThreshold {
                    type_id,
                    name,
                    value,
                });
            }
        }

        if let Some(thermal) = &self.thermal {
            for (name, value) in [("kh", thermal.kh), ("kcond", thermal.kcond)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ParamError::NegativeCoefficient {
                        type_id,
                        name,
                        value,
                    });
                }
            }
            for (name, value) in [("fch", thermal.fch), ("t_ref", thermal.t_ref)] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ParamError::NonPositiveThreshold {
                        type_id,
                        name,
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}

/// The registry of bond type coefficient sets, keyed by [`BondTypeId`].
///
/// The table is populated during configuration, either programmatically via
/// [`set_coefficients`](BondTypeTable::set_coefficients) or from a TOML file
/// via [`load`](BondTypeTable::load). Force evaluation borrows the table
/// immutably, so coefficients cannot change mid-sweep.
#[derive(Debug, Clone, Default)]
pub struct BondTypeTable {
    types: HashMap<BondTypeId, BondTypeParams>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondTypeFile {
    types: HashMap<String, BondTypeParams>,
}

impl BondTypeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers the coefficient set of one bond type.
    ///
    /// Registering an id twice replaces the previous set, which allows hosts
    /// to layer overrides on top of a file-loaded table before the first
    /// sweep.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the offending coefficient; the table
    /// is left unchanged in that case.
    pub fn set_coefficients(
        &mut self,
        type_id: BondTypeId,
        params: BondTypeParams,
    ) -> Result<(), ParamError> {
        params.validate(type_id)?;
        self.types.insert(type_id, params);
        Ok(())
    }

    /// Retrieves the coefficient set of a bond type.
    pub fn get(&self, type_id: BondTypeId) -> Option<&BondTypeParams> {
        self.types.get(&type_id)
    }

    /// Returns `true` if the table holds coefficients for the given type.
    pub fn contains(&self, type_id: BondTypeId) -> bool {
        self.types.contains_key(&type_id)
    }

    /// Returns the number of registered bond types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no bond types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over all registered types in ascending id order.
    ///
    /// This is the canonical order used by the restart codec.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (BondTypeId, &BondTypeParams)> {
        self.types
            .iter()
            .sorted_by_key(|(id, _)| **id)
            .map(|(id, params)| (*id, params))
    }

    /// Loads a table from a TOML file mapping type ids to coefficient sets.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Io` or `ParamError::Toml` for unreadable or
    /// malformed files, `ParamError::InvalidTypeId` for non-integer type
    /// keys, and the per-coefficient validation errors otherwise.
    pub fn load(path: &Path) -> Result<Self, ParamError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: BondTypeFile = toml::from_str(&content).map_err(|e| ParamError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut table = Self::new();
        for (key, params) in file.types {
            let id = key.parse::<u32>().map_err(|_| ParamError::InvalidTypeId {
                path: path.to_string_lossy().to_string(),
                key: key.clone(),
            })?;
            table.set_coefficients(BondTypeId(id), params)?;
        }
        Ok(table)
    }
}
