//! # Bond Mechanics Module
//!
//! This module provides the force, torque, and heat computations at the heart
//! of Sinter's bonded-particle model. It implements the per-bond pipeline from
//! raw pair kinematics to deposited loads and failure decisions.
//!
//! ## Overview
//!
//! The mechanics module turns the state of two bonded particles into the loads
//! the bond exerts on them. It supports:
//!
//! - **Four elastic channels** resisting stretch, shear, twist, and bend
//! - **Velocity-proportional damping** per channel, with exact power accounting
//! - **Heat generation and conduction** when thermal coupling is enabled
//! - **Irreversible breakage** with configurable channel combination rules
//! - **Load smoothing** that fades elastic response toward the failure surface
//!
//! ## Key Components
//!
//! - [`params`] - Bond type coefficient sets, validation, and TOML loading
//! - [`kinematics`] - Deformation and rate extraction relative to the rest geometry
//! - [`elastic`] / [`damping`] - Per-channel load kernels
//! - [`thermal`] - Heat generation, splitting, and conduction
//! - [`breakage`] - Failure metric combination rules
//! - [`model`] - The [`model::BondModel`] trait tying the pipeline together
//! - [`contribution`] - The per-bond output deposited onto the pair
//!
//! ## Usage
//!
//! The main entry point is [`model::BondModel::evaluate`], reached through a
//! bond type's [`model::BondModelKind`]:
//!
//! ```ignore
//! use sinter::core::mechanics::{kinematics, model::EvalSettings};
//!
//! let kin = kinematics::extract(pa, pb, bond.reference(), min_separation);
//! let eval = params.model.model().evaluate(&kin, &params, &settings, None);
//! ```

pub mod breakage;
pub mod contribution;
pub mod damping;
pub mod elastic;
pub mod kinematics;
pub mod model;
pub mod params;
pub mod thermal;
