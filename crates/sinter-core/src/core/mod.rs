//! # Core Module
//!
//! This module provides the fundamental building blocks and algorithms for
//! bonded-particle mechanics in Sinter, serving as the computational core of
//! the library.
//!
//! ## Overview
//!
//! The core module implements the essential data structures, kernels, and
//! utilities required to evaluate breakable bonds between rigid particles. It
//! provides a complete framework for representing particle systems, measuring
//! bond deformation, computing forces, torques, and heat, and persisting run
//! state for exact restarts.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the bond model:
//!
//! - **System Representation** ([`models`]) - Data structures for particles, bonds, and stable IDs
//! - **Bond Mechanics** ([`mechanics`]) - Deformation measures, force laws, breakage, and heat
//! - **File I/O** ([`io`]) - Scene loading and the binary restart codec
//!
//! ## Key Capabilities
//!
//! - **Rest-state reference geometry** captured once at bond creation
//! - **Frame-indifferent deformation measures** for stretch, shear, twist, and bend
//! - **Elastic and dissipative force laws** with per-type coefficient tables
//! - **Irreversible breakage** with configurable load-combination rules
//! - **Heat generation and conduction** along bonded pairs
//! - **Bit-exact checkpointing** of bonds, types, and engine settings
//!
//! ## Physical Foundation
//!
//! The kernels implement a bonded-particle model in the classical DEM
//! tradition:
//!
//! - **Pairwise beam-like bonds** resisting stretch, shear, twist, and bend
//! - **Velocity-proportional damping** acting on relative pair motion
//! - **Brittle failure criteria** combining normalized channel loads
//! - **Dissipation-driven heating** partitioned between bond partners

pub mod io;
pub mod mechanics;
pub mod models;
