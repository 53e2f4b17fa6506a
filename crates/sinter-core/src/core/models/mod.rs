//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent a
//! bonded-particle system in Sinter, providing the foundation for all force,
//! breakage, and restart operations.
//!
//! ## Overview
//!
//! The models module defines the core abstractions for particle and bond
//! state. These models are designed to:
//!
//! - **Represent body state** - Position, orientation, velocities, and temperature per particle
//! - **Freeze rest geometry** - Each bond snapshots its creation-time geometry for frame-invariant deformation measures
//! - **Track failure irreversibly** - Broken bonds stay broken, published through an atomic flag
//! - **Keep iteration deterministic** - Bonds live in creation order, the canonical order for sweeps and restarts
//!
//! ## Key Components
//!
//! - [`particle`] - Rigid-body state of a single particle
//! - [`system`] - Slot-map backed container of all particles
//! - [`bond`] - Breakable bonds, their reference geometry, and the bond store
//! - [`ids`] - Identifier types for particles and bond types

pub mod bond;
pub mod ids;
pub mod particle;
pub mod system;
