//! Provides input/output functionality for simulation scenes and restarts.
//!
//! This module contains the binary checkpoint codec used for exact-restart
//! snapshots and the text-based scene loader that assembles a particle
//! system, bond list, and coefficient table from CSV and TOML inputs.

pub mod checkpoint;
pub mod scene;
