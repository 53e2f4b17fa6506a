//! # Workflows Module
//!
//! This module provides high-level workflow implementations that orchestrate
//! complete simulation runs for bonded-particle systems in Sinter.
//!
//! ## Overview
//!
//! Workflows are the top-level entry points for users of Sinter. They
//! encapsulate an entire run, from input validation through time integration
//! to final summary, handling progress reporting and periodic checkpointing
//! along the way, and provide a clean API for hosts that do not bring their
//! own integrator.
//!
//! ## Architecture
//!
//! The module is organized around specific simulation workflows:
//!
//! - **Simulation Workflow** ([`simulate`]) - Complete time integration of a
//!   bonded scene, including bond sweeps, particle updates, breakage
//!   reporting, and restart snapshots.
//!
//! ## Key Capabilities
//!
//! - **End-to-end runs** from assembled scene to final particle state
//! - **Progress monitoring** with phase, step, and bond-failure reporting
//! - **Exact restarts** through periodic binary checkpoints
//! - **Deterministic execution** reproducing identical trajectories for
//!   identical inputs, interrupted or not

pub mod simulate;
