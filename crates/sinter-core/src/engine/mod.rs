//! # Engine Module
//!
//! This module implements the force engine of Sinter: the machinery that
//! sweeps bonds against particle state, accumulates loads, and retires
//! failed bonds, step after step.
//!
//! ## Overview
//!
//! The engine sits between the pure mechanics kernels and host integrators.
//! It owns the run-wide configuration, resolves bond types to coefficient
//! sets, and guarantees deterministic results: evaluation happens against an
//! immutable state snapshot and all mutation folds in bond creation order.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules:
//!
//! - **Configuration** ([`config`]) - Run-wide flags with a validating builder
//! - **Accumulation** ([`accumulator`]) - Per-particle force, torque, and heat deposits
//! - **Evaluation** ([`evaluator`]) - The two-phase bond sweep and single-bond probe
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for long runs
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Key Capabilities
//!
//! - **Deterministic sweeps** with bit-identical results for identical state
//! - **Parallel evaluation** of the pure phase behind the `parallel` feature
//! - **Irreversible breakage** folded serially so failure order is stable
//! - **Separation of concerns** leaving time integration to the host

pub mod accumulator;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod progress;
