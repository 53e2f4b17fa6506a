//! # Sinter Core Library
//!
//! A high-performance library for bonded-particle mechanics: breakable bonds
//! between rigid particles with elastic, dissipative, and thermal response.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`ParticleSystem`, `BondStore`), pure mechanics kernels (deformation,
//!   force laws, breakage, heat), and I/O utilities for scenes and restarts.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer orchestrates bond
//!   evaluation. It owns the run-wide configuration, sweeps every bond
//!   against a state snapshot, accumulates per-particle loads
//!   deterministically, and retires bonds that fail.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level,
//!   user-facing layer. It ties the `engine` and `core` together to execute
//!   complete simulations: time integration, periodic checkpointing, and
//!   resumption from a saved snapshot.

pub mod core;
pub mod engine;
pub mod workflows;
