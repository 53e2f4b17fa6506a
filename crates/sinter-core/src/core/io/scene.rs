use crate::core::mechanics::params::{BondTypeTable, ParamError};
use crate::core::models::bond::{Bond, BondError, BondStore};
use crate::core::models::ids::{BondTypeId, ParticleId};
use crate::core::models::particle::Particle;
use crate::core::models::system::ParticleSystem;
use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Orientation columns with a norm below this are treated as absent garbage.
const ORIENTATION_EPSILON: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Bond type table error: {0}")]
    Params(#[from] ParamError),
    #[error("Particle row {row}: {name} must be positive, got {value}")]
    NonPositiveQuantity {
        row: usize,
        name: &'static str,
        value: f64,
    },
    #[error("Particle row {row}: orientation quaternion has zero norm")]
    ZeroOrientation { row: usize },
    #[error("Bond row {row} references particle {index}, but the scene has {count} particles")]
    ParticleIndexOutOfRange {
        row: usize,
        index: usize,
        count: usize,
    },
    #[error("Bond row {row} references bond type {type_id}, which the type table does not define")]
    UndefinedBondType { row: usize, type_id: BondTypeId },
    #[error("Failed to create bond from row {row}: {source}")]
    Bond { row: usize, source: BondError },
}

/// One record of a scene's `particles.csv`.
///
/// Only the position columns are required. Velocities and spins default to
/// zero, the orientation to identity, and mass, inertia, and heat capacity
/// to one, so minimal scenes stay minimal.
#[derive(Debug, Deserialize, Serialize)]
pub struct ParticleRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    #[serde(default)]
    pub vz: f64,
    #[serde(default)]
    pub wx: f64,
    #[serde(default)]
    pub wy: f64,
    #[serde(default)]
    pub wz: f64,
    #[serde(default = "default_unit")]
    pub qw: f64,
    #[serde(default)]
    pub qx: f64,
    #[serde(default)]
    pub qy: f64,
    #[serde(default)]
    pub qz: f64,
    #[serde(default = "default_unit")]
    pub mass: f64,
    #[serde(default = "default_unit")]
    pub inertia: f64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_unit")]
    pub heat_capacity: f64,
}

/// One record of a scene's `bonds.csv`.
///
/// Partners are zero-based row indices into `particles.csv`.
#[derive(Debug, Deserialize)]
pub struct BondRow {
    pub a: usize,
    pub b: usize,
    pub type_id: u32,
}

fn default_unit() -> f64 {
    1.0
}

impl ParticleRow {
    fn from_particle(particle: &Particle) -> Self {
        let orientation = particle.orientation.as_ref();
        Self {
            x: particle.position.x,
            y: particle.position.y,
            z: particle.position.z,
            vx: particle.velocity.x,
            vy: particle.velocity.y,
            vz: particle.velocity.z,
            wx: particle.angular_velocity.x,
            wy: particle.angular_velocity.y,
            wz: particle.angular_velocity.z,
            qw: orientation.w,
            qx: orientation.i,
            qy: orientation.j,
            qz: orientation.k,
            mass: particle.mass,
            inertia: particle.inertia,
            temperature: particle.temperature,
            heat_capacity: particle.heat_capacity,
        }
    }
}

/// A fully assembled simulation input: particles, bonds, and coefficients.
///
/// Loaded from the conventional three-file layout of a scene directory:
/// `particles.csv`, `bonds.csv`, and `types.toml`. The `particle_ids` vector
/// preserves CSV row order so hosts can report state back in the order the
/// scene author wrote it.
#[derive(Debug, Clone)]
pub struct Scene {
    pub system: ParticleSystem,
    pub bonds: BondStore,
    pub types: BondTypeTable,
    pub particle_ids: Vec<ParticleId>,
}

impl Scene {
    /// Loads a scene from explicit particle, bond, and type table paths.
    ///
    /// # Arguments
    ///
    /// * `particles_path` - CSV of [`ParticleRow`] records.
    /// * `bonds_path` - CSV of [`BondRow`] records.
    /// * `types_path` - TOML bond type table (see [`BondTypeTable::load`]).
    ///
    /// # Errors
    ///
    /// Returns a `SceneError` if any file fails to parse, a particle row
    /// carries a non-positive mass, inertia, or heat capacity, or a bond row
    /// references a missing particle or an undefined bond type.
    pub fn load(
        particles_path: &Path,
        bonds_path: &Path,
        types_path: &Path,
    ) -> Result<Self, SceneError> {
        let types = BondTypeTable::load(types_path)?;
        let (system, particle_ids) = load_particles(particles_path)?;
        let bonds = load_bonds(bonds_path, &system, &particle_ids, &types)?;

        Ok(Self {
            system,
            bonds,
            types,
            particle_ids,
        })
    }

    /// Loads a scene from a directory using the conventional file names
    /// `particles.csv`, `bonds.csv`, and `types.toml`.
    ///
    /// # Errors
    ///
    /// See [`Scene::load`].
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SceneError> {
        let dir = dir.as_ref();
        Self::load(
            &dir.join("particles.csv"),
            &dir.join("bonds.csv"),
            &dir.join("types.toml"),
        )
    }
}

/// Writes particle state as a particles CSV, one row per entry of `ids`.
///
/// The output uses the same column layout [`Scene::load`] reads, so a saved
/// state can seed a follow-up scene directly. IDs that are no longer present
/// in the system are skipped.
///
/// # Errors
///
/// Returns `SceneError::Csv` if a record fails to serialize and
/// `SceneError::Io` if the file cannot be created or flushed.
pub fn save_particles(
    path: &Path,
    system: &ParticleSystem,
    ids: &[ParticleId],
) -> Result<(), SceneError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| SceneError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    for &id in ids {
        if let Some(particle) = system.particle(id) {
            writer
                .serialize(ParticleRow::from_particle(particle))
                .map_err(|e| SceneError::Csv {
                    path: path.to_string_lossy().to_string(),
                    source: e,
                })?;
        }
    }
    writer.flush().map_err(|e| SceneError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    Ok(())
}

fn load_particles(path: &Path) -> Result<(ParticleSystem, Vec<ParticleId>), SceneError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| SceneError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let mut system = ParticleSystem::new();
    let mut ids = Vec::new();
    for (index, result) in reader.deserialize::<ParticleRow>().enumerate() {
        let row = result.map_err(|e| SceneError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let particle = particle_from_row(index + 1, row)?;
        ids.push(system.add_particle(particle));
    }
    Ok((system, ids))
}

fn particle_from_row(row_number: usize, row: ParticleRow) -> Result<Particle, SceneError> {
    for (name, value) in [
        ("mass", row.mass),
        ("inertia", row.inertia),
        ("heat_capacity", row.heat_capacity),
    ] {
        if !(value > 0.0) {
            return Err(SceneError::NonPositiveQuantity {
                row: row_number,
                name,
                value,
            });
        }
    }

    let quat = Quaternion::new(row.qw, row.qx, row.qy, row.qz);
    if quat.norm() < ORIENTATION_EPSILON {
        return Err(SceneError::ZeroOrientation { row: row_number });
    }

    let mut particle = Particle::new(Point3::new(row.x, row.y, row.z));
    particle.orientation = UnitQuaternion::from_quaternion(quat);
    particle.velocity = Vector3::new(row.vx, row.vy, row.vz);
    particle.angular_velocity = Vector3::new(row.wx, row.wy, row.wz);
    particle.mass = row.mass;
    particle.inertia = row.inertia;
    particle.temperature = row.temperature;
    particle.heat_capacity = row.heat_capacity;
    Ok(particle)
}

fn load_bonds(
    path: &Path,
    system: &ParticleSystem,
    ids: &[ParticleId],
    types: &BondTypeTable,
) -> Result<BondStore, SceneError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| SceneError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let mut bonds = BondStore::new();
    for (index, result) in reader.deserialize::<BondRow>().enumerate() {
        let row_number = index + 1;
        let row = result.map_err(|e| SceneError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let a = resolve_partner(row_number, row.a, ids)?;
        let b = resolve_partner(row_number, row.b, ids)?;
        let type_id = BondTypeId(row.type_id);
        if !types.contains(type_id) {
            return Err(SceneError::UndefinedBondType {
                row: row_number,
                type_id,
            });
        }

        let bond = Bond::create(system, a, b, type_id).map_err(|source| SceneError::Bond {
            row: row_number,
            source,
        })?;
        bonds.push(bond);
    }
    Ok(bonds)
}

fn resolve_partner(
    row_number: usize,
    index: usize,
    ids: &[ParticleId],
) -> Result<ParticleId, SceneError> {
    ids.get(index)
        .copied()
        .ok_or(SceneError::ParticleIndexOutOfRange {
            row: row_number,
            index,
            count: ids.len(),
        })
}
