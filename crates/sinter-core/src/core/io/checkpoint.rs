//! Binary checkpoint codec for exact-restart snapshots.
//!
//! A checkpoint captures everything the force engine owns that a host
//! integrator cannot reconstruct on its own: the run-wide evaluation
//! settings, the full bond type table, and every bond with its reference
//! geometry, broken flag, and peak-load diagnostic. Particle state is the
//! host's to persist; restoring a checkpoint against the same particle
//! state resumes a run bond-for-bond identically.
//!
//! All scalars are encoded little-endian at fixed width, and `f64` fields
//! round-trip bit-for-bit. The layout is:
//!
//! ```text
//! magic "SNTRCKPT" | version u32
//! settings: smooth u8 | heat u8 | split tag u8 | split share f64 | min separation f64
//! types:    count u32 | fields-per-record u32
//!           records sorted by id: id u32 | model u8 | rule u8 | thermal u8 | 16 x f64
//! bonds:    count u64 | fields-per-record u32
//!           records in creation order: a u64 | b u64 | type u32 | broken u8 | 12 x f64
//! ```
//!
//! Readers reject unknown versions and per-record field counts outright
//! rather than guessing at a foreign layout.

use crate::core::mechanics::breakage::BreakRule;
use crate::core::mechanics::model::BondModelKind;
use crate::core::mechanics::params::{BondTypeParams, BondTypeTable, ParamError, ThermalParams};
use crate::core::mechanics::thermal::HeatSplit;
use crate::core::models::bond::{Bond, BondStore, ReferenceGeometry};
use crate::core::models::ids::{BondTypeId, ParticleId};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use slotmap::{Key, KeyData};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Identifies a byte stream as a sinter checkpoint.
const MAGIC: [u8; 8] = *b"SNTRCKPT";

/// The current checkpoint format version.
const FORMAT_VERSION: u32 = 1;

/// Number of `f64` fields in a bond type record.
const TYPE_FIELD_COUNT: u32 = 16;

/// Number of `f64` fields in a bond record.
const BOND_FIELD_COUNT: u32 = 12;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a checkpoint: bad magic bytes")]
    BadMagic,
    #[error("Unsupported checkpoint version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Field count mismatch in {section} section: expected {expected}, found {found}")]
    FieldCountMismatch {
        section: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("Unknown {what} tag: {value}")]
    UnknownTag { what: &'static str, value: u8 },
    #[error("Invalid coefficients in checkpoint: {0}")]
    InvalidParams(#[from] ParamError),
    #[error("Checkpoint records {written} bond types but the configured table defines {configured}")]
    TypeCountMismatch { written: usize, configured: usize },
    #[error("Bond type {0} is recorded in the checkpoint but missing from the configured table")]
    MissingType(BondTypeId),
    #[error("Coefficients for bond type {0} differ between the checkpoint and the configured table")]
    TypeMismatch(BondTypeId),
}

/// The engine settings a checkpoint carries alongside the bond state.
///
/// Mirrors the run-wide evaluation configuration so a resumed run evaluates
/// under exactly the flags the snapshot was taken under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckpointSettings {
    /// Whether near-failure smoothing was active.
    pub smooth: bool,
    /// Whether heat generation was active.
    pub heat: bool,
    /// How dissipated heat was split between bond partners.
    pub heat_split: HeatSplit,
    /// The enforced lower bound on bonded-pair separation.
    pub min_separation: f64,
}

/// A complete restart snapshot of the bond engine.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// The evaluation settings in effect when the snapshot was taken.
    pub settings: CheckpointSettings,
    /// The full bond type table, embedded for self-contained restarts.
    pub types: BondTypeTable,
    /// Every bond, broken ones included, in creation order.
    pub bonds: BondStore,
}

impl Checkpoint {
    /// Serializes the snapshot to a writer.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::Io` if writing fails.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), CheckpointError> {
        writer.write_all(&MAGIC)?;
        write_u32(writer, FORMAT_VERSION)?;
        self.write_settings(writer)?;
        self.write_types(writer)?;
        self.write_bonds(writer)?;
        Ok(())
    }

    /// Deserializes a snapshot from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not a checkpoint, uses an
    /// unsupported version or record layout, carries an unknown tag, fails
    /// coefficient validation, or ends prematurely.
    pub fn read_from(reader: &mut impl Read) -> Result<Self, CheckpointError> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(CheckpointError::BadMagic);
        }
        let version = read_u32(reader)?;
        if version != FORMAT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let settings = read_settings(reader)?;
        let types = read_types(reader)?;
        let bonds = read_bonds(reader)?;

        Ok(Self {
            settings,
            types,
            bonds,
        })
    }

    /// Serializes the snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::Io` if the file cannot be created or
    /// written in full.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its content fails
    /// to decode; see [`Checkpoint::read_from`].
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Checks that the embedded type table agrees with a configured one.
    ///
    /// Resumed runs may load coefficients from configuration as well as from
    /// the snapshot; this confirms both sources describe the same physics
    /// before the engine trusts either.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::TypeCountMismatch`, `MissingType`, or
    /// `TypeMismatch` describing the first disagreement found.
    pub fn verify_matches(&self, table: &BondTypeTable) -> Result<(), CheckpointError> {
        if self.types.len() != table.len() {
            return Err(CheckpointError::TypeCountMismatch {
                written: self.types.len(),
                configured: table.len(),
            });
        }
        for (type_id, written) in self.types.iter_sorted() {
            match table.get(type_id) {
                None => return Err(CheckpointError::MissingType(type_id)),
                Some(configured) if configured != written => {
                    return Err(CheckpointError::TypeMismatch(type_id));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn write_settings(&self, writer: &mut impl Write) -> Result<(), CheckpointError> {
        write_flag(writer, self.settings.smooth)?;
        write_flag(writer, self.settings.heat)?;
        let (tag, share) = heat_split_tag(self.settings.heat_split);
        write_u8(writer, tag)?;
        write_f64(writer, share)?;
        write_f64(writer, self.settings.min_separation)?;
        Ok(())
    }

    fn write_types(&self, writer: &mut impl Write) -> Result<(), CheckpointError> {
        write_u32(writer, self.types.len() as u32)?;
        write_u32(writer, TYPE_FIELD_COUNT)?;
        for (type_id, params) in self.types.iter_sorted() {
            write_u32(writer, type_id.0)?;
            write_u8(writer, model_tag(params.model))?;
            write_u8(writer, break_rule_tag(params.break_rule))?;
            write_flag(writer, params.thermal.is_some())?;
            let (kh, fch, kcond, t_ref) = match params.thermal {
                Some(thermal) => (thermal.kh, thermal.fch, thermal.kcond, thermal.t_ref),
                None => (0.0, 0.0, 0.0, 0.0),
            };
            for value in [
                params.kr,
                params.ks,
                params.kt,
                params.kb,
                params.gnorm,
                params.gslide,
                params.groll,
                params.gtwist,
                params.fcr,
                params.fcs,
                params.tct,
                params.tcb,
                kh,
                fch,
                kcond,
                t_ref,
            ] {
                write_f64(writer, value)?;
            }
        }
        Ok(())
    }

    fn write_bonds(&self, writer: &mut impl Write) -> Result<(), CheckpointError> {
        write_u64(writer, self.bonds.len() as u64)?;
        write_u32(writer, BOND_FIELD_COUNT)?;
        for bond in self.bonds.iter() {
            write_u64(writer, bond.a().data().as_ffi())?;
            write_u64(writer, bond.b().data().as_ffi())?;
            write_u32(writer, bond.type_id().0)?;
            write_flag(writer, bond.is_broken())?;
            let reference = bond.reference();
            let rest = reference.rest_rotation.as_ref();
            for value in [
                reference.length,
                rest.w,
                rest.i,
                rest.j,
                rest.k,
                reference.axis_a.x,
                reference.axis_a.y,
                reference.axis_a.z,
                reference.axis_b.x,
                reference.axis_b.y,
                reference.axis_b.z,
                bond.peak_metric(),
            ] {
                write_f64(writer, value)?;
            }
        }
        Ok(())
    }
}

fn read_settings(reader: &mut impl Read) -> Result<CheckpointSettings, CheckpointError> {
    let smooth = read_flag(reader, "smoothing flag")?;
    let heat = read_flag(reader, "heat flag")?;
    let tag = read_u8(reader)?;
    let share = read_f64(reader)?;
    let heat_split = heat_split_from_tag(tag, share)?;
    let min_separation = read_f64(reader)?;
    Ok(CheckpointSettings {
        smooth,
        heat,
        heat_split,
        min_separation,
    })
}

fn read_types(reader: &mut impl Read) -> Result<BondTypeTable, CheckpointError> {
    let count = read_u32(reader)?;
    let field_count = read_u32(reader)?;
    if field_count != TYPE_FIELD_COUNT {
        return Err(CheckpointError::FieldCountMismatch {
            section: "type",
            expected: TYPE_FIELD_COUNT,
            found: field_count,
        });
    }

    let mut table = BondTypeTable::new();
    for _ in 0..count {
        let type_id = BondTypeId(read_u32(reader)?);
        let model = model_from_tag(read_u8(reader)?)?;
        let break_rule = break_rule_from_tag(read_u8(reader)?)?;
        let has_thermal = read_flag(reader, "thermal flag")?;
        let mut fields = [0.0f64; TYPE_FIELD_COUNT as usize];
        for field in &mut fields {
            *field = read_f64(reader)?;
        }
        let thermal = has_thermal.then(|| ThermalParams {
            kh: fields[12],
            fch: fields[13],
            kcond: fields[14],
            t_ref: fields[15],
        });
        let params = BondTypeParams {
            kr: fields[0],
            ks: fields[1],
            kt: fields[2],
            kb: fields[3],
            gnorm: fields[4],
            gslide: fields[5],
            groll: fields[6],
            gtwist: fields[7],
            fcr: fields[8],
            fcs: fields[9],
            tct: fields[10],
            tcb: fields[11],
            break_rule,
            model,
            thermal,
        };
        table.set_coefficients(type_id, params)?;
    }
    Ok(table)
}

fn read_bonds(reader: &mut impl Read) -> Result<BondStore, CheckpointError> {
    let count = read_u64(reader)?;
    let field_count = read_u32(reader)?;
    if field_count != BOND_FIELD_COUNT {
        return Err(CheckpointError::FieldCountMismatch {
            section: "bond",
            expected: BOND_FIELD_COUNT,
            found: field_count,
        });
    }

    let mut bonds = BondStore::new();
    for _ in 0..count {
        let a = ParticleId::from(KeyData::from_ffi(read_u64(reader)?));
        let b = ParticleId::from(KeyData::from_ffi(read_u64(reader)?));
        let type_id = BondTypeId(read_u32(reader)?);
        let broken = read_flag(reader, "broken flag")?;
        let mut fields = [0.0f64; BOND_FIELD_COUNT as usize];
        for field in &mut fields {
            *field = read_f64(reader)?;
        }
        // The stored rotation was unit length when written; reconstructing
        // without renormalization keeps the restored state bit-identical.
        let rest_rotation = UnitQuaternion::new_unchecked(Quaternion::new(
            fields[1], fields[2], fields[3], fields[4],
        ));
        let reference = ReferenceGeometry {
            length: fields[0],
            rest_rotation,
            axis_a: Vector3::new(fields[5], fields[6], fields[7]),
            axis_b: Vector3::new(fields[8], fields[9], fields[10]),
        };
        bonds.push(Bond::from_parts(a, b, type_id, reference, broken, fields[11]));
    }
    Ok(bonds)
}

fn heat_split_tag(split: HeatSplit) -> (u8, f64) {
    match split {
        HeatSplit::Even => (0, 0.0),
        HeatSplit::Fraction(share) => (1, share),
    }
}

fn heat_split_from_tag(tag: u8, share: f64) -> Result<HeatSplit, CheckpointError> {
    match tag {
        0 => Ok(HeatSplit::Even),
        1 => Ok(HeatSplit::Fraction(share)),
        value => Err(CheckpointError::UnknownTag {
            what: "heat split",
            value,
        }),
    }
}

fn model_tag(model: BondModelKind) -> u8 {
    match model {
        BondModelKind::Rotational => 0,
        BondModelKind::Spring => 1,
    }
}

fn model_from_tag(tag: u8) -> Result<BondModelKind, CheckpointError> {
    match tag {
        0 => Ok(BondModelKind::Rotational),
        1 => Ok(BondModelKind::Spring),
        value => Err(CheckpointError::UnknownTag {
            what: "bond model",
            value,
        }),
    }
}

fn break_rule_tag(rule: BreakRule) -> u8 {
    match rule {
        BreakRule::Sum => 0,
        BreakRule::Max => 1,
        BreakRule::Quadratic => 2,
    }
}

fn break_rule_from_tag(tag: u8) -> Result<BreakRule, CheckpointError> {
    match tag {
        0 => Ok(BreakRule::Sum),
        1 => Ok(BreakRule::Max),
        2 => Ok(BreakRule::Quadratic),
        value => Err(CheckpointError::UnknownTag {
            what: "break rule",
            value,
        }),
    }
}

fn write_u8(writer: &mut impl Write, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

fn write_u32(writer: &mut impl Write, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_u64(writer: &mut impl Write, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_f64(writer: &mut impl Write, value: f64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_flag(writer: &mut impl Write, value: bool) -> io::Result<()> {
    write_u8(writer, value as u8)
}

fn read_u8(reader: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32(reader: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64(reader: &mut impl Read) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_f64(reader: &mut impl Read) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_flag(reader: &mut impl Read, what: &'static str) -> Result<bool, CheckpointError> {
    match read_u8(reader)? {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(CheckpointError::UnknownTag { what, value }),
    }
}
