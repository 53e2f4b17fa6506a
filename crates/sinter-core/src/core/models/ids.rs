use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct ParticleId;
}

/// Identifier of a bond type as assigned by the host application.
///
/// Bond type ids are external handles (small integers in input decks), not
/// slotmap keys: they are chosen by the caller, survive restarts verbatim,
/// and index the coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondTypeId(pub u32);

impl fmt::Display for BondTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
