use std::fmt;

/// Which static table a failed reference pointed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Kin,
    Profession,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Kin => f.write_str("kin"),
            ReferenceKind::Profession => f.write_str("profession"),
        }
    }
}

/// Errors surfaced by character construction.
///
/// Both are request-level validation failures: retrying with the same
/// input never succeeds, and no partial sheet is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    /// A kin or profession id is not present in the content tables.
    #[error("unknown {kind}: {id}")]
    UnknownReference { kind: ReferenceKind, id: String },

    /// The trained-skill selection does not match the age category's counts.
    #[error(
        "trained skills must number {expected_total} with {expected_from_profession} \
         from the profession (got {actual_total} with {actual_from_profession})"
    )]
    InvalidSkillSelection {
        expected_total: usize,
        expected_from_profession: usize,
        actual_total: usize,
        actual_from_profession: usize,
    },
}
