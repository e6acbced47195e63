/// Errors raised while parsing or validating content tables.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The document is not valid JSON or does not match the table shapes.
    #[error("invalid content JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A bracket has `min > max`.
    #[error("{table} entry {index}: range [{min}, {max}] is empty")]
    InvalidRange {
        table: &'static str,
        index: usize,
        min: i32,
        max: i32,
    },

    /// Two brackets of one table cover a common value.
    #[error("{table}: entry {first} overlaps entry {second}")]
    OverlappingBrackets {
        table: &'static str,
        first: usize,
        second: usize,
    },

    /// An id appears twice in a table that is looked up by id.
    #[error("{table}: duplicate id '{id}'")]
    DuplicateId { table: &'static str, id: String },

    /// An age category whose counts do not add up.
    #[error(
        "age category {age}: {from_profession} profession + {free_choice} free skills != {total} total"
    )]
    AgeSlotMismatch {
        age: String,
        total: u32,
        from_profession: u32,
        free_choice: u32,
    },
}
