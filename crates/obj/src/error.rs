use flycam_mesh::{IndexError, Pool};

/// What was wrong with a line of a mesh description.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum FormatErrorKind {
    #[error("unknown statement `{0}`")]
    UnknownStatement(String),
    #[error("`{statement}` expects {expected} values, found {found}")]
    WrongArity {
        statement: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("number `{0}` is not finite")]
    NonFiniteNumber(String),
    #[error("malformed face corner `{0}`, expected `position/texture/normal`")]
    MalformedCorner(String),
    #[error("invalid index `{0}`")]
    InvalidIndex(String),
    #[error("{pool} index {index} is out of range 1..={len}")]
    IndexOutOfRange { pool: Pool, index: i64, len: usize },
}

/// A line of the mesh description does not follow the grammar, or refers to
/// something that has not been declared.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct FormatError {
    /// 1-based line number.
    pub line: usize,
    pub kind: FormatErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("failed to read mesh description: {0}")]
    Io(#[from] std::io::Error),
}
