use thiserror::Error;

/// Failure raised when a producer cannot supply a value.
///
/// Cells never construct this themselves: they hand back whatever error the
/// producer returned. Producers that look values up in a [`Node`](crate::scene::Node)
/// report through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
   #[error("value production failed: {0}")]
   ProductionFailed(#[from] LookupError),
}

/// Why a named lookup in the node tree came back empty-handed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
   #[error("node `{parent}` has no child at `{path}`")]
   Missing { parent: String, path: String },

   #[error("child at `{path}` is not a {expected}")]
   WrongKind { path: String, expected: &'static str },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
