use std::fmt::{Display, Formatter};

/// A build-time failure: something about the rule/type graph being
/// assembled is malformed. Never produced once a [`crate::Context`] has
/// finished loading rules and been optimized.
#[derive(Debug, Clone)]
pub enum BuildError {
    /// `parserName2ID` was given a name not present in the registry.
    UnknownParser(String),
    /// A `CUSTOM_TYPE` edge referenced a type name with no matching
    /// [`crate::TypePdag`] registered on the `Context`.
    UnknownType(String),
    /// Two type PDAGs were registered under the same name.
    DuplicateType(String),
    /// A registry row's constructor rejected the supplied configuration.
    BadParserConfig { parser: &'static str, message: String },
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownParser(name) => write!(f, "unknown parser identifier '{}'", name),
            BuildError::UnknownType(name) => write!(f, "unknown type PDAG '{}'", name),
            BuildError::DuplicateType(name) => write!(f, "type PDAG '{}' already registered", name),
            BuildError::BadParserConfig { parser, message } => {
                write!(f, "bad configuration for parser '{}': {}", parser, message)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// The matcher's internal "this edge did not consume the input" signal.
///
/// This is deliberately not [`std::error::Error`]: per the matcher's
/// contract, failing to match one alternative is the ordinary backtracking
/// path, not a fault. It never escapes [`crate::normalize`], which always
/// succeeds in producing a populated result object (see
/// [`crate::NormalizeOutcome`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unmatched;
