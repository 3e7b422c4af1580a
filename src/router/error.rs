use std::fmt;

/// Registration-time failure.
///
/// Every variant aborts configuration; the route tree is left exactly as it
/// was before the failing call, except that literal prefix nodes created on
/// the way to the conflict may remain (they carry no handler and do not
/// change matching behaviour).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The registration pattern was empty.
    EmptyPattern,
    /// The pattern did not start with `/`.
    MissingLeadingSlash {
        pattern: String,
    },
    /// A handler is already registered for this pattern.
    MultipleRegistrations {
        pattern: String,
    },
    /// A wildcard, catch-all or regex slot was re-declared under a different
    /// name at the same position.
    MismatchedWildcards {
        existing: String,
        requested: String,
    },
    /// The pattern continues past a `*name` catch-all segment.
    SegmentsAfterCatchAll {
        segment: String,
    },
    /// A `#name:regex` segment was malformed or failed to compile.
    InvalidRegexSegment {
        segment: String,
        reason: String,
    },
    /// A dynamic segment was declared without a name.
    EmptyWildcardName {
        segment: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::EmptyPattern => {
                write!(f, "cannot register an empty route pattern")
            }
            RouterError::MissingLeadingSlash { pattern } => {
                write!(
                    f,
                    "route pattern must begin with a forward slash but got {pattern:?}"
                )
            }
            RouterError::MultipleRegistrations { pattern } => {
                write!(f, "multiple registrations for pattern {pattern:?}")
            }
            RouterError::MismatchedWildcards {
                existing,
                requested,
            } => {
                write!(f, "mismatched wildcards {existing:?} and {requested:?}")
            }
            RouterError::SegmentsAfterCatchAll { segment } => {
                write!(
                    f,
                    "cannot register segments after the catch-all {segment:?}"
                )
            }
            RouterError::InvalidRegexSegment { segment, reason } => {
                write!(f, "invalid regex segment {segment:?}: {reason}")
            }
            RouterError::EmptyWildcardName { segment } => {
                write!(f, "dynamic segment {segment:?} must carry a name")
            }
        }
    }
}

impl std::error::Error for RouterError {}
