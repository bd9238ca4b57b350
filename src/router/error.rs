use std::fmt;

/// Mask compilation error
///
/// Returned by [`MaskPattern::compile`](super::MaskPattern::compile) and
/// surfaced at registration time. A routing table containing a malformed mask
/// must not be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedMaskError {
    /// A `[` without its `]`, or a `]` without its `[`
    UnbalancedBrackets {
        /// The offending mask
        mask: String,
    },
    /// A `{` or `}` outside a `{name}` / `{name:pattern}` token
    UnexpectedToken {
        /// The offending mask
        mask: String,
        /// The text containing the stray brace
        token: String,
    },
    /// Parameter name that is not an identifier
    InvalidParameterName {
        /// The offending mask
        mask: String,
        /// The rejected name
        name: String,
    },
    /// The generated pattern did not compile (bad sub-pattern, duplicate name)
    InvalidPattern {
        /// The offending mask
        mask: String,
        /// Error reported by the regex engine
        reason: String,
    },
}

impl MalformedMaskError {
    /// The mask that failed to compile
    #[must_use]
    pub fn mask(&self) -> &str {
        match self {
            MalformedMaskError::UnbalancedBrackets { mask }
            | MalformedMaskError::UnexpectedToken { mask, .. }
            | MalformedMaskError::InvalidParameterName { mask, .. }
            | MalformedMaskError::InvalidPattern { mask, .. } => mask,
        }
    }
}

impl fmt::Display for MalformedMaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedMaskError::UnbalancedBrackets { mask } => {
                write!(f, "Missing \"[\" or \"]\" in mask \"{}\"", mask)
            }
            MalformedMaskError::UnexpectedToken { mask, token } => {
                write!(f, "Unexpected \"{}\" in mask \"{}\"", token, mask)
            }
            MalformedMaskError::InvalidParameterName { mask, name } => {
                write!(
                    f,
                    "Invalid parameter name \"{}\" in mask \"{}\". \
                    Names must start with a letter or underscore and contain only letters, digits and underscores",
                    name, mask
                )
            }
            MalformedMaskError::InvalidPattern { mask, reason } => {
                write!(f, "Mask \"{}\" does not compile: {}", mask, reason)
            }
        }
    }
}

impl std::error::Error for MalformedMaskError {}

/// Route registration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The mask failed to compile
    MalformedMask(MalformedMaskError),
    /// The route was registered under no method at all
    EmptyMethodSet {
        /// The mask being registered
        mask: String,
    },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::MalformedMask(err) => write!(f, "{}", err),
            RegisterError::EmptyMethodSet { mask } => {
                write!(f, "Route \"{}\" must be registered under at least one method", mask)
            }
        }
    }
}

impl std::error::Error for RegisterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegisterError::MalformedMask(err) => Some(err),
            RegisterError::EmptyMethodSet { .. } => None,
        }
    }
}

impl From<MalformedMaskError> for RegisterError {
    fn from(err: MalformedMaskError) -> Self {
        RegisterError::MalformedMask(err)
    }
}
