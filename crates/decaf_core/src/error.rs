//! Error types for declaration binding and name resolution.

use thiserror::Error;

use crate::ast::SourceLocation;

/// Conditions raised while building or querying a scope tree.
///
/// None of these abort the declaration-building pass; they are collected in
/// [`crate::scope::ScopeTree::errors`] so that every conflict in a
/// compilation unit is reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A name was declared twice in the same scope.
    #[error("duplicate declaration of `{name}` at {loc} (previous declaration at {previous})")]
    DuplicateDeclaration {
        /// The redeclared name.
        name: String,
        /// Location of the new declaration.
        loc: SourceLocation,
        /// Location of the declaration already in the table.
        previous: SourceLocation,
    },

    /// No enclosing scope declares the referenced name.
    #[error("no declaration found for `{name}` at {loc}")]
    UnresolvedIdentifier {
        /// The referenced name.
        name: String,
        /// Location of the reference.
        loc: SourceLocation,
    },
}

impl BindError {
    /// The identifier the condition is about.
    pub fn name(&self) -> &str {
        match self {
            BindError::DuplicateDeclaration { name, .. }
            | BindError::UnresolvedIdentifier { name, .. } => name,
        }
    }

    /// Where the offending declaration or reference appears.
    pub fn loc(&self) -> SourceLocation {
        match self {
            BindError::DuplicateDeclaration { loc, .. }
            | BindError::UnresolvedIdentifier { loc, .. } => *loc,
        }
    }
}

/// Convenient `Result` alias for fallible binding operations.
pub type BindResult<T> = Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Position, Span};

    fn at(line: u32) -> SourceLocation {
        let start = Position {
            offset: 0,
            line,
            column: 5,
        };
        Span { start, end: start }
    }

    #[test]
    fn test_duplicate_message_names_both_locations() {
        let err = BindError::DuplicateDeclaration {
            name: "x".to_owned(),
            loc: at(9),
            previous: at(2),
        };
        assert_eq!(
            err.to_string(),
            "duplicate declaration of `x` at 9:5 (previous declaration at 2:5)"
        );
        assert_eq!(err.name(), "x");
        assert_eq!(err.loc(), at(9));
    }

    #[test]
    fn test_unresolved_message() {
        let err = BindError::UnresolvedIdentifier {
            name: "count".to_owned(),
            loc: at(4),
        };
        assert_eq!(err.to_string(), "no declaration found for `count` at 4:5");
    }
}
