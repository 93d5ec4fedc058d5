//! Knobs for the declaration-building pass.

/// What happens to the symbol table when a name is declared twice in one
/// scope.  Either way a [`crate::error::BindError::DuplicateDeclaration`] is
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedeclarationPolicy {
    /// The later declaration replaces the earlier one.
    #[default]
    Replace,
    /// The earlier declaration stays bound.
    KeepFirst,
}

/// Options accepted by [`crate::binder::build_scopes_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Enter formal parameters into their function's scope.  When `false`
    /// formals are only bound to the scope, never registered, so parameter
    /// names do not resolve.
    pub register_formals: bool,
    /// Table behaviour on redeclaration.
    pub redeclaration: RedeclarationPolicy,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            register_formals: true,
            redeclaration: RedeclarationPolicy::Replace,
        }
    }
}

impl BindOptions {
    /// Set [`BindOptions::register_formals`].
    pub fn with_register_formals(mut self, register: bool) -> Self {
        self.register_formals = register;
        self
    }

    /// Set [`BindOptions::redeclaration`].
    pub fn with_redeclaration(mut self, policy: RedeclarationPolicy) -> Self {
        self.redeclaration = policy;
        self
    }
}
