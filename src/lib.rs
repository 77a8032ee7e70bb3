//! Workspace tooling package; carries the pre-commit hook configuration only.
