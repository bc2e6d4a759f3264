//! Workspace tooling package (pre-commit hooks). The routing library lives in
//! `crates/roadroute-lib`.
