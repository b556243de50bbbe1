//! Checkers: the units of validation logic.
//!
//! A checker exposes up to four optional hooks. Default bodies are no-ops, so
//! dispatch fails closed: a checker that does not care about a hook simply
//! never sees it. The [`Capabilities`] mask declares which hooks a checker
//! implements; the engine consults it to skip whole phases, and callers can
//! inspect it when reasoning about registration order.

pub mod empty_files;
pub mod extensions;
pub mod hidden;
pub mod invalid_types;
pub mod processed;
pub mod references;
pub mod source_type;

use crate::diagnostics::{CheckResult, Code};
use crate::file_types::FileType;
use crate::files::FileKey;
use crate::workspace::Workspace;

/// Extract the short (unqualified) type name from `std::any::type_name`.
fn short_type_name<T: ?Sized + 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Which hooks a checker implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Runs for every live file, regardless of type.
    pub generic: bool,
    /// Runs for files whose current type matches an arm of `check_typed`.
    pub typed: bool,
    /// Runs once per pass, before the checker's per-file hooks.
    pub workspace: bool,
    /// Runs for every live file after all other checkers' per-file hooks.
    pub finalize: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        generic: false,
        typed: false,
        workspace: false,
        finalize: false,
    };

    pub const ALL: Self = Self {
        generic: true,
        typed: true,
        workspace: true,
        finalize: true,
    };
}

/// Name and emitted codes of a checker, for inspection and parity tests.
#[derive(Debug, Clone, Copy)]
pub struct CheckerMetadata {
    pub name: &'static str,
    /// Diagnostic codes this checker can emit.
    pub codes: &'static [Code],
}

/// A unit of validation logic over a workspace.
///
/// Hooks receive the workspace and an opaque file handle, and return the
/// handle to use for subsequent hooks in the same pass (handles survive
/// renames, so this is usually the argument unchanged). Checkers may rename,
/// remove, or create files mid-pass; the engine's snapshot rules (see
/// [`crate::strategy`]) keep iteration well-defined.
pub trait Checker: Send + 'static {
    /// Short, human-readable name, used for registry filtering.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[],
        }
    }

    /// Which hooks this checker implements.
    fn capabilities(&self) -> Capabilities;

    /// Generic per-file hook.
    fn check(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        let _ = workspace;
        Ok(file)
    }

    /// Type-dispatched per-file hook. Implementations match on the closed
    /// [`FileType`] enum; types without an arm fall through as no-ops.
    fn check_typed(
        &self,
        workspace: &mut Workspace,
        file: FileKey,
        file_type: FileType,
    ) -> CheckResult<FileKey> {
        let _ = (workspace, file_type);
        Ok(file)
    }

    /// Whole-workspace hook, for aggregate and cross-file decisions.
    fn check_workspace(&self, workspace: &mut Workspace) -> CheckResult<()> {
        let _ = workspace;
        Ok(())
    }

    /// Fallback hook, applied after every checker's per-file hooks.
    fn check_finally(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        let _ = workspace;
        Ok(file)
    }
}
