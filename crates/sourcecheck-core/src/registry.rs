//! Checker registry and factory functions.
//!
//! Unlike a per-file-type validator table, the registry here is an *ordered*
//! list: registration order is load-bearing, because tie-breaks in
//! source-type inference depend on which checkers have already run.

use std::collections::HashSet;

use crate::checks::Checker;
use crate::checks::empty_files::RemoveEmptyFiles;
use crate::checks::extensions::FixFileExtensions;
use crate::checks::hidden::{RemoveHiddenFiles, RemoveMacOsArtifacts};
use crate::checks::invalid_types::FlagDisallowedTypes;
use crate::checks::processed::WarnAboutProcessedDirectory;
use crate::checks::references::CheckMissingReferences;
use crate::checks::source_type::InferSourceType;

/// Factory function type that creates checker instances.
pub type CheckerFactory = fn() -> Box<dyn Checker>;

/// Ordered registry of checker factories.
///
/// Most callers should use [`CheckerRegistry::with_defaults`] for the
/// standard pipeline. Use [`CheckerRegistry::builder`] to drop or append
/// checkers while keeping the order inspectable.
pub struct CheckerRegistry {
    factories: Vec<CheckerFactory>,
    names: Vec<String>,
    disabled: HashSet<String>,
}

impl CheckerRegistry {
    /// Create an empty registry with no registered checkers.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            names: Vec::new(),
            disabled: HashSet::new(),
        }
    }

    /// Create a registry pre-populated with the built-in checkers, in the
    /// standard order: removals first, source-type inference last.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for &factory in DEFAULTS {
            registry.register(factory);
        }
        registry
    }

    pub fn builder() -> CheckerRegistryBuilder {
        CheckerRegistryBuilder::new()
    }

    /// Append a checker factory to the end of the order.
    pub fn register(&mut self, factory: CheckerFactory) {
        // Cache the name once at registration time so disabled checkers can
        // be filtered without instantiating them again.
        let name = factory().name().to_string();
        self.factories.push(factory);
        self.names.push(name);
    }

    /// Exclude a checker by name (as returned by [`Checker::name`]).
    pub fn disable_checker(&mut self, name: impl Into<String>) {
        self.disabled.insert(name.into());
    }

    /// Build fresh checker instances, in registration order, skipping
    /// disabled names.
    pub fn checkers(&self) -> Vec<Box<dyn Checker>> {
        self.factories
            .iter()
            .zip(self.names.iter())
            .filter(|(_, name)| !self.disabled.contains(name.as_str()))
            .map(|(factory, _)| factory())
            .collect()
    }

    /// Names of all registered checkers, in order, disabled ones included.
    pub fn checker_names(&self) -> &[String] {
        &self.names
    }

    pub fn total_factory_count(&self) -> usize {
        self.factories.len()
    }

    pub fn disabled_count(&self) -> usize {
        self.disabled.len()
    }
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builder for a [`CheckerRegistry`].
///
/// ```
/// use sourcecheck_core::CheckerRegistry;
///
/// let registry = CheckerRegistry::builder()
///     .with_defaults()
///     .without_checker("RemoveHiddenFiles")
///     .build();
/// assert_eq!(registry.disabled_count(), 1);
/// ```
pub struct CheckerRegistryBuilder {
    entries: Vec<CheckerFactory>,
    disabled: HashSet<String>,
}

impl CheckerRegistryBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            disabled: HashSet::new(),
        }
    }

    /// Append all built-in checkers in the standard order.
    pub fn with_defaults(&mut self) -> &mut Self {
        self.entries.extend_from_slice(DEFAULTS);
        self
    }

    /// Append a single checker factory.
    pub fn register(&mut self, factory: CheckerFactory) -> &mut Self {
        self.entries.push(factory);
        self
    }

    /// Mark a checker name as disabled in the built registry.
    pub fn without_checker(&mut self, name: &str) -> &mut Self {
        self.disabled.insert(name.to_string());
        self
    }

    pub fn build(&mut self) -> CheckerRegistry {
        let mut registry = CheckerRegistry::new();
        for &factory in &self.entries {
            registry.register(factory);
        }
        registry.disabled = std::mem::take(&mut self.disabled);
        registry
    }
}

// ============================================================================
// Built-in defaults
// ============================================================================

/// The standard checker order. Checkers that remove files come first so that
/// later judgments see the cleaned-up file set; source-type inference runs
/// last.
const DEFAULTS: &[CheckerFactory] = &[
    remove_macos_artifacts,
    remove_hidden_files,
    remove_empty_files,
    warn_about_processed_directory,
    check_missing_references,
    fix_file_extensions,
    flag_disallowed_types,
    infer_source_type,
];

fn remove_macos_artifacts() -> Box<dyn Checker> {
    Box::new(RemoveMacOsArtifacts)
}

fn remove_hidden_files() -> Box<dyn Checker> {
    Box::new(RemoveHiddenFiles)
}

fn remove_empty_files() -> Box<dyn Checker> {
    Box::new(RemoveEmptyFiles)
}

fn warn_about_processed_directory() -> Box<dyn Checker> {
    Box::new(WarnAboutProcessedDirectory)
}

fn check_missing_references() -> Box<dyn Checker> {
    Box::new(CheckMissingReferences)
}

fn fix_file_extensions() -> Box<dyn Checker> {
    Box::new(FixFileExtensions)
}

fn flag_disallowed_types() -> Box<dyn Checker> {
    Box::new(FlagDisallowedTypes)
}

fn infer_source_type() -> Box<dyn Checker> {
    Box::new(InferSourceType)
}
