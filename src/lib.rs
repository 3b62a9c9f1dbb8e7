//! envmin: minify a Java build environment
//!
//! Given a pristine source tree, a set of seed packages/classes and a
//! dependency resolver, envmin copies only the sources (and the resources
//! next to them) that the seeds need into a fresh output tree. The error
//! type and path mapping live in `envmin-core` and are re-exported here.

pub use envmin_core::{format_error_with_help, EnvminError, EnvminResult, ErrorHelp};

/// Core module re-exported from `envmin-core`.
pub mod core {
    pub use envmin_core::core::*;

    /// Path mapping between type names, input and output trees.
    pub mod path {
        pub use envmin_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Dependency closure collection.
pub mod resolver;

/// External build invocation.
pub mod build;

/// Output preparation, tree copying and the run orchestrator.
pub mod minify;
