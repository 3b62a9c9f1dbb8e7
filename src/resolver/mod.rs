pub mod closure;
pub mod jdeps;
pub mod seeds;

pub use closure::{ClosureCollector, DependencyResolver, ResolveRequest};
pub use jdeps::JdepsResolver;
pub use seeds::{RequiredClosure, SeedSet, TypeName};
