pub mod runner;

pub use runner::{BuildOutput, BuildRunner, CommandBuildRunner};
