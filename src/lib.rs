//! Workflow-graph generation and analysis.
//!
//! A [`dsl::WorkflowRequest`] describes an automation in free text. The
//! [`runtime::engine::Engine`] turns it into a [`runtime::package::GeneratedPackage`]
//! either through an external generative service or, when that path fails,
//! through the deterministic synthesizer in [`compiler`] plus the
//! [`analysis`] rules.

pub mod analysis;
pub mod compiler;
pub mod config;
pub mod dsl;
pub mod error;
pub mod export;
pub mod generative;
pub mod runtime;
