//! Deployment artifact synthesis.
//!
//! Renders the generated deployment files of a project (Makefile block,
//! container build file, compose descriptors, variable files and
//! documentation tips) from resolved configuration and writes them without
//! clobbering user-authored content.
//!
//! Generated files come in two kinds:
//!
//! - **Marked blocks** (`Makefile`, `AGENTS.md`, `CLAUDE.md`): only the region
//!   between two sentinel lines is owned by the generator.
//! - **Whole files** (`Dockerfile`, compose descriptors, `.deploy.env.*`):
//!   created when missing and only overwritten on request.

pub mod errors;
pub mod fragments;
pub mod marked_block;
pub mod render;
pub mod synthesizer;
pub mod writer;

pub use errors::Error;
pub use render::ArtifactRenderer;
pub use synthesizer::{
    ArtifactResult, ArtifactSynthesizer, ForceOptions, SynthesisPlan, SynthesisReport,
    DEPLOYMENT_TIPS_END, DEPLOYMENT_TIPS_START, DOCKERFILE, MAKEFILE, MAKEFILE_END,
    MAKEFILE_START, TIPS_FILES,
};
pub use writer::{write_marked_block, write_whole_file, ArtifactOutcome, WriteStrategy};

/// Result type alias for artifact operations.
pub type Result<T> = std::result::Result<T, Error>;
