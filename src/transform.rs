//! The two entry points that drive the handler chain.
//!
//! ```text
//! run_pre:  config + pages ──► Book ──► lines ──► pre × 18 ──► stdout
//!                                                                │
//!                                                    external converter
//!                                                                │
//! run_post:                       stdin ──► lines ──► post × 18 ──► stdout
//! ```
//!
//! Both phases load the same configuration and cross-reference map, and apply
//! the handlers in the same order. Any handler failure aborts the whole run.

use crate::assemble::Book;
use crate::config::{self, ConfigError};
use crate::crossref::{CrossRefError, CrossRefMap};
use crate::handlers::{self, Context, HandlerError};
use crate::locate::LocateError;
use crate::types::{Lines, split_lines};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    CrossRef(#[from] CrossRefError),
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error("{phase} step of handler '{handler}' failed: {source}")]
    Handler {
        phase: Phase,
        handler: &'static str,
        source: HandlerError,
    },
}

/// Which half of the chain to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pre,
    Post,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Pre => "pre",
            Phase::Post => "post",
        })
    }
}

/// The four paths every transform invocation takes.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub config: PathBuf,
    pub source_dir: PathBuf,
    pub crossref: PathBuf,
    pub include_dir: PathBuf,
}

/// Fold every handler's `phase` step over `lines`, in chain order.
pub fn apply(phase: Phase, lines: Lines, ctx: &Context<'_>) -> Result<Lines, TransformError> {
    handlers::chain().iter().try_fold(lines, |lines, handler| {
        let before = lines.len();
        let result = match phase {
            Phase::Pre => handler.pre(ctx, lines),
            Phase::Post => handler.post(ctx, lines),
        };
        let lines = result.map_err(|source| TransformError::Handler {
            phase,
            handler: handler.name(),
            source,
        })?;
        debug!(handler = handler.name(), %phase, before, after = lines.len(), "applied");
        Ok(lines)
    })
}

/// Assemble the book and run the pre phase over it.
pub fn run_pre(inv: &Invocation) -> Result<Lines, TransformError> {
    let config = config::load_config(&inv.config)?;
    let crossref = CrossRefMap::load(&inv.crossref)?;
    let lines = Book::load(&inv.source_dir, &config.toc)?.into_lines();
    info!(lines = lines.len(), "assembled book");

    let ctx = Context {
        crossref: &crossref,
        include_dir: &inv.include_dir,
    };
    let lines = apply(Phase::Pre, lines, &ctx)?;
    info!(lines = lines.len(), "pre phase done");
    Ok(lines)
}

/// Run the post phase over the converter's output.
///
/// The configuration is loaded only to validate it: a run with a broken
/// config should fail the same way in both phases.
pub fn run_post(inv: &Invocation, input: &str) -> Result<Lines, TransformError> {
    config::load_config(&inv.config)?;
    let crossref = CrossRefMap::load(&inv.crossref)?;
    let lines = split_lines(input);
    info!(lines = lines.len(), "read converter output");

    let ctx = Context {
        crossref: &crossref,
        include_dir: &inv.include_dir,
    };
    let lines = apply(Phase::Post, lines, &ctx)?;
    info!(lines = lines.len(), "post phase done");
    Ok(lines)
}
