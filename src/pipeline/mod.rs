// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch → parse → publish pipeline
//!
//! ```text
//! URL → PageRenderer (cache-aware) → parser for PageKind → StructuredResult
//! ```

pub mod orchestrator;
pub mod renderer;

pub use orchestrator::Pipeline;
pub use renderer::{HttpRenderer, PageRenderer, RenderedPage};
