// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page fetching
//!
//! ```text
//! URL → Fetcher (semaphore permit → optional pacing → GET → 2xx? → UTF-8?) → Option<String>
//! ```

pub mod config;
pub mod fetcher;
pub mod rate_limiter;

pub use config::FetchConfig;
pub use fetcher::{FetchError, Fetcher};
pub use rate_limiter::FetchRateLimiter;
