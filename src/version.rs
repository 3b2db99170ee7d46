// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the DiveMeets scraper

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "event-results",
    "judge-scores",
    "entry-lists",
    "profile-meets",
    "expiring-cache",
    "disk-persistence",
    "bounded-fetch",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("DiveMeets scraper {} [{}]", VERSION_NUMBER, FEATURES.join(", "))
}
