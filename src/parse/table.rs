// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML table extraction
//!
//! Turns table rows into lists of cell texts. Also hosts the cell and link
//! helpers shared by the page-specific parsers.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::types::PageRow;

/// Extract every `row_tag` element of `html` as a row of cell texts
///
/// # Arguments
/// * `html` - Raw HTML string
/// * `row_tag` - CSS selector for the row elements, usually `"tr"`
///
/// # Returns
/// One [`PageRow`] per matched element, holding the whitespace-normalized
/// text of its direct `td`/`th` children in document order. Empty when the
/// document has no body content or the selector is invalid. Nothing is
/// filtered; callers skip header and footer rows themselves.
pub fn rows_of(html: &str, row_tag: &str) -> Vec<PageRow> {
    let Some(document) = parse_document(html) else {
        return Vec::new();
    };

    let Ok(selector) = Selector::parse(row_tag) else {
        debug!("Invalid row selector: {}", row_tag);
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|row| cells(&row).iter().map(cell_text).collect())
        .collect()
}

/// Number of `<table>` elements in `html`, nested tables included
pub fn tables_of(html: &str) -> usize {
    let document = Html::parse_document(html);
    match Selector::parse("table") {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

/// Parse `html`, or `None` if it has no body content
pub fn parse_document(html: &str) -> Option<Html> {
    let document = Html::parse_document(html);
    if has_body_content(&document) {
        Some(document)
    } else {
        debug!("Document has no body content");
        None
    }
}

/// True if the document body holds an element or non-blank text
///
/// The parser always synthesizes a `<body>`, so mere presence says nothing.
pub fn has_body_content(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("body") else {
        return false;
    };

    document.select(&selector).next().is_some_and(|body| {
        body.children().any(|child| ElementRef::wrap(child).is_some())
            || body.text().any(|text| !text.trim().is_empty())
    })
}

/// Direct `td`/`th` children of a row
pub fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Element text with runs of whitespace collapsed to one space
pub fn cell_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `href` of the first link inside `element`, the element itself included
pub fn first_link(element: &ElementRef) -> Option<String> {
    if element.value().name() == "a" {
        if let Some(href) = element.value().attr("href") {
            return Some(href.trim().to_string());
        }
    }

    let selector = Selector::parse("a[href]").ok()?;
    element
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
}

/// Resolve a scraped href against the site base path
///
/// Absolute URLs and empty hrefs pass through unchanged.
pub fn absolute_link(base_url: &str, href: &str) -> String {
    if href.is_empty() || href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{}{}", base_url, href)
}

/// Every element of `document` matching `css`, in document order
pub fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => {
            debug!("Invalid selector: {}", css);
            Vec::new()
        }
    }
}

/// Descendants of `element` matching `css`, in document order
pub fn select_within<'a>(element: &ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => {
            debug!("Invalid selector: {}", css);
            Vec::new()
        }
    }
}
