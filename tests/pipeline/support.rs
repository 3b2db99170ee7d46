// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local HTTP server standing in for the results site

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const PROFILE_PAGE: &str = r#"<html><body>
    <table>
        <tr><th>Meet</th><th>Organisation</th><th>Date</th></tr>
        <tr><td>Spring Invitational</td><td>USA Diving</td><td>Mar 3, 2024</td></tr>
        <tr><td>Summer Open</td><td>AAU</td><td>Jul 9, 2024</td></tr>
    </table>
</body></html>"#;

/// Request counters shared with the server's handlers
#[derive(Debug, Default)]
pub struct Hits {
    pub profile: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl Hits {
    pub fn profile(&self) -> usize {
        self.profile.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct TestSite {
    pub addr: SocketAddr,
    pub hits: Arc<Hits>,
}

impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Serve the fixture routes on an ephemeral loopback port
pub async fn spawn_site() -> TestSite {
    let hits = Arc::new(Hits::default());

    let profile_hits = hits.clone();
    let slow_hits = hits.clone();
    let app = Router::new()
        .route(
            "/profile",
            get(move || {
                let hits = profile_hits.clone();
                async move {
                    hits.profile.fetch_add(1, Ordering::SeqCst);
                    Html(PROFILE_PAGE)
                }
            }),
        )
        .route("/text", get(|| async { "plain body" }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
        .route("/error", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
        .route("/binary", get(|| async { vec![0xffu8, 0xfe, 0xfd] }))
        .route(
            "/slow",
            get(move || {
                let hits = slow_hits.clone();
                async move {
                    let now = hits.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    hits.peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    hits.in_flight.fetch_sub(1, Ordering::SeqCst);
                    "done"
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestSite { addr, hits }
}
