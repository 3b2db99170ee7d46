// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use divemeets_scraper::parse::{ScoreMap, ScoringParser, DEFAULT_JUDGE_SCORE_STYLE};

fn dive_sheet(scores: &[&str]) -> String {
    let judge_cells: String = scores
        .iter()
        .map(|s| format!(r#"<td align="center" style="{}">{}</td>"#, DEFAULT_JUDGE_SCORE_STYLE, s))
        .collect();
    format!(
        r#"<html><body>
        <table><tr><td>Round 3</td><td>105B</td><td style="font-weight: bold">2.4</td></tr></table>
        <table><tr><td>Judges</td>{}<td>Net Total</td></tr></table>
        </body></html>"#,
        judge_cells
    )
}

#[test]
fn test_six_judges_with_unparsable_cells() {
    let scores = ScoringParser::default().parse(&dive_sheet(&["7.5", "8.0", "abc", "9.5", "", "10.0"]));

    let expected: ScoreMap = [(1, 7.5), (2, 8.0), (3, 0.0), (4, 9.5), (5, 0.0), (6, 10.0)]
        .into_iter()
        .collect();
    assert_eq!(scores, expected);
}

#[test]
fn test_marker_match_ignores_spacing_and_case() {
    let marker = DEFAULT_JUDGE_SCORE_STYLE.to_uppercase().replace(' ', "");
    let html = format!(
        r#"<html><body><table><tr><td style="{}">6.0</td><td style="padding: 2px">9.9</td></tr></table></body></html>"#,
        marker
    );
    let scores = ScoringParser::default().parse(&html);
    assert_eq!(scores, ScoreMap::from([(1, 6.0)]));
}

#[test]
fn test_page_without_score_cells() {
    let html = "<html><body><table><tr><td>No scores yet</td></tr></table></body></html>";
    assert!(ScoringParser::default().parse(html).is_empty());
}
