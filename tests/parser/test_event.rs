// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use divemeets_scraper::config::DEFAULT_BASE_URL;
use divemeets_scraper::parse::{rows_of, EventPageParser};

/// Results page with `data_rows` divers between five header rows and a footer
fn results_page(data_rows: usize) -> String {
    let mut html = String::from(
        r##"<html><head><title>Results</title></head><body>
        <table width="100%">
            <tr><td colspan="5"><strong>2024 Spring Invitational</strong></td></tr>
            <tr><td colspan="5">Girls 13-14 1 Meter</td></tr>
            <tr><td colspan="5">Event completed</td></tr>
            <tr><td colspan="5">Judges: A. Ruiz, B. Moss, C. Tan</td></tr>
            <tr bgcolor="#0066CC"><td>Name</td><td>Team</td><td>Place</td><td>Score</td><td>Behind</td></tr>"##,
    );
    for i in 1..=data_rows {
        html.push_str(&format!(
            r#"<tr><td><a href="profile.php?number={id}">Diver{i}, Test</a></td>
                <td><a href="profile.php?number={team}">Club {i}</a></td>
                <td>{i}</td>
                <td><a href="divesheetresultsext.php?meetnum=1&dvrnum={id}">{score:.2}</a></td>
                <td>{behind:.2}</td></tr>"#,
            i = i,
            id = 1000 + i,
            team = 9000 + i,
            score = 400.0 - i as f64 * 10.0,
            behind = (i - 1) as f64 * 10.0,
        ));
    }
    html.push_str(r#"<tr><td colspan="5">Results by DiveMeets</td></tr></table></body></html>"#);
    html
}

#[test]
fn test_n_rows_yield_n_minus_six_results() {
    let parser = EventPageParser::new(DEFAULT_BASE_URL);

    for data_rows in [1usize, 2, 7, 25] {
        let html = results_page(data_rows);
        let total_rows = rows_of(&html, "tr").len();
        assert_eq!(total_rows, data_rows + 6);

        let results = parser.parse(&html);
        assert_eq!(results.len(), total_rows - 6);

        let places: Vec<u32> = results.iter().map(|r| r.place).collect();
        let expected: Vec<u32> = (1..=data_rows as u32).collect();
        assert_eq!(places, expected);
    }
}

#[test]
fn test_links_resolve_against_base_url() {
    let results = EventPageParser::new(DEFAULT_BASE_URL).parse(&results_page(2));

    assert_eq!(results[1].name, "Diver2, Test");
    assert_eq!(
        results[1].name_link,
        format!("{}profile.php?number=1002", DEFAULT_BASE_URL)
    );
    assert_eq!(results[1].team, "Club 2");
    assert_eq!(results[1].score, "380.00");
    assert!(results[1].score_link.starts_with(DEFAULT_BASE_URL));
    assert_eq!(results[1].score_diff, "10.00");
    assert_eq!(results[1].diff, "Event completed");
    assert_eq!(results[0].diff, results[1].diff);
}
