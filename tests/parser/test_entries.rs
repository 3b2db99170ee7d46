// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use divemeets_scraper::config::DEFAULT_BASE_URL;
use divemeets_scraper::parse::{EntriesParser, EntryRecord};

struct Diver<'a> {
    number: u32,
    name: &'a str,
    team: &'a str,
    dives: &'a [(&'a str, &'a str, &'a str, &'a str)],
    total: Option<&'a str>,
}

fn diver_rows(diver: &Diver) -> String {
    let mut html = format!(
        r#"<tr><td colspan="3"><b><a href="profile.php?number={}">{}</a></b> ({})</td><td colspan="2"><b>Board: 3M</b></td></tr>"#,
        diver.number, diver.name, diver.team
    );
    for (i, (code, height, name, dd)) in diver.dives.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            i + 1,
            code,
            height,
            name,
            dd
        ));
    }
    if let Some(total) = diver.total {
        html.push_str(&format!(
            r#"<tr><td colspan="4" align="right"><b>DD Total</b></td><td><b>{}</b></td></tr>"#,
            total
        ));
    }
    html
}

fn entries_page(divers: &[Diver]) -> String {
    let body: String = divers.iter().map(diver_rows).collect();
    format!(
        r#"<html><body>
        <table><tr><td>Spring Invitational - Boys 3 Meter Entries</td></tr></table>
        <table>
            <tr><td colspan="5">Sorted by last name</td></tr>
            {}
        </table>
        </body></html>"#,
        body
    )
}

const FIRST: Diver = Diver {
    number: 101,
    name: "Alvarez, Marco",
    team: "Bay Divers",
    dives: &[
        ("105B", "3M", "Forward 2 1/2 Somersault Pike", "2.4"),
        ("5233D", "3M", "Back 1 1/2 Twists 1 1/2 Somersault", "2.1"),
    ],
    total: Some("4.5"),
};

const SECOND: Diver = Diver {
    number: 102,
    name: "Brooks, Sam",
    team: "Valley Aquatics",
    dives: &[
        ("303C", "3M", "Reverse 1 1/2 Somersault Tuck", "2.1"),
        ("405C", "3M", "Inward 2 1/2 Somersault Tuck", "3.0"),
    ],
    total: Some("5.1"),
};

const UNTERMINATED: Diver = Diver {
    number: 103,
    name: "Cole, Jamie",
    team: "Metro Dive",
    dives: &[("101B", "3M", "Forward Dive Pike", "1.5")],
    total: None,
};

fn assert_terminated(entries: &[EntryRecord]) {
    assert_eq!(entries[0].last_name, "Alvarez");
    assert_eq!(entries[0].first_name, "Marco");
    assert_eq!(entries[0].team, "Bay Divers");
    assert_eq!(entries[0].board.as_deref(), Some("3M"));
    assert_eq!(entries[0].link, format!("{}profile.php?number=101", DEFAULT_BASE_URL));
    assert_eq!(entries[0].total_dd, 4.5);
    let codes: Vec<&str> = entries[0].dives.iter().map(|d| d.number.as_str()).collect();
    assert_eq!(codes, vec!["105B", "5233D"]);
    assert!(entries[0].dives.iter().all(|d| d.height == 3));

    assert_eq!(entries[1].last_name, "Brooks");
    assert_eq!(entries[1].team, "Valley Aquatics");
    assert_eq!(entries[1].dives.len(), 2);
    assert_eq!(entries[1].dives[1].dd, 3.0);
    assert_eq!(entries[1].total_dd, 5.1);
}

#[test]
fn test_two_terminated_divers() {
    let entries = EntriesParser::new(DEFAULT_BASE_URL)
        .parse(&entries_page(&[FIRST, SECOND]))
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_terminated(&entries);
}

#[test]
fn test_trailing_diver_without_dd_total_is_dropped() {
    let entries = EntriesParser::new(DEFAULT_BASE_URL)
        .parse(&entries_page(&[FIRST, SECOND, UNTERMINATED]))
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_terminated(&entries);
}

#[test]
fn test_keep_unterminated_flag() {
    let parser = EntriesParser::new(DEFAULT_BASE_URL).keep_unterminated(true);
    assert!(parser.keeps_unterminated());

    let entries = parser.parse(&entries_page(&[FIRST, SECOND, UNTERMINATED])).unwrap();
    assert_eq!(entries.len(), 3);
    assert_terminated(&entries);
    assert_eq!(entries[2].last_name, "Cole");
    assert_eq!(entries[2].dives.len(), 1);
}

#[test]
fn test_single_table_is_none_not_empty() {
    let html = format!("<html><body><table>{}</table></body></html>", diver_rows(&FIRST));
    let parser = EntriesParser::new(DEFAULT_BASE_URL);
    assert_eq!(parser.parse(&html), None);
    assert_eq!(parser.parse("<html><body><p>Meet not found</p></body></html>"), None);
    assert_eq!(parser.parse(&entries_page(&[])), Some(Vec::new()));
}
