//! Bill page field extraction
//!
//! Fields are located by regex over the raw markup, keyed on the element ids
//! the legislature's ASP.NET form view emits. There is no DOM: singular fields
//! take the first match and the action history takes its last entry in
//! document order.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::types::ParsedBill;

/// Highest co-sponsor slot probed (`linkSponsor2` ..= `linkSponsor19`).
pub const MAX_SPONSOR_SLOT: u32 = 19;

static NOT_FOUND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)not found").unwrap());

static BILL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"id="MainContent_formViewLegislation_lblBillID"[^>]*>([^<]+)</span>"#).unwrap()
});

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"id="MainContent_formViewLegislation_lblTitle"[^>]*>([^<]+)</span>"#).unwrap()
});

static PRIMARY_SPONSOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"id="MainContent_formViewLegislation_linkSponsor"[^>]*>([^<]+)</a>"#).unwrap()
});

static CO_SPONSOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"id="MainContent_formViewLegislation_linkSponsor(\d+)"[^>]*>(?:<br/>)?([^<]+)</a>"#,
    )
    .unwrap()
});

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"id="MainContent_formViewLegislation_linkLocation"[^>]*>([^<]+)</a>"#).unwrap()
});

static ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)dataListActions_lblAction_\d+"[^>]*>(.*?)</span>"#).unwrap()
});

static CALENDAR_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Calendar Day:\s*(\d{2}/\d{2}/\d{4})").unwrap());

static ACTION_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<strong>([^<]+)</strong>").unwrap());

/// Parse a bill page. `None` means "not a valid bill page": no content, the
/// site's not-found notice, or no title.
pub fn parse_bill_page(html: Option<&str>) -> Option<ParsedBill> {
    let html = html?;

    if NOT_FOUND_RE.is_match(html) {
        debug!("Page carries a not-found notice");
        return None;
    }

    let title = first_capture(&TITLE_RE, html);
    if title.is_empty() {
        debug!("Page has no title; skipping");
        return None;
    }

    let (status, last_action_date) = last_action(html);

    Some(ParsedBill {
        bill_id: first_capture(&BILL_ID_RE, html),
        title,
        sponsors: sponsors(html),
        status,
        location: first_capture(&LOCATION_RE, html),
        last_action_date,
    })
}

/// Trimmed first capture group of the first match, or empty.
fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Primary sponsor (if any), then co-sponsor slots 2, 3, ... up to the first
/// slot that is missing. A gap in the page's numbering truncates the list.
pub fn sponsors(html: &str) -> Vec<String> {
    let mut names = Vec::new();

    let primary = first_capture(&PRIMARY_SPONSOR_RE, html);
    if !primary.is_empty() {
        names.push(primary);
    }

    // First occurrence of each slot wins
    let mut slots: HashMap<u32, String> = HashMap::new();
    for caps in CO_SPONSOR_RE.captures_iter(html) {
        let Ok(slot) = caps[1].parse::<u32>() else {
            continue;
        };
        slots
            .entry(slot)
            .or_insert_with(|| caps[2].trim().to_string());
    }

    for slot in 2..=MAX_SPONSOR_SLOT {
        match slots.remove(&slot) {
            Some(name) => names.push(name),
            None => break,
        }
    }

    names
}

/// `(status, date)` from the last action entry in document order.
pub fn last_action(html: &str) -> (String, String) {
    let Some(entry) = ACTION_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .last()
    else {
        return (String::new(), String::new());
    };
    let entry = entry.as_str();

    (
        first_capture(&ACTION_TEXT_RE, entry),
        first_capture(&CALENDAR_DAY_RE, entry),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "MainContent_formViewLegislation_";

    fn span(id: &str, text: &str) -> String {
        format!(r#"<span id="{PREFIX}{id}" class="x">{text}</span>"#)
    }

    fn link(id: &str, text: &str) -> String {
        format!(r#"<a id="{PREFIX}{id}" href="/Members/Legislator?SponCode=X">{text}</a>"#)
    }

    fn action(n: usize, day: &str, text: &str) -> String {
        format!(
            r#"<span id="MainContent_tabContainerLegislation_tabPanelActions_dataListActions_lblAction_{n}">Legislative Day: {n}<br/>Calendar Day: {day}</br><strong>{text}</strong></span>"#
        )
    }

    fn page(body: &[String]) -> String {
        format!("<html><body><form>{}</form></body></html>", body.concat())
    }

    fn sample_page() -> String {
        page(&[
            span("lblBillID", "HB 12"),
            span("lblTitle", " WATER RIGHTS ADJUDICATION "),
            link("linkSponsor", "Jane Doe"),
            link("linkSponsor2", "<br/>John Roe"),
            link("linkLocation", "HENRC - House Energy Committee"),
            action(1, "01/20/2026", "Sent to HENRC"),
            action(2, "01/27/2026", "HENRC: Do Pass"),
        ])
    }

    #[test]
    fn test_parse_full_page() {
        let html = sample_page();
        let bill = parse_bill_page(Some(&html)).unwrap();
        assert_eq!(bill.bill_id, "HB 12");
        assert_eq!(bill.title, "WATER RIGHTS ADJUDICATION");
        assert_eq!(bill.sponsors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(bill.location, "HENRC - House Energy Committee");
        assert_eq!(bill.status, "HENRC: Do Pass");
        assert_eq!(bill.last_action_date, "01/27/2026");
    }

    #[test]
    fn test_no_content_is_invalid() {
        assert_eq!(parse_bill_page(None), None);
    }

    #[test]
    fn test_not_found_marker_wins() {
        let mut html = sample_page();
        html.push_str("<p>Legislation Not Found</p>");
        assert_eq!(parse_bill_page(Some(&html)), None);

        let html = format!("{}<!-- NOT FOUND -->", sample_page());
        assert_eq!(parse_bill_page(Some(&html)), None);
    }

    #[test]
    fn test_missing_title_is_invalid() {
        let html = page(&[span("lblBillID", "HB 12"), link("linkSponsor", "Jane Doe")]);
        assert_eq!(parse_bill_page(Some(&html)), None);

        let html = page(&[span("lblTitle", "   ")]);
        assert_eq!(parse_bill_page(Some(&html)), None);
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let html = page(&[span("lblTitle", "A BILL")]);
        let bill = parse_bill_page(Some(&html)).unwrap();
        assert_eq!(
            bill,
            ParsedBill {
                title: "A BILL".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_first_match_wins() {
        let html = page(&[
            span("lblTitle", "FIRST"),
            span("lblTitle", "SECOND"),
            link("linkLocation", "HAFC"),
            link("linkLocation", "SFC"),
        ]);
        let bill = parse_bill_page(Some(&html)).unwrap();
        assert_eq!(bill.title, "FIRST");
        assert_eq!(bill.location, "HAFC");
    }

    #[test]
    fn test_sponsors_without_gap() {
        let mut body = vec![link("linkSponsor", "One")];
        for (slot, name) in [(2, "Two"), (3, "Three"), (4, "Four")] {
            body.push(link(&format!("linkSponsor{slot}"), name));
        }
        assert_eq!(sponsors(&page(&body)), vec!["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn test_sponsors_truncate_at_gap() {
        // Slot 4 missing: Five is dropped even though it is on the page
        let body = vec![
            link("linkSponsor", "One"),
            link("linkSponsor2", "Two"),
            link("linkSponsor3", "Three"),
            link("linkSponsor5", "Five"),
        ];
        assert_eq!(sponsors(&page(&body)), vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_sponsors_gap_at_first_co_sponsor() {
        let body = vec![link("linkSponsor", "One"), link("linkSponsor3", "Three")];
        assert_eq!(sponsors(&page(&body)), vec!["One"]);
    }

    #[test]
    fn test_sponsors_follow_slot_order_not_page_order() {
        let body = vec![
            link("linkSponsor3", "Three"),
            link("linkSponsor", "One"),
            link("linkSponsor2", "Two"),
        ];
        assert_eq!(sponsors(&page(&body)), vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_co_sponsor_without_primary() {
        let body = vec![link("linkSponsor2", "Two")];
        assert_eq!(sponsors(&page(&body)), vec!["Two"]);
    }

    #[test]
    fn test_sponsor_slots_are_bounded() {
        let mut body = vec![link("linkSponsor", "S1")];
        for slot in 2..=25 {
            body.push(link(&format!("linkSponsor{slot}"), &format!("S{slot}")));
        }
        let names = sponsors(&page(&body));
        assert_eq!(names.len(), MAX_SPONSOR_SLOT as usize);
        assert_eq!(names.last().map(String::as_str), Some("S19"));
    }

    #[test]
    fn test_last_action_follows_document_order() {
        // Entries out of chronological order: the last one in the markup wins
        let html = page(&[
            span("lblTitle", "A BILL"),
            action(0, "03/01/2026", "Signed by Governor"),
            action(1, "01/15/2026", "Introduced"),
        ]);
        let bill = parse_bill_page(Some(&html)).unwrap();
        assert_eq!(bill.status, "Introduced");
        assert_eq!(bill.last_action_date, "01/15/2026");
    }

    #[test]
    fn test_last_action_spans_lines() {
        let html = concat!(
            r#"<span id="x_dataListActions_lblAction_0">Legislative Day: 1"#,
            "\n",
            r#"<br/>Calendar Day: 02/02/2026</br>"#,
            "\n",
            r#"<strong> Referred to HEC </strong></span>"#
        );
        assert_eq!(
            last_action(html),
            ("Referred to HEC".to_string(), "02/02/2026".to_string())
        );
    }

    #[test]
    fn test_last_action_missing_parts() {
        let html = r#"<span id="x_dataListActions_lblAction_0">Legislative Day: 1</span>"#;
        assert_eq!(last_action(html), (String::new(), String::new()));
        assert_eq!(last_action("<html></html>"), (String::new(), String::new()));
    }
}
