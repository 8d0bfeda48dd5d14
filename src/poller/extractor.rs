use crate::error::{Error, ExtractFailure, Result};

/// Positional offset of the price within the page's currency-marked text
/// fragments. The source page renders the current price as the 11th such
/// fragment; this is a layout artifact of that page, not a general rule, and
/// breaks if the page layout changes.
pub const PRICE_FRAGMENT_INDEX: usize = 11;

/// Pull the price candidate out of a scraped quote page.
///
/// Scans text fragments in document order, keeps the ones containing the
/// currency marker, strips the marker and thousands separators, and selects
/// the 11th match. Scanning stops there; later fragments are never looked at.
///
/// Cross-check: the selected fragment must equal the shortest qualifying
/// fragment seen so far (the price is the tersest currency-marked text on the
/// page). A mismatch is reported as an error instead of emitting a
/// possibly-wrong value. This is a weak heuristic inherited from the source
/// page's fixed layout.
///
/// The returned candidate still goes through `validator::validate` before it
/// is trusted as a price.
pub fn extract(payload: &str, currency_marker: &str) -> Result<String> {
    let mut found = 0usize;
    let mut selected: Option<String> = None;
    let mut shortest: Option<String> = None;

    for fragment in text_fragments(payload) {
        if !fragment.contains(currency_marker) {
            continue;
        }

        let cleaned = clean_fragment(fragment, currency_marker);
        found += 1;

        // First seen wins on equal length.
        let is_shorter = shortest
            .as_ref()
            .map(|s| cleaned.len() < s.len())
            .unwrap_or(true);
        if is_shorter {
            shortest = Some(cleaned.clone());
        }

        if found == PRICE_FRAGMENT_INDEX {
            selected = Some(cleaned);
            break;
        }
    }

    let selected = selected.ok_or(Error::ExtractError(ExtractFailure::InsufficientMatches {
        found,
    }))?;
    let shortest = shortest.unwrap_or_default();

    if selected != shortest {
        return Err(Error::ExtractError(ExtractFailure::CrossCheckMismatch {
            selected,
            shortest,
        }));
    }

    Ok(selected)
}

/// Runs of text between markup tags, in document order, whitespace-trimmed,
/// empty runs dropped.
fn text_fragments<'a>(payload: &'a str) -> impl Iterator<Item = &'a str> {
    payload.split('<').filter_map(|chunk| {
        let text = match chunk.find('>') {
            Some(end) => &chunk[end + 1..],
            // Text before the first tag, or malformed markup: treat as text.
            None => chunk,
        };
        let text = text.trim();
        (!text.is_empty()).then_some(text)
    })
}

/// Strip the currency marker and thousands separators from a fragment.
fn clean_fragment(fragment: &str, currency_marker: &str) -> String {
    fragment
        .replace(currency_marker, "")
        .replace(',', "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Page with `filler` currency-marked fragments before the price fragment,
    /// plus unmarked noise that must not count.
    fn page(filler: usize, price_fragment: &str) -> String {
        let mut body = String::from("<div>Quote page</div>");
        for i in 0..filler {
            body.push_str(&format!("<div>Market cap {i} $1,234,567,890.00</div>"));
        }
        body.push_str(&format!("<div>{price_fragment}</div>"));
        format!("<html><body>{body}</body></html>")
    }

    #[test]
    fn selects_eleventh_fragment_when_it_is_the_shortest() {
        let payload = page(10, "$193.42");
        assert_eq!(extract(&payload, "$").unwrap(), "193.42");
    }

    #[test]
    fn strips_thousands_separators() {
        let payload = page(10, "$1,234.56");
        assert_eq!(extract(&payload, "$").unwrap(), "1234.56");
    }

    #[test]
    fn too_few_fragments_is_insufficient_matches() {
        let payload = page(9, "$193.42");
        let err = extract(&payload, "$").unwrap_err();
        assert!(matches!(
            err,
            Error::ExtractError(ExtractFailure::InsufficientMatches { found: 10 })
        ));
    }

    #[test]
    fn empty_payload_is_insufficient_matches() {
        let err = extract("", "$").unwrap_err();
        assert!(matches!(
            err,
            Error::ExtractError(ExtractFailure::InsufficientMatches { found: 0 })
        ));
    }

    #[test]
    fn eleventh_fragment_longer_than_shortest_is_a_mismatch() {
        // Fragment 3 cleans to something shorter than the 11th.
        let mut body = String::new();
        for i in 0..2 {
            body.push_str(&format!("<div>Market cap {i} $1,234,567,890.00</div>"));
        }
        body.push_str("<div>$1.00</div>");
        for i in 0..7 {
            body.push_str(&format!("<div>Volume {i} $9,876,543,210.00</div>"));
        }
        body.push_str("<div>$193.42</div>");
        let payload = format!("<html><body>{body}</body></html>");

        let err = extract(&payload, "$").unwrap_err();
        match err {
            Error::ExtractError(ExtractFailure::CrossCheckMismatch { selected, shortest }) => {
                assert_eq!(selected, "193.42");
                assert_eq!(shortest, "1.00");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scanning_stops_at_the_eleventh_fragment() {
        // A 12th fragment shorter than the price must not trip the cross-check.
        let mut payload = page(10, "$193.42");
        payload.push_str("<div>$1</div>");
        assert_eq!(extract(&payload, "$").unwrap(), "193.42");
    }

    #[test]
    fn unmarked_fragments_do_not_count() {
        // Only 10 marked fragments; plain-text fragments are ignored.
        let mut body = String::new();
        for i in 0..10 {
            body.push_str(&format!("<div>About {i}</div>"));
            body.push_str(&format!("<div>Close {i} $1,111,111.0{i}</div>"));
        }
        let payload = format!("<html><body>{body}</body></html>");
        let err = extract(&payload, "$").unwrap_err();
        assert!(matches!(
            err,
            Error::ExtractError(ExtractFailure::InsufficientMatches { found: 10 })
        ));
    }

    #[test]
    fn supports_non_dollar_markers() {
        let mut body = String::new();
        for i in 0..10 {
            body.push_str(&format!("<div>Umsatz {i} €1.234.567,89</div>"));
        }
        body.push_str("<div>€42,10</div>");
        let payload = format!("<html><body>{body}</body></html>");
        // Comma is stripped as a thousands separator regardless of locale.
        assert_eq!(extract(&payload, "€").unwrap(), "4210");
    }
}
