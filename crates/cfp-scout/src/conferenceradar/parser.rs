use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::parser::{ParseError, elem_text, resolve_href};
use crate::types::Candidate;

static EVENT_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".event-item").expect("invalid selector: event item"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".title").expect("invalid selector: title"));
static DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".date").expect("invalid selector: date"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: link"));

fn first_text(item: ElementRef, selector: &Selector) -> String {
    item.select(selector).next().map(elem_text).unwrap_or_default()
}

/// Search results come as `.event-item` blocks. The site publishes no
/// location, so it is always left empty.
pub fn parse_search_results(html: &str, base_url: &str) -> Result<Vec<Candidate>, ParseError> {
    let document = Html::parse_document(html);

    let mut items = document.select(&EVENT_ITEM).peekable();
    if items.peek().is_none() {
        return Err(ParseError::MissingStructure("event items".to_string()));
    }

    let mut candidates = Vec::new();

    for item in items {
        let title = first_text(item, &TITLE);

        let href = item
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        if href.trim().is_empty() {
            log::debug!("Skipping event item without link: '{title}'");
            continue;
        }

        let identifier = match resolve_href(base_url, href) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Skipping event item '{title}': {e}");
                continue;
            }
        };

        candidates.push(Candidate::new(
            identifier,
            title,
            first_text(item, &DATE),
            String::new(),
        ));
    }

    Ok(candidates)
}
