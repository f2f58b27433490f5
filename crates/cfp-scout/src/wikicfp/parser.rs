use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::{ParseError, elem_text, resolve_href};
use crate::types::Candidate;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("invalid selector: row"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("invalid selector: cell"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: link"));

const MIN_CELLS: usize = 5;

/// Listing rows have at least five cells: title (holding the event link),
/// date and location come first.
pub fn parse_event_table(html: &str, base_url: &str) -> Result<Vec<Candidate>, ParseError> {
    let document = Html::parse_document(html);

    let mut rows = document.select(&ROW).peekable();
    if rows.peek().is_none() {
        return Err(ParseError::MissingStructure("table rows".to_string()));
    }

    let mut candidates = Vec::new();

    for row in rows {
        let cells: Vec<_> = row.select(&CELL).collect();
        if cells.len() < MIN_CELLS {
            continue;
        }

        let Some(href) = cells[0]
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let identifier = match resolve_href(base_url, href) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Skipping row: {e}");
                continue;
            }
        };

        candidates.push(Candidate::new(
            identifier,
            elem_text(cells[0]),
            elem_text(cells[1]),
            elem_text(cells[2]),
        ));
    }

    Ok(candidates)
}
