//! Reading board state out of rendered HTML.
//!
//! Card elements carry `data-task-id`, `data-status` and `data-personal`;
//! column elements carry `data-column-status`. Nothing else about the markup
//! is interpreted.

use crate::domain::board::{BoardSnapshot, ColumnSnapshot};
use crate::domain::card::{Card, CardId};
use crate::domain::status::Status;
use crate::error::{BoardError, Result};
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;

pub const CARD_ID_ATTR: &str = "data-task-id";
pub const CARD_STATUS_ATTR: &str = "data-status";
pub const CARD_PERSONAL_ATTR: &str = "data-personal";
pub const COLUMN_STATUS_ATTR: &str = "data-column-status";
pub const COLUMN_NAME_ATTR: &str = "data-column-name";

/// The server's rendering of a card after a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub id: Option<CardId>,
    pub status: Option<Status>,
    pub is_personal: Option<bool>,
    /// Outer HTML of the outermost element
    pub markup: String,
}

impl RenderedCard {
    /// Extracts the outermost element of a response body.
    ///
    /// Returns `None` when the body holds no element at all.
    pub fn parse(body: &str) -> Option<Self> {
        let fragment = Html::parse_fragment(body);
        let element = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)?;

        Some(Self {
            id: attr(&element, CARD_ID_ATTR).and_then(|v| CardId::from_str(v).ok()),
            status: attr(&element, CARD_STATUS_ATTR).and_then(|v| Status::from_str(v).ok()),
            is_personal: attr(&element, CARD_PERSONAL_ATTR).map(parse_flag),
            markup: element.html(),
        })
    }
}

/// Scans a rendered board for its columns and cards.
///
/// Cards are read in document order, which is their display order within a
/// column.
pub fn scan_board(html: &str) -> Result<BoardSnapshot> {
    let document = Html::parse_document(html);
    let column_selector = selector(&format!("[{COLUMN_STATUS_ATTR}]"))?;
    let card_selector = selector(&format!("[{CARD_ID_ATTR}]"))?;

    let mut snapshot = BoardSnapshot::default();

    for element in document.select(&column_selector) {
        let Some(raw) = attr(&element, COLUMN_STATUS_ATTR) else {
            continue;
        };
        match Status::from_str(raw) {
            Ok(status) => snapshot.columns.push(ColumnSnapshot {
                status,
                name: attr(&element, COLUMN_NAME_ATTR).map(str::to_string),
            }),
            Err(_) => tracing::warn!(status = %raw, "Ignoring column with unknown status"),
        }
    }

    for element in document.select(&card_selector) {
        match card_from_element(&element) {
            Ok(card) => snapshot.cards.push(card),
            Err(err) => tracing::warn!(error = %err, "Ignoring unreadable card element"),
        }
    }

    tracing::debug!(
        columns = snapshot.columns.len(),
        cards = snapshot.cards.len(),
        "Scanned board markup"
    );
    Ok(snapshot)
}

fn card_from_element(element: &ElementRef<'_>) -> Result<Card> {
    let id = attr(element, CARD_ID_ATTR)
        .ok_or_else(|| BoardError::MarkupError(format!("missing {CARD_ID_ATTR}")))?;
    let status = attr(element, CARD_STATUS_ATTR)
        .ok_or_else(|| BoardError::MarkupError(format!("card {id} missing {CARD_STATUS_ATTR}")))?;

    Ok(Card {
        id: CardId::from_str(id)?,
        status: Status::from_str(status)?,
        is_personal: attr(element, CARD_PERSONAL_ATTR)
            .map(parse_flag)
            .unwrap_or(false),
        markup: element.html(),
    })
}

fn attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

// Templates render booleans as "true"/"True"/"1"; a bare attribute counts as set.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "" | "true" | "1" | "yes")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| BoardError::MarkupError(format!("invalid selector '{css}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_HTML: &str = r#"
        <html><body>
        <div class="kanban">
          <section data-column-status="todo" data-column-name="Backlog">
            <article data-task-id="1" data-status="todo" data-personal="false">One</article>
          </section>
          <section data-column-status="in_progress">
            <article data-task-id="2" data-status="in_progress" data-personal="True">Two</article>
            <article data-task-id="3" data-status="in_progress">Three</article>
          </section>
          <section data-column-status="archived"></section>
          <article data-task-id="4">No status</article>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_scan_board_reads_columns_and_cards() {
        let snapshot = scan_board(BOARD_HTML).unwrap();

        let statuses: Vec<Status> = snapshot.columns.iter().map(|c| c.status).collect();
        assert_eq!(statuses, vec![Status::Todo, Status::InProgress]);
        assert_eq!(snapshot.columns[0].name.as_deref(), Some("Backlog"));

        let ids: Vec<&str> = snapshot.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(!snapshot.cards[0].is_personal);
        assert!(snapshot.cards[1].is_personal);
        assert!(snapshot.cards[2].markup.contains("Three"));
    }

    #[test]
    fn test_rendered_card_takes_outermost_element() {
        let body = r#"
            <div data-task-id="2" data-status="review" data-personal="false" class="card">
              <span>Updated title</span>
            </div>
        "#;
        let card = RenderedCard::parse(body).unwrap();

        assert_eq!(card.id.unwrap().as_str(), "2");
        assert_eq!(card.status, Some(Status::Review));
        assert_eq!(card.is_personal, Some(false));
        assert!(card.markup.starts_with("<div"));
        assert!(card.markup.contains("Updated title"));
    }

    #[test]
    fn test_rendered_card_without_attributes() {
        let card = RenderedCard::parse("<li>plain</li>").unwrap();
        assert!(card.id.is_none());
        assert!(card.status.is_none());
        assert!(card.is_personal.is_none());
    }

    #[test]
    fn test_rendered_card_rejects_text_only_body() {
        assert!(RenderedCard::parse("").is_none());
        assert!(RenderedCard::parse("just some text").is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("True"));
        assert!(parse_flag("1"));
        assert!(parse_flag(""));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
    }
}
