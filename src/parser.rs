use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};

use crate::models::MarkRecord;
use crate::provider::{Markers, Provider, SentenceLocator};

/// Extract a provider's mark record from a raw search result page.
///
/// Never fails: an empty body or a page without the provider's label
/// element yields the "no mark" sentinel, and every other missing piece
/// only leaves the matching field unset.
pub fn parse(provider: Provider, body: &str) -> MarkRecord {
    if body.is_empty() {
        return MarkRecord::no_mark(provider);
    }

    let markers = provider.markers();
    let label_selector = match Selector::parse(markers.label_selector) {
        Ok(selector) => selector,
        Err(e) => {
            error!(%provider, selector = markers.label_selector, "invalid label selector: {:?}", e);
            return MarkRecord::no_mark(provider);
        }
    };

    let document = Html::parse_document(body);
    let label = match document.select(&label_selector).next() {
        Some(label) => label,
        None => {
            debug!(%provider, "no mark label on page");
            return MarkRecord::no_mark(provider);
        }
    };

    let mut record = MarkRecord::no_mark(provider);
    record.set_mark(element_text(label));

    let sentence = match find_sentence(&document, label, markers) {
        Some(sentence) => sentence,
        None => return record,
    };
    let desc = match element_text(sentence) {
        Some(desc) => desc,
        None => return record,
    };

    let (count_prefix, count_suffix) = markers.count;
    if let Some(count) = substr_between(&desc, count_prefix, count_suffix) {
        record.set_count(to_count(count));
    }
    let (category_prefix, category_suffix) = markers.mark_as;
    record.set_mark_as(substr_between(&desc, category_prefix, category_suffix).map(str::to_string));
    record.set_origin_desc(Some(desc));

    if let Ok(link_selector) = Selector::parse("a") {
        record.set_source(sentence.select(&link_selector).next().and_then(element_text));
    }

    debug!(%provider, mark = ?record.mark(), count = record.count(), "parsed mark");
    record
}

fn find_sentence<'a>(
    document: &'a Html,
    label: ElementRef<'a>,
    markers: &Markers,
) -> Option<ElementRef<'a>> {
    match markers.sentence {
        SentenceLocator::Selector(selector) => {
            let selector = Selector::parse(selector).ok()?;
            document.select(&selector).next()
        }
        SentenceLocator::NextSibling => label.next_siblings().find_map(ElementRef::wrap),
    }
}

/// Visible text of an element: whitespace collapsed and trimmed, `None` if empty.
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// The text strictly between the first `begin` and the first `end` after it.
/// An empty span counts as not found.
pub fn substr_between<'a>(text: &'a str, begin: &str, end: &str) -> Option<&'a str> {
    let start = text.find(begin)? + begin.len();
    let len = text[start..].find(end)?;
    if len == 0 {
        return None;
    }
    Some(&text[start..start + len])
}

/// Parse a report count, treating anything unparsable as zero.
fn to_count(fragment: &str) -> u32 {
    fragment.trim().parse().unwrap_or(0)
}
