//! Script reference harvesting from HTML documents.

use scraper::{Html, Selector};

/// Collect the raw `src` of every `<script>` element, in document order.
///
/// Values are returned unresolved (relative, protocol-relative or absolute).
/// The parser recovers from malformed markup, so broken HTML yields whatever
/// scripts it could still locate, possibly none.
pub fn extract_script_srcs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("script[src]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::to_string)
        .collect()
}
