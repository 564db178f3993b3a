use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::RawListing;

static NUMERIC_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9.]+").unwrap());

/// Extracts the fixed field set from one listing page.
///
/// Each field has its own lookup strategy and degrades to the empty string
/// on its own: a renamed label or missing element never affects the other
/// fields, and `extract` never fails.
pub struct ListingExtractor;

impl ListingExtractor {
    pub fn new() -> Self {
        ListingExtractor
    }

    pub fn extract(&self, content: &str, url: &str) -> RawListing {
        let doc = Html::parse_document(content);

        RawListing {
            address: first_text(&doc, "span.street-address").unwrap_or_default(),
            zip: first_text(&doc, "span.postal-code").unwrap_or_default(),
            community: labeled_matching_text(&doc, "Community", "span.content.text-right")
                .unwrap_or_default(),
            price: first_text(&doc, "div.info-block.price")
                .as_deref()
                .and_then(first_number)
                .unwrap_or_default(),
            beds: nested_text(&doc, r#"[data-rf-test-id="abp-beds"]"#, "div.statsValue")
                .as_deref()
                .and_then(first_number)
                .unwrap_or_default(),
            baths: nested_text(&doc, r#"[data-rf-test-id="abp-baths"]"#, "div.statsValue")
                .as_deref()
                .and_then(first_number)
                .unwrap_or_default(),
            size: nested_text(&doc, "div.info-block.sqft", "span.statsValue")
                .as_deref()
                .and_then(first_number)
                .unwrap_or_default(),
            style: labeled_text(&doc, "Style").unwrap_or_default(),
            lot: labeled_text(&doc, "Lot Size")
                .as_deref()
                .and_then(first_number)
                .unwrap_or_default(),
            year_built: labeled_text(&doc, "Year Built").unwrap_or_default(),
            status: nested_text(&doc, r#"[data-rf-test-id="abp-status"]"#, "span.value")
                .unwrap_or_default(),
            sold_date: sale_pill_date(&doc).unwrap_or_default(),
            parking: labeled_text(&doc, "Parking Information").unwrap_or_default(),
            broker_comp: labeled_matching_text(
                &doc,
                "Buyer's Brokerage Compensation",
                "span.content.text-right",
            )
            .as_deref()
            .and_then(first_number)
            .unwrap_or_default(),
            url: url.to_string(),
        }
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First maximal run of digits and decimal points, commas stripped.
fn first_number(text: &str) -> Option<String> {
    let stripped = text.replace(',', "");
    NUMERIC_RUN
        .find(&stripped)
        .map(|m| m.as_str().to_string())
}

/// Joined text of the first element matching `selector`.
fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = doc.select(&selector).next()?;
    element_text(element)
}

/// Joined text of the first `inner` element under the first `outer` element.
fn nested_text(doc: &Html, outer: &str, inner: &str) -> Option<String> {
    let outer = Selector::parse(outer).ok()?;
    let inner = Selector::parse(inner).ok()?;
    let element = doc.select(&outer).next()?.select(&inner).next()?;
    element_text(element)
}

/// Text of the first element after the label text node in document order.
fn labeled_text(doc: &Html, label: &str) -> Option<String> {
    labeled_next(doc, label, None)
}

/// Text of the first element matching `selector` after the label text node.
fn labeled_matching_text(doc: &Html, label: &str, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    labeled_next(doc, label, Some(&selector))
}

fn labeled_next(doc: &Html, label: &str, want: Option<&Selector>) -> Option<String> {
    doc.tree
        .root()
        .descendants()
        .skip_while(|node| {
            node.value()
                .as_text()
                .map(|text| text.trim() != label)
                .unwrap_or(true)
        })
        .skip(1)
        .find_map(|node| {
            let element = ElementRef::wrap(node)?;
            if let Some(selector) = want {
                if !selector.matches(&element) {
                    return None;
                }
            }
            element_text(element)
        })
}

/// The sale pill carries the sold date, prefixed by the selling agent tag.
fn sale_pill_date(doc: &Html) -> Option<String> {
    let text = first_text(doc, "div.Pill.Pill--red.HomeSash")?;
    let date = text.replace("SOLD BY REDFIN ", "").trim().to_string();
    if date.is_empty() { None } else { Some(date) }
}

fn element_text(element: ElementRef) -> Option<String> {
    let text = element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"
    <html><body>
      <span class="street-address">123 Main St</span>
      <span class="postal-code">98103</span>
      <div class="info-block price">$450,000</div>
      <div data-rf-test-id="abp-beds"><div class="statsValue">3 bd</div></div>
      <div data-rf-test-id="abp-baths"><div class="statsValue">1.5</div></div>
      <div class="info-block sqft"><span class="statsValue">1,440</span></div>
      <div data-rf-test-id="abp-status"><span class="value">Sold</span></div>
      <div class="Pill Pill--red HomeSash">SOLD BY REDFIN MAY 5, 2020</div>
      <div><span>Community</span><span class="content text-right">Wallingford</span></div>
      <div><span>Style</span><span class="content text-right">2 Story, Craftsman</span></div>
      <div><span>Lot Size</span><span class="content text-right">4,000 Sq. Ft.</span></div>
      <div><span>Year Built</span><span class="content text-right">1926</span></div>
      <div><span>Parking Information</span><span class="content text-right">Off Street</span></div>
      <div><span>Buyer's Brokerage Compensation</span><span class="content text-right">2.5%</span></div>
    </body></html>"#;

    #[test]
    fn test_extracts_every_field() {
        let extractor = ListingExtractor::new();
        let record = extractor.extract(LISTING_PAGE, "/WA/Seattle/123-Main-St/home/1");

        assert_eq!(record.address, "123 Main St");
        assert_eq!(record.zip, "98103");
        assert_eq!(record.community, "Wallingford");
        assert_eq!(record.price, "450000");
        assert_eq!(record.beds, "3");
        assert_eq!(record.baths, "1.5");
        assert_eq!(record.size, "1440");
        assert_eq!(record.style, "2 Story, Craftsman");
        assert_eq!(record.lot, "4000");
        assert_eq!(record.year_built, "1926");
        assert_eq!(record.status, "Sold");
        assert_eq!(record.sold_date, "MAY 5, 2020");
        assert_eq!(record.parking, "Off Street");
        assert_eq!(record.broker_comp, "2.5");
        assert_eq!(record.url, "/WA/Seattle/123-Main-St/home/1");
    }

    #[test]
    fn test_missing_fields_degrade_independently() {
        let page = r#"<html><body>
            <div class="info-block price">$325,500</div>
            <div><span>Year Built</span><span>1984</span></div>
        </body></html>"#;
        let record = ListingExtractor::new().extract(page, "u");

        assert_eq!(record.price, "325500");
        assert_eq!(record.year_built, "1984");
        assert_eq!(record.address, "");
        assert_eq!(record.beds, "");
        assert_eq!(record.style, "");
        assert_eq!(record.sold_date, "");
    }

    #[test]
    fn test_malformed_content_yields_empty_record() {
        for content in ["", "not html at all <<<>>>", "<div unclosed"] {
            let record = ListingExtractor::new().extract(content, "kept");
            assert_eq!(record.url, "kept");
            assert_eq!(record.address, "");
            assert_eq!(record.price, "");
            assert_eq!(record.broker_comp, "");
        }
    }

    #[test]
    fn test_numeric_fields_take_first_run() {
        assert_eq!(first_number("$450,000"), Some("450000".to_string()));
        assert_eq!(first_number("3 bd"), Some("3".to_string()));
        assert_eq!(first_number("1.75 baths"), Some("1.75".to_string()));
        assert_eq!(first_number("no digits"), None);
    }

    #[test]
    fn test_label_without_value_is_a_miss() {
        let page = "<html><body><div><span>Lot Size</span></div></body></html>";
        let record = ListingExtractor::new().extract(page, "u");
        assert_eq!(record.lot, "");
    }
}
