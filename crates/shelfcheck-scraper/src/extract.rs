//! Tag scanning over raw page HTML.
//!
//! Pages are scanned with tag-level regexes rather than a DOM: only `<a>`
//! and `<img>` tags matter, and a malformed page should still give up
//! whatever links it has.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use shelfcheck_core::asin::identifiers_from_urls;
use shelfcheck_core::Asin;

static ANCHOR_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>").expect("valid anchor regex"));
static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img regex"));
static HREF_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("href"));
static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("src"));

/// Matches `name=value` inside a tag, with double, single or no quotes. The
/// name must follow whitespace so `data-src` does not count as `src`.
fn attr_regex(name: &str) -> Regex {
    let pattern = format!(
        r#"(?is)\s{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
        regex::escape(name)
    );
    Regex::new(&pattern).expect("valid attr regex")
}

fn attr_value(tag: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(tag)?;
    let raw = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    let value = raw.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Resolves `candidate` against `base`, unescaping `&amp;` first. Returns
/// `None` for anything that does not resolve to an http(s) URL.
pub(crate) fn absolutize_url(base: &Url, candidate: &str) -> Option<Url> {
    let candidate = candidate.replace("&amp;", "&");
    let joined = base.join(&candidate).ok()?;
    matches!(joined.scheme(), "http" | "https").then_some(joined)
}

fn resolved_attrs(base: &Url, html: &str, tag_re: &Regex, attr_re: &Regex) -> Vec<Url> {
    tag_re
        .find_iter(html)
        .filter_map(|m| attr_value(m.as_str(), attr_re))
        .filter_map(|raw| absolutize_url(base, &raw))
        .collect()
}

/// Absolute URLs of every `<img src>` on the page, in document order.
#[must_use]
pub fn image_sources(base: &Url, html: &str) -> Vec<String> {
    resolved_attrs(base, html, &IMG_TAG_RE, &SRC_ATTR_RE)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Absolute URLs of every `<a href>` whose host contains
/// `marketplace_domain`, in document order.
#[must_use]
pub fn marketplace_links(base: &Url, html: &str, marketplace_domain: &str) -> Vec<String> {
    let domain = marketplace_domain.to_ascii_lowercase();
    resolved_attrs(base, html, &ANCHOR_TAG_RE, &HREF_ATTR_RE)
        .into_iter()
        .filter(|url| {
            url.host_str()
                .is_some_and(|host| host.to_ascii_lowercase().contains(&domain))
        })
        .map(String::from)
        .collect()
}

/// Identifiers named by the page's marketplace links, first-seen order.
#[must_use]
pub fn link_identifiers(base: &Url, html: &str, marketplace_domain: &str) -> Vec<Asin> {
    let links = marketplace_links(base, html, marketplace_domain);
    identifiers_from_urls(links.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://blog.example.com/reviews/best-widgets").unwrap()
    }

    fn ids(asins: &[Asin]) -> Vec<&str> {
        asins.iter().map(Asin::as_str).collect()
    }

    #[test]
    fn resolves_relative_image_sources() {
        let html = r#"<p><img src="/img/a.png"><IMG class="x" SRC='b.jpg' alt="b"></p>"#;
        assert_eq!(
            image_sources(&base(), html),
            vec![
                "https://blog.example.com/img/a.png",
                "https://blog.example.com/reviews/b.jpg",
            ]
        );
    }

    #[test]
    fn data_src_is_not_src() {
        let html = r#"<img data-src="/lazy.png" src="/real.png">"#;
        assert_eq!(
            image_sources(&base(), html),
            vec!["https://blog.example.com/real.png"]
        );
    }

    #[test]
    fn img_without_src_is_skipped() {
        let html = r#"<img alt="nothing"><img src="">"#;
        assert!(image_sources(&base(), html).is_empty());
    }

    #[test]
    fn unescapes_ampersands_in_query() {
        let html = r#"<img src="https://ws-na.amazon-adsystem.com/widgets/q?_encoding=UTF8&amp;ASIN=B01ABCDEF0&amp;Format=_SL250_">"#;
        let got = image_sources(&base(), html);
        assert_eq!(
            got,
            vec!["https://ws-na.amazon-adsystem.com/widgets/q?_encoding=UTF8&ASIN=B01ABCDEF0&Format=_SL250_"]
        );
    }

    #[test]
    fn only_marketplace_links_are_kept() {
        let html = r#"
            <a href="https://www.amazon.com/Widget/dp/B000000001/ref=x">one</a>
            <a href="https://example.org/dp/B000000009">elsewhere</a>
            <a href="/dp/B000000008">relative to the blog</a>
            <a href="mailto:someone@amazon.com">mail</a>
            <a href="https://smile.amazon.com/dp/B000000002">two</a>
        "#;
        let links = marketplace_links(&base(), html, "amazon.com");
        assert_eq!(
            links,
            vec![
                "https://www.amazon.com/Widget/dp/B000000001/ref=x",
                "https://smile.amazon.com/dp/B000000002",
            ]
        );
    }

    #[test]
    fn link_identifiers_dedupe_in_page_order() {
        let html = r#"
            <a href="https://www.amazon.com/dp/B000000003">c</a>
            <a href="https://www.amazon.com/x/dp/B000000001">a</a>
            <a href="https://www.amazon.com/gp/help">no id</a>
            <a href="https://www.amazon.com/dp/B000000003?th=1">c again</a>
            <a href="https://www.amazon.com/y/dp/B000000002">b</a>
            <a href="https://www.amazon.com/x/dp/B000000001#reviews">a again</a>
        "#;
        let got = link_identifiers(&base(), html, "amazon.com");
        assert_eq!(ids(&got), vec!["B000000003", "B000000001", "B000000002"]);
    }

    #[test]
    fn marketplace_match_is_case_insensitive() {
        let html = r#"<a href="https://WWW.AMAZON.COM/dp/B000000004">x</a>"#;
        let got = link_identifiers(&base(), html, "Amazon.com");
        assert_eq!(ids(&got), vec!["B000000004"]);
    }
}
