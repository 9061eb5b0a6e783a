//! Filesystem-safe names derived from the run's input.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

static PERCENT_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9a-fA-F]{2}").expect("valid percent-escape regex"));
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/.,\s]").expect("valid separator regex"));
static DASH_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid dash-run regex"));

const FALLBACK_NAME: &str = "report";

/// Turns a URL or identifier list into a hyphenated token.
///
/// Input with a `scheme://host` authority is reduced to its path. Case is
/// kept. Percent escapes, `/`, `.`, `,` and whitespace become `-`, runs of
/// `-` collapse, and leading/trailing `-` are trimmed. The output never
/// contains `/`, so it is never mistaken for a URL on a second pass and
/// `slug(slug(x)) == slug(x)`.
#[must_use]
pub fn slug(input: &str) -> String {
    let trimmed = input.trim();
    let path = match Url::parse(trimmed) {
        Ok(url) if url.has_host() && trimmed.contains("://") => url.path().to_string(),
        _ => trimmed.to_string(),
    };

    let unescaped = PERCENT_ESCAPE_RE.replace_all(&path, "-");
    let separated = SEPARATOR_RE.replace_all(&unescaped, "-");
    let collapsed = DASH_RUN_RE.replace_all(&separated, "-");
    collapsed.trim_matches('-').to_string()
}

/// `<slug>.html`, or `report.html` when the slug comes out empty (for
/// example a bare site root).
#[must_use]
pub fn report_file_name(input: &str) -> String {
    let name = slug(input);
    if name.is_empty() {
        format!("{FALLBACK_NAME}.html")
    } else {
        format!("{name}.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_host() {
        assert_eq!(slug("https://example.com/a/b.c,d"), "a-b-c-d");
    }

    #[test]
    fn drops_query_and_fragment() {
        assert_eq!(
            slug("https://blog.example.com/reviews/best-widgets/?utm=x#top"),
            "reviews-best-widgets"
        );
    }

    #[test]
    fn replaces_percent_escapes() {
        assert_eq!(slug("https://example.com/gift%20ideas/2024"), "gift-ideas-2024");
    }

    #[test]
    fn identifier_list_keeps_case() {
        assert_eq!(slug("B0ABC,B0DEF"), "B0ABC-B0DEF");
        assert_eq!(slug("X,Y"), "X-Y");
    }

    #[test]
    fn whitespace_becomes_hyphen() {
        assert_eq!(slug("B01, B02"), "B01-B02");
        assert_eq!(slug("B01 ,\tB02"), "B01-B02");
    }

    #[test]
    fn scheme_without_authority_is_kept_as_text() {
        assert_eq!(slug("https://example.com/http:foo.com"), "http:foo-com");
        assert_eq!(slug("http:foo-com"), "http:foo-com");
        assert_eq!(slug("https:%2F%2Fexample.com"), "https:-example-com");
    }

    #[test]
    fn collapses_and_trims_hyphens() {
        assert_eq!(slug("--a//b..c,,--"), "a-b-c");
    }

    #[test]
    fn is_idempotent() {
        for input in [
            "https://example.com/a/b.c,d",
            "https://Example.com/Some%2FPath/With.Dots/",
            "B0ABC, B0DEF",
            "already-a-slug",
            "mailto:someone",
            "",
            "https://example.com/",
            "https://example.com/http:foo.com",
            "https:%2F%2Fexample.com",
            "http:https://http:x.com",
            "http://x.com//http:x.com",
            "x.com%20http:,//x.com",
            "https://Example.com/Mixed%20Case/Page",
        ] {
            let once = slug(input);
            assert_eq!(slug(&once), once, "slug not idempotent for {input:?}");
        }
    }

    #[test]
    fn file_name_falls_back_for_empty_slug() {
        assert_eq!(report_file_name("https://example.com/"), "report.html");
        assert_eq!(report_file_name("X,Y"), "X-Y.html");
    }
}
