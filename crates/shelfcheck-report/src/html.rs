//! Static HTML rendering of a compiled [`Report`].

use crate::compile::{ProductView, Report};
use shelfcheck_core::Status;

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Product Page</title>
<link rel="stylesheet" href="style.css">
<script>
document.addEventListener("DOMContentLoaded", function() {
    document.querySelectorAll(".copyButton").forEach(function(button) {
        button.addEventListener("click", function() {
            var textToCopy = this.getAttribute("data-text-to-copy");
            navigator.clipboard.writeText(textToCopy).then(function() {
                console.log("Copied to clipboard: " + textToCopy);
            }).catch(function(err) {
                console.error("Error copying text: ", err);
            });
        });
    });
});
</script>
</head>
"#;

/// Renders the full document: fixed head, then one container per section.
#[must_use]
pub fn render_html(report: &Report) -> String {
    let mut html = String::from(HTML_HEAD);
    html.push_str("<body>\n");

    for section in &report.sections {
        html.push_str("<div class=\"container\">\n");
        render_product(&mut html, &section.primary);
        if let Some(replacement) = &section.replacement {
            html.push_str(&format!(
                "<div class=\"replacement\">{}</div>\n",
                escape(&replacement.note)
            ));
            render_product(&mut html, &replacement.product);
        }
        html.push_str("<div class=\"rule\"></div>\n</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_product(html: &mut String, product: &ProductView) {
    let detail = escape(&product.detail_url);
    let link = escape(&product.link);
    html.push_str(&format!("<h3>{}</h3>\n", escape(&product.title)));
    html.push_str(&format!("<div class=\"asin\">{}</div>\n", escape(product.asin.as_str())));
    html.push_str(&format!(
        "<a class=\"detail\" href=\"{detail}\">{detail}</a> <button class=\"copyButton\" data-text-to-copy=\"{link}\">Copy</button><br>\n"
    ));

    for listing in &product.listings {
        html.push_str(&format!("<div class=\"brand\">{}</div>\n", escape(&listing.merchant)));
        html.push_str("<ul>\n");
        html.push_str(&format!("<li>condition : {}</li>\n", escape(&listing.condition)));
        html.push_str(&format!(
            "<li>availability : {}</li>\n",
            escape(&listing.availability)
        ));
        html.push_str("</ul>\n");
    }

    let status_class = match product.status {
        Status::Available => "available",
        Status::Borked => "borked",
    };
    html.push_str(&format!(
        "<div class=\"status status-{status_class}\">{}</div>\n",
        product.status
    ));

    let img_tags: Vec<String> = product
        .images
        .iter()
        .map(|image| {
            let mut tag = format!("<img src=\"{}\"", escape(&image.url));
            if let Some(width) = image.width {
                tag.push_str(&format!(" width=\"{width}\""));
            }
            if let Some(height) = image.height {
                tag.push_str(&format!(" height=\"{height}\""));
            }
            tag.push_str(&format!(" alt=\"{} image\">", image.size));
            tag
        })
        .collect();
    if !img_tags.is_empty() {
        html.push_str(&img_tags.join("\n"));
        html.push('\n');
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use shelfcheck_core::{Asin, ImageSize, ImageVariant, Listing, ProductRecord, ReplacementLookup};

    use super::*;
    use crate::compile::{compile, AffiliateLinks};

    fn asin(raw: &str) -> Asin {
        Asin::parse(raw).unwrap()
    }

    fn links() -> AffiliateLinks {
        AffiliateLinks::new("www.amazon.com", "shelfcheck-20")
    }

    fn report_for(records: Vec<ProductRecord>, replacements: &ReplacementLookup) -> Report {
        let ids: Vec<Asin> = records.iter().map(|r| r.asin.clone()).collect();
        let primary: HashMap<_, _> = records.into_iter().map(|r| (r.asin.clone(), r)).collect();
        compile(&ids, &primary, replacements, &links())
    }

    #[test]
    fn document_has_head_and_one_container_per_section() {
        let report = report_for(
            vec![ProductRecord::new(asin("X")), ProductRecord::new(asin("Y"))],
            &ReplacementLookup::new(),
        );
        let html = render_html(&report);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("name=\"viewport\""));
        assert!(html.contains("data-text-to-copy"));
        assert_eq!(html.matches("<div class=\"container\">").count(), 2);
        assert!(html.find("<div class=\"asin\">X</div>").unwrap() < html.find("<div class=\"asin\">Y</div>").unwrap());
        assert!(!html.contains("class=\"replacement\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn renders_listings_status_and_images() {
        let record = ProductRecord {
            title: Some("Blue <Widget>".to_string()),
            listings: vec![Listing {
                merchant_name: Some("Widgets & Co".to_string()),
                condition: Some("New".to_string()),
                availability_message: Some("In Stock".to_string()),
                availability_type: Some("Now".to_string()),
            }],
            images: vec![
                ImageVariant {
                    size: ImageSize::Small,
                    url: "https://m.media-amazon.com/s.jpg".to_string(),
                    width: Some(75),
                    height: Some(60),
                },
                ImageVariant {
                    size: ImageSize::Large,
                    url: "https://m.media-amazon.com/l.jpg".to_string(),
                    width: None,
                    height: None,
                },
            ],
            ..ProductRecord::new(asin("B000000001"))
        };
        let html = render_html(&report_for(vec![record], &ReplacementLookup::new()));

        assert!(html.contains("<h3>Blue &lt;Widget&gt;</h3>"));
        assert!(html.contains("<div class=\"brand\">Widgets &amp; Co</div>"));
        assert!(html.contains("<li>condition : New</li>"));
        assert!(html.contains("<li>availability : In Stock Now</li>"));
        assert!(html.contains("<div class=\"status status-available\">AVAILABLE</div>"));
        assert!(html.contains(
            "<img src=\"https://m.media-amazon.com/s.jpg\" width=\"75\" height=\"60\" alt=\"small image\">"
        ));
        assert!(html.contains("<img src=\"https://m.media-amazon.com/l.jpg\" alt=\"large image\">"));
        assert!(html.contains(
            "data-text-to-copy=\"https://www.amazon.com/dp/B000000001/?tag=shelfcheck-20\""
        ));
    }

    #[test]
    fn upstream_detail_url_is_the_rendered_link() {
        let record = ProductRecord {
            detail_page_url: Some("https://www.amazon.com/dp/B000000003?tag=up-20&th=1".to_string()),
            ..ProductRecord::new(asin("B000000003"))
        };
        let html = render_html(&report_for(vec![record], &ReplacementLookup::new()));

        assert!(html.contains(
            "<a class=\"detail\" href=\"https://www.amazon.com/dp/B000000003?tag=up-20&amp;th=1\">"
        ));
        assert!(html.contains(
            "data-text-to-copy=\"https://www.amazon.com/dp/B000000003/?tag=shelfcheck-20\""
        ));
    }

    #[test]
    fn sparse_product_renders_without_listings_or_images() {
        let html = render_html(&report_for(
            vec![ProductRecord::new(asin("B000000002"))],
            &ReplacementLookup::new(),
        ));
        assert!(!html.contains("<div class=\"brand\">"));
        assert!(!html.contains("<img"));
        assert!(html.contains("status-borked\">BORKED</div>"));
    }

    #[test]
    fn replacement_renders_below_primary() {
        let mut replacements = ReplacementLookup::new();
        replacements.insert(asin("A"), ProductRecord::new(asin("B")));
        let html = render_html(&report_for(vec![ProductRecord::new(asin("A"))], &replacements));

        let primary = html.find("<div class=\"asin\">A</div>").unwrap();
        let banner = html
            .find("<div class=\"replacement\">A has been replaced by B</div>")
            .unwrap();
        let replacement = html.find("<div class=\"asin\">B</div>").unwrap();
        assert!(primary < banner && banner < replacement);
        assert_eq!(html.matches("<div class=\"container\">").count(), 1);
    }

    #[test]
    fn escape_covers_attribute_breakers() {
        assert_eq!(escape(r#"a"b'c<d>&"#), "a&quot;b&#39;c&lt;d&gt;&amp;");
    }
}
