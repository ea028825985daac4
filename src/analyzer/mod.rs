//! Meta tag extraction, validation, recommendations and scoring.
//!
//! `analyze` is a pure function of `(html, url)`: it performs no I/O and
//! reads no clock, so the same input always yields the same report.

pub mod document;
pub mod rules;
pub mod scoring;

use thiserror::Error;
use url::Url;

use crate::models::{AnalysisReport, MetaTagObservation, Recommendation, TagKey, TagStatus};
use document::{AttrMatch, PageDocument, ScraperDocument};
use rules::Verdict;
use scoring::ScoreInputs;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error("Document could not be parsed")]
    Unparseable,
}

/// Analyse raw page HTML fetched from `url`.
pub fn analyze(html: &str, url: &str) -> Result<AnalysisReport, AnalyzeError> {
    let document = ScraperDocument::parse(html);
    analyze_document(&document, url)
}

/// Analyse an already parsed document. `url` must be absolute.
pub fn analyze_document<D>(document: &D, url: &str) -> Result<AnalysisReport, AnalyzeError>
where
    D: PageDocument + ?Sized,
{
    match Url::parse(url) {
        Ok(parsed) if !parsed.cannot_be_a_base() => {}
        _ => return Err(AnalyzeError::InvalidUrl(url.to_string())),
    }
    if !document.has_root() {
        return Err(AnalyzeError::Unparseable);
    }

    let page = Extracted::from_document(document);
    let report = build_report(&page, url);

    tracing::debug!(
        url = %report.url,
        score = report.seo_score,
        issues = report.issues_count,
        "Analysis complete"
    );
    Ok(report)
}

// ── Extraction ─────────────────────────────────────────────────────────────

/// Every field the rules look at, trimmed, with empty values as `None`.
#[derive(Debug, Default)]
struct Extracted {
    title: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
    canonical: Option<String>,
    robots: Option<String>,
    og_title: Option<String>,
    og_description: Option<String>,
    og_image: Option<String>,
    og_url: Option<String>,
    og_type: Option<String>,
    twitter_card: Option<String>,
    twitter_title: Option<String>,
    twitter_description: Option<String>,
    twitter_image: Option<String>,
    viewport: Option<String>,
    charset: Option<String>,
    language: Option<String>,
    favicon: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Extracted {
    fn from_document<D: PageDocument + ?Sized>(doc: &D) -> Self {
        let meta_name =
            |name: &str| clean(doc.find_attr("meta", AttrMatch::Equals("name", name), "content"));
        let meta_property = |property: &str| {
            clean(doc.find_attr("meta", AttrMatch::Equals("property", property), "content"))
        };
        let link_href = |rel: &str| clean(doc.find_attr("link", AttrMatch::Equals("rel", rel), "href"));

        Self {
            title: clean(doc.find_text("title")),
            description: meta_name("description"),
            keywords: meta_name("keywords"),
            canonical: link_href("canonical"),
            robots: meta_name("robots"),
            og_title: meta_property("og:title"),
            og_description: meta_property("og:description"),
            og_image: meta_property("og:image"),
            og_url: meta_property("og:url"),
            og_type: meta_property("og:type"),
            twitter_card: meta_name("twitter:card"),
            twitter_title: meta_name("twitter:title"),
            twitter_description: meta_name("twitter:description"),
            twitter_image: meta_name("twitter:image"),
            viewport: meta_name("viewport"),
            charset: clean(doc.find_attr("meta", AttrMatch::Present("charset"), "charset")),
            language: clean(doc.find_attr("html", AttrMatch::Present("lang"), "lang")),
            favicon: link_href("icon").or_else(|| link_href("shortcut icon")),
        }
    }

    fn open_graph_complete(&self) -> bool {
        self.og_title.is_some() && self.og_description.is_some() && self.og_image.is_some()
    }

    fn twitter_complete(&self) -> bool {
        self.twitter_card.is_some()
            && self.twitter_title.is_some()
            && self.twitter_description.is_some()
            && self.twitter_image.is_some()
    }
}

fn observe(key: TagKey, value: &Option<String>, verdict: Verdict) -> MetaTagObservation {
    MetaTagObservation::new(key, value.clone(), verdict.status).with_message(verdict.message)
}

// ── Report assembly ────────────────────────────────────────────────────────

fn build_report(page: &Extracted, url: &str) -> AnalysisReport {
    let title = rules::title(page.title.as_deref());
    let description = rules::description(page.description.as_deref());
    let robots = rules::robots(page.robots.as_deref());

    let score_inputs = ScoreInputs {
        title: title.status,
        description: description.status,
        has_canonical: page.canonical.is_some(),
        has_viewport: page.viewport.is_some(),
        open_graph_complete: page.open_graph_complete(),
        has_twitter_card: page.twitter_card.is_some(),
    };
    let recommendations = recommendations(page, url, &title, &description, &robots);

    let basic_meta_tags = vec![
        observe(TagKey::name("title"), &page.title, title),
        observe(TagKey::name("description"), &page.description, description),
        observe(TagKey::name("keywords"), &page.keywords, rules::keywords(page.keywords.as_deref())),
        observe(TagKey::rel("canonical"), &page.canonical, rules::canonical(page.canonical.as_deref())),
        observe(TagKey::name("robots"), &page.robots, robots),
    ];
    let social_meta_tags = social_tags(page);
    let technical_meta_tags = technical_tags(page);

    let meta_tags_count =
        basic_meta_tags.len() + social_meta_tags.len() + technical_meta_tags.len();
    let issues_count = basic_meta_tags
        .iter()
        .chain(&social_meta_tags)
        .chain(&technical_meta_tags)
        .filter(|tag| tag.status.is_issue())
        .count();

    AnalysisReport {
        url: url.to_string(),
        page_title: page.title.clone(),
        seo_score: scoring::score(&score_inputs),
        meta_tags_count,
        issues_count,
        meta_description: page.description.clone(),
        meta_keywords: page.keywords.clone(),
        og_title: page.og_title.clone(),
        og_description: page.og_description.clone(),
        og_image: page.og_image.clone(),
        twitter_title: page.twitter_title.clone(),
        twitter_description: page.twitter_description.clone(),
        twitter_image: page.twitter_image.clone(),
        basic_meta_tags,
        social_meta_tags,
        technical_meta_tags,
        recommendations,
    }
}

fn social_tags(page: &Extracted) -> Vec<MetaTagObservation> {
    use rules::presence;
    use TagStatus::{Info, Warning};

    let og = |key: &str, value: &Option<String>, verdict: Verdict| {
        observe(TagKey::property(key), value, verdict)
    };
    let twitter = |key: &str, value: &Option<String>, verdict: Verdict| {
        observe(TagKey::name(key), value, verdict)
    };

    vec![
        og(
            "og:title",
            &page.og_title,
            presence(
                page.og_title.as_deref(),
                "Open Graph title is present.",
                Warning,
                "Missing og:title tag. Social media shares will use the page title instead.",
            ),
        ),
        og(
            "og:description",
            &page.og_description,
            rules::og_description(page.og_description.as_deref(), page.description.as_deref()),
        ),
        og(
            "og:image",
            &page.og_image,
            presence(
                page.og_image.as_deref(),
                "Open Graph image is present.",
                Warning,
                "Missing og:image tag. Social media shares will not include an image preview.",
            ),
        ),
        og(
            "og:url",
            &page.og_url,
            presence(
                page.og_url.as_deref(),
                "Open Graph URL is present.",
                Warning,
                "Missing og:url tag. Shares may point at a non-canonical address.",
            ),
        ),
        og(
            "og:type",
            &page.og_type,
            presence(
                page.og_type.as_deref(),
                "Open Graph content type is present.",
                Info,
                "Open Graph type is missing. Helps social platforms understand your content type.",
            ),
        ),
        twitter(
            "twitter:card",
            &page.twitter_card,
            presence(
                page.twitter_card.as_deref(),
                "Twitter card type is present.",
                Warning,
                "Missing twitter:card tag. Twitter shares will not display properly.",
            ),
        ),
        twitter(
            "twitter:title",
            &page.twitter_title,
            presence(
                page.twitter_title.as_deref(),
                "Twitter title is present.",
                Info,
                "Twitter title is missing (may fall back to Open Graph).",
            ),
        ),
        twitter(
            "twitter:description",
            &page.twitter_description,
            presence(
                page.twitter_description.as_deref(),
                "Twitter description is present.",
                Info,
                "Twitter description is missing (may fall back to Open Graph).",
            ),
        ),
        twitter(
            "twitter:image",
            &page.twitter_image,
            presence(
                page.twitter_image.as_deref(),
                "Twitter image is present.",
                Info,
                "Twitter image is missing (may fall back to Open Graph).",
            ),
        ),
    ]
}

fn technical_tags(page: &Extracted) -> Vec<MetaTagObservation> {
    use rules::presence;
    use TagStatus::{Error, Info, Warning};

    vec![
        observe(
            TagKey::name("viewport"),
            &page.viewport,
            presence(
                page.viewport.as_deref(),
                "Viewport is properly set.",
                Error,
                "Missing viewport meta tag. Your site may not be mobile-friendly.",
            ),
        ),
        observe(
            TagKey::name("charset"),
            &page.charset,
            presence(
                page.charset.as_deref(),
                "Character encoding is declared.",
                Warning,
                "Character encoding is not explicitly set.",
            ),
        ),
        observe(
            TagKey::name("language"),
            &page.language,
            presence(
                page.language.as_deref(),
                "Page language is declared.",
                Warning,
                "Language attribute is missing. Important for accessibility and SEO.",
            ),
        ),
        observe(
            TagKey::rel("icon"),
            &page.favicon,
            Verdict {
                status: Info,
                message: match page.favicon {
                    Some(_) => "Favicon is present.".into(),
                    None => "Favicon not found. Helps with brand recognition.".into(),
                },
            },
        ),
    ]
}

// ── Recommendations ────────────────────────────────────────────────────────

const PLACEHOLDER_IMAGE: &str = "https://example.com/image.jpg";

/// Escape a page-derived value for interpolation into an attribute or text node.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn recommend(title: &str, description: &str, code: Option<String>) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        description: description.to_string(),
        code,
    }
}

fn recommendations(
    page: &Extracted,
    url: &str,
    title: &Verdict,
    description: &Verdict,
    robots: &Verdict,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let escaped_url = escape_html(url);

    match title.status {
        TagStatus::Error => out.push(recommend(
            "Add a title tag",
            "Title tags are essential for SEO and user experience. Add a descriptive title between 30 and 60 characters.",
            Some("<title>Your descriptive page title here</title>".into()),
        )),
        TagStatus::Warning => out.push(recommend(
            "Optimize your title tag",
            &title.message,
            Some("<title>Your optimized title (30-60 characters)</title>".into()),
        )),
        _ => {}
    }

    match description.status {
        TagStatus::Error => out.push(recommend(
            "Add a meta description",
            "Meta descriptions help improve click-through rates from search results. Add a description between 50 and 160 characters.",
            Some(r#"<meta name="description" content="Your compelling description here (50-160 characters)">"#.into()),
        )),
        TagStatus::Warning => out.push(recommend(
            "Improve meta description",
            "Create a more specific and compelling meta description that accurately summarizes your page content and includes relevant keywords.",
            Some(r#"<meta name="description" content="A specific, informative description with relevant keywords that compels users to click.">"#.into()),
        )),
        _ => {}
    }

    if page.canonical.is_none() {
        out.push(recommend(
            "Add a canonical URL",
            "Add a canonical link tag to prevent duplicate content issues and consolidate link signals for similar or identical content.",
            Some(format!(r#"<link rel="canonical" href="{escaped_url}">"#)),
        ));
    }

    if robots.status == TagStatus::Warning {
        out.push(recommend(
            "Review robots directive",
            "The robots meta tag asks search engines not to index this page. Remove \"noindex\" if the page should appear in search results.",
            Some(r#"<meta name="robots" content="index, follow">"#.into()),
        ));
    }

    if !page.open_graph_complete() {
        let og_title = escape_html(page.title.as_deref().unwrap_or("Your Title Here"));
        let og_description =
            escape_html(page.description.as_deref().unwrap_or("Your description here"));
        out.push(recommend(
            "Complete Open Graph meta tags",
            "Add all essential Open Graph meta tags to improve how your content appears when shared on social media platforms.",
            Some(format!(
                "<meta property=\"og:title\" content=\"{og_title}\">\n\
                 <meta property=\"og:description\" content=\"{og_description}\">\n\
                 <meta property=\"og:image\" content=\"{PLACEHOLDER_IMAGE}\">\n\
                 <meta property=\"og:url\" content=\"{escaped_url}\">\n\
                 <meta property=\"og:type\" content=\"website\">"
            )),
        ));
    }

    if !page.twitter_complete() {
        let tw_title = escape_html(
            page.og_title
                .as_deref()
                .or(page.title.as_deref())
                .unwrap_or("Your Title Here"),
        );
        let tw_description = escape_html(
            page.og_description
                .as_deref()
                .or(page.description.as_deref())
                .unwrap_or("Your description here"),
        );
        let tw_image = escape_html(page.og_image.as_deref().unwrap_or(PLACEHOLDER_IMAGE));
        out.push(recommend(
            "Add Twitter Card meta tags",
            "Twitter Card meta tags control how your content appears when shared on Twitter, even when Open Graph tags are present.",
            Some(format!(
                "<meta name=\"twitter:card\" content=\"summary_large_image\">\n\
                 <meta name=\"twitter:title\" content=\"{tw_title}\">\n\
                 <meta name=\"twitter:description\" content=\"{tw_description}\">\n\
                 <meta name=\"twitter:image\" content=\"{tw_image}\">"
            )),
        ));
    }

    if page.viewport.is_none() {
        out.push(recommend(
            "Add a viewport meta tag",
            "The viewport meta tag makes your page render correctly on mobile devices, which search engines weigh heavily.",
            Some(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#.into()),
        ));
    }

    if page.charset.is_none() {
        out.push(recommend(
            "Declare character encoding",
            "Explicitly declaring character encoding ensures text is displayed correctly.",
            Some(r#"<meta charset="UTF-8">"#.into()),
        ));
    }

    if page.language.is_none() {
        out.push(recommend(
            "Add a language attribute",
            "Declaring the page language helps search engines and screen readers.",
            Some(r#"<html lang="en">"#.into()),
        ));
    }

    if page.favicon.is_none() {
        out.push(recommend(
            "Add a favicon",
            "A favicon helps users recognise your site in tabs, bookmarks and some search results.",
            Some(r#"<link rel="icon" href="/favicon.ico">"#.into()),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::document::FixtureDocument;
    use super::*;

    const URL: &str = "https://example.com/page";

    fn page_without_favicon(robots: &str) -> FixtureDocument {
        FixtureDocument::default()
            .text("title", &"t".repeat(45))
            .meta_name("description", &"d".repeat(100))
            .element("link", &[("rel", "canonical"), ("href", URL)])
            .meta_name("robots", robots)
            .meta_property("og:title", "OG title")
            .meta_property("og:description", "OG description")
            .meta_property("og:image", "https://example.com/og.png")
            .meta_property("og:url", URL)
            .meta_property("og:type", "website")
            .meta_name("twitter:card", "summary_large_image")
            .meta_name("twitter:title", "Tw title")
            .meta_name("twitter:description", "Tw description")
            .meta_name("twitter:image", "https://example.com/tw.png")
            .meta_name("viewport", "width=device-width")
            .element("meta", &[("charset", "utf-8")])
            .element("html", &[("lang", "en")])
    }

    fn complete_page() -> FixtureDocument {
        page_without_favicon("index, follow")
            .element("link", &[("rel", "icon"), ("href", "/favicon.ico")])
    }

    #[test]
    fn complete_page_scores_100_with_no_issues() {
        let report = analyze_document(&complete_page(), URL).unwrap();
        assert_eq!(report.seo_score, 100);
        assert_eq!(report.issues_count, 0);
        assert!(report.recommendations.is_empty(), "{:?}", report.recommendations);
        assert_eq!(report.meta_tags_count, 18);
    }

    #[test]
    fn rejects_relative_url() {
        let err = analyze_document(&complete_page(), "/relative").unwrap_err();
        assert_eq!(err, AnalyzeError::InvalidUrl("/relative".into()));
    }

    #[test]
    fn rootless_document_is_unparseable() {
        let doc = FixtureDocument {
            rootless: true,
            ..Default::default()
        };
        assert_eq!(analyze_document(&doc, URL).unwrap_err(), AnalyzeError::Unparseable);
    }

    #[test]
    fn groups_have_fixed_membership() {
        let report = analyze_document(&FixtureDocument::default(), URL).unwrap();
        let keys = |tags: &[MetaTagObservation]| {
            tags.iter().map(|t| t.key.as_str().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(
            keys(&report.basic_meta_tags[..]),
            ["title", "description", "keywords", "canonical", "robots"]
        );
        assert_eq!(report.social_meta_tags.len(), 9);
        assert_eq!(
            keys(&report.technical_meta_tags[..]),
            ["viewport", "charset", "language", "icon"]
        );
    }

    #[test]
    fn favicon_falls_back_to_shortcut_icon() {
        let doc = page_without_favicon("index, follow")
            .element("link", &[("rel", "shortcut icon"), ("href", "/fav.png")]);
        let report = analyze_document(&doc, URL).unwrap();
        assert_eq!(report.tag("icon").unwrap().content.as_deref(), Some("/fav.png"));
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let doc = FixtureDocument::default()
            .text("title", "   ")
            .meta_name("description", "  \n ");
        let report = analyze_document(&doc, URL).unwrap();
        assert!(report.tag("title").unwrap().missing());
        assert!(report.page_title.is_none());
        assert_eq!(report.tag("description").unwrap().status, TagStatus::Error);
    }

    #[test]
    fn noindex_adds_robots_recommendation() {
        let doc = page_without_favicon("noindex, nofollow")
            .element("link", &[("rel", "icon"), ("href", "/favicon.ico")]);
        let report = analyze_document(&doc, URL).unwrap();
        assert_eq!(report.tag("robots").unwrap().status, TagStatus::Warning);
        assert_eq!(report.issues_count, 1);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].title, "Review robots directive");
        // robots carries no score penalty
        assert_eq!(report.seo_score, 100);
    }

    #[test]
    fn snippets_escape_page_values() {
        let doc = FixtureDocument::default().text("title", r#"Fish & "Chips" <best>"#);
        let report = analyze_document(&doc, URL).unwrap();
        let og = report
            .recommendations
            .iter()
            .find(|r| r.title == "Complete Open Graph meta tags")
            .unwrap();
        let code = og.code.as_deref().unwrap();
        assert!(code.contains("Fish &amp; &quot;Chips&quot; &lt;best&gt;"), "{code}");
        assert!(code.contains(r#"<meta property="og:url" content="https://example.com/page">"#));
    }

    #[test]
    fn twitter_snippet_prefers_open_graph_values() {
        let doc = FixtureDocument::default()
            .text("title", "Page title")
            .meta_property("og:title", "OG title")
            .meta_property("og:image", "https://example.com/og.png");
        let report = analyze_document(&doc, URL).unwrap();
        let tw = report
            .recommendations
            .iter()
            .find(|r| r.title == "Add Twitter Card meta tags")
            .unwrap();
        let code = tw.code.as_deref().unwrap();
        assert!(code.contains(r#"content="OG title""#));
        assert!(code.contains(r#"content="https://example.com/og.png""#));
        assert!(code.contains(r#"content="Your description here""#));
    }

    #[test]
    fn convenience_fields_mirror_observations() {
        let report = analyze_document(&complete_page(), URL).unwrap();
        assert_eq!(report.og_title, report.tag("og:title").unwrap().content);
        assert_eq!(report.twitter_image, report.tag("twitter:image").unwrap().content);
        assert_eq!(report.meta_description, report.tag("description").unwrap().content);
        assert_eq!(report.meta_keywords, None);
    }

    #[test]
    fn parses_real_markup() {
        let html = r#"<!doctype html><html lang="en"><head>
            <meta charset="utf-8">
            <title>A title that is comfortably long enough</title>
            <meta name="viewport" content="width=device-width, initial-scale=1">
        </head><body></body></html>"#;
        let report = analyze(html, URL).unwrap();
        assert_eq!(report.tag("title").unwrap().status, TagStatus::Good);
        assert_eq!(report.tag("viewport").unwrap().status, TagStatus::Good);
        assert_eq!(report.tag("charset").unwrap().content.as_deref(), Some("utf-8"));
        assert_eq!(report.tag("language").unwrap().content.as_deref(), Some("en"));
    }
}
