//! Article field extraction
//!
//! Each field is located by a fixed CSS probe. Title, body container and
//! publication time are required: if any of them is missing the page yields
//! no record at all. Publisher, reporter, category and thumbnail are soft
//! fields and fall back to placeholders.

use crate::article::{Article, DEFAULT_CATEGORY, UNKNOWN_PUBLISHER, UNKNOWN_REPORTER};
use crate::crawler::compile_selector;
use crate::NewsError;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

const TITLE: &str = "meta[property='og:title']";
const CONTENT: &str = "#dic_area, #newsct_article";
const PUBLISHED_AT: &str = "._ARTICLE_DATE_TIME, .media_end_head_info_datestamp_time";
const PUBLISHER_LOGO: &str = ".media_end_head_top_logo_img";
const PUBLISHER_META: &str = "meta[name='author'], meta[property='og:article:author']";
const REPORTER: &str = ".byline_s, .media_end_head_byline";
const THUMBNAIL: &str = "meta[property='og:image']";
const CATEGORY: &str = ".media_end_categorize_item";

/// A required probe that found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Content,
    PublishedAt,
}

impl MissingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::PublishedAt => "published_at",
        }
    }
}

/// Turns article pages into [`Article`] records
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    title: Selector,
    content: Selector,
    published_at: Selector,
    publisher_logo: Selector,
    publisher_meta: Selector,
    reporter: Selector,
    thumbnail: Selector,
    category: Selector,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self, NewsError> {
        Ok(Self {
            title: compile_selector(TITLE)?,
            content: compile_selector(CONTENT)?,
            published_at: compile_selector(PUBLISHED_AT)?,
            publisher_logo: compile_selector(PUBLISHER_LOGO)?,
            publisher_meta: compile_selector(PUBLISHER_META)?,
            reporter: compile_selector(REPORTER)?,
            thumbnail: compile_selector(THUMBNAIL)?,
            category: compile_selector(CATEGORY)?,
        })
    }

    /// Parses an article page into a record
    ///
    /// Returns `None` when a required field is absent; the reason is logged at
    /// debug level. `crawled_at` is stamped with the current time.
    pub fn parse_article(&self, html: &str, source_url: &str) -> Option<Article> {
        match self.try_parse_article(html, source_url) {
            Ok(article) => Some(article),
            Err(missing) => {
                tracing::debug!("Rejected {}: missing {}", source_url, missing.as_str());
                None
            }
        }
    }

    /// Parses an article page, reporting which required field was missing
    pub fn try_parse_article(&self, html: &str, source_url: &str) -> Result<Article, MissingField> {
        let document = Html::parse_document(html);

        let title = first(&document, &self.title)
            .and_then(|meta| attr_text(meta, "content"))
            .ok_or(MissingField::Title)?;

        let content = first(&document, &self.content)
            .map(block_text)
            .ok_or(MissingField::Content)?;

        let published_at = first(&document, &self.published_at)
            .and_then(|stamp| attr_text(stamp, "data-date-time").or_else(|| inline_text(stamp)))
            .ok_or(MissingField::PublishedAt)?;

        let publisher = self
            .probe_publisher(&document)
            .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string());

        let reporter = first(&document, &self.reporter)
            .and_then(inline_text)
            .unwrap_or_else(|| UNKNOWN_REPORTER.to_string());

        let thumbnail_url =
            first(&document, &self.thumbnail).and_then(|meta| attr_text(meta, "content"));

        let category = first(&document, &self.category)
            .and_then(inline_text)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(Article {
            title,
            content,
            publisher,
            reporter,
            published_at,
            url: source_url.to_string(),
            category,
            thumbnail_url,
            crawled_at: Utc::now(),
        })
    }

    /// Logo title, then logo alt text, then author meta tags
    fn probe_publisher(&self, document: &Html) -> Option<String> {
        first(document, &self.publisher_logo)
            .and_then(|logo| attr_text(logo, "title").or_else(|| attr_text(logo, "alt")))
            .or_else(|| {
                document
                    .select(&self.publisher_meta)
                    .find_map(|meta| attr_text(meta, "content"))
            })
    }
}

fn first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// Trimmed attribute value, `None` if missing or blank
fn attr_text(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Text nodes of an element, each trimmed, blanks dropped, joined by spaces
///
/// `None` if nothing is left.
fn inline_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Text nodes of an element, each trimmed, blanks dropped, joined by newlines
fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://n.news.naver.com/article/001/0014000001";

    struct Page {
        title: bool,
        content: bool,
        published: bool,
    }

    impl Page {
        fn render(&self) -> String {
            let mut head = String::new();
            let mut body = String::new();
            if self.title {
                head.push_str(r#"<meta property="og:title" content=" Budget passes " />"#);
            }
            head.push_str(r#"<meta property="og:image" content="https://imgnews.example/1.jpg" />"#);
            body.push_str(
                r#"<img class="media_end_head_top_logo_img" title="Yonhap" alt="Yonhap logo" />"#,
            );
            if self.published {
                body.push_str(
                    r#"<span class="media_end_head_info_datestamp_time _ARTICLE_DATE_TIME" data-date-time="2025-03-01 09:30:00">2025.03.01. AM 9:30</span>"#,
                );
            }
            body.push_str(r#"<em class="media_end_categorize_item">Politics</em>"#);
            body.push_str(r#"<span class="byline_s">Kim Reporter (kim@example.com)</span>"#);
            if self.content {
                body.push_str(
                    r#"<article id="dic_area">
                        First paragraph.
                        <br/>
                        <span>  Second paragraph.  </span>
                        <br/>
                    </article>"#,
                );
            }
            format!("<html><head>{}</head><body>{}</body></html>", head, body)
        }
    }

    fn extractor() -> ArticleExtractor {
        ArticleExtractor::new().unwrap()
    }

    #[test]
    fn test_complete_article() {
        let html = Page {
            title: true,
            content: true,
            published: true,
        }
        .render();

        let before = Utc::now();
        let article = extractor().parse_article(&html, URL).unwrap();

        assert_eq!(article.title, "Budget passes");
        assert_eq!(article.content, "First paragraph.\nSecond paragraph.");
        assert_eq!(article.published_at, "2025-03-01 09:30:00");
        assert_eq!(article.publisher, "Yonhap");
        assert_eq!(article.reporter, "Kim Reporter (kim@example.com)");
        assert_eq!(article.category, "Politics");
        assert_eq!(
            article.thumbnail_url.as_deref(),
            Some("https://imgnews.example/1.jpg")
        );
        assert_eq!(article.url, URL);
        assert!(article.crawled_at >= before);
    }

    #[test]
    fn test_every_missing_required_combination_rejected() {
        let extractor = extractor();
        for mask in 0..8u8 {
            let page = Page {
                title: mask & 1 != 0,
                content: mask & 2 != 0,
                published: mask & 4 != 0,
            };
            let complete = page.title && page.content && page.published;
            let parsed = extractor.parse_article(&page.render(), URL);
            assert_eq!(parsed.is_some(), complete, "mask {:03b}", mask);
        }
    }

    #[test]
    fn test_reports_missing_published_at() {
        let html = Page {
            title: true,
            content: true,
            published: false,
        }
        .render();
        assert_eq!(
            extractor().try_parse_article(&html, URL),
            Err(MissingField::PublishedAt)
        );
    }

    #[test]
    fn test_empty_title_counts_as_missing() {
        let html = r#"<html><head><meta property="og:title" content="   " /></head>
            <body><div id="newsct_article">Body</div>
            <span class="_ARTICLE_DATE_TIME">2025.03.01.</span></body></html>"#;
        assert_eq!(
            extractor().try_parse_article(html, URL),
            Err(MissingField::Title)
        );
    }

    #[test]
    fn test_empty_content_container_accepted() {
        let html = r#"<html><head><meta property="og:title" content="Headline" /></head>
            <body><div id="newsct_article">   </div>
            <span class="_ARTICLE_DATE_TIME">2025.03.01.</span></body></html>"#;
        let article = extractor().parse_article(html, URL).unwrap();
        assert_eq!(article.content, "");
    }

    #[test]
    fn test_published_at_falls_back_to_visible_text() {
        let html = r#"<html><head><meta property="og:title" content="Headline" /></head>
            <body><div id="dic_area">Body</div>
            <span class="media_end_head_info_datestamp_time"> 2025.03.01. PM 1:05 </span></body></html>"#;
        let article = extractor().parse_article(html, URL).unwrap();
        assert_eq!(article.published_at, "2025.03.01. PM 1:05");
    }

    #[test]
    fn test_multiline_inline_fields_are_collapsed() {
        let html = r#"<html><head><meta property="og:title" content="Headline" /></head>
            <body><div id="dic_area">Body</div>
            <span class="media_end_head_info_datestamp_time">
                2025.03.01.
                <em>PM 1:05</em>
            </span>
            <em class="media_end_categorize_item">
                Economy
            </em>
            <span class="byline_s">
                Kim Reporter
                <em>kim@example.com</em>
            </span></body></html>"#;
        let article = extractor().parse_article(html, URL).unwrap();

        assert_eq!(article.reporter, "Kim Reporter kim@example.com");
        assert_eq!(article.category, "Economy");
        assert_eq!(article.published_at, "2025.03.01. PM 1:05");
    }

    #[test]
    fn test_soft_fields_use_placeholders() {
        let html = r#"<html><head><meta property="og:title" content="Headline" /></head>
            <body><div id="dic_area">Body</div>
            <span class="_ARTICLE_DATE_TIME" data-date-time="2025-03-01 13:05:00"></span></body></html>"#;
        let article = extractor().parse_article(html, URL).unwrap();

        assert_eq!(article.publisher, UNKNOWN_PUBLISHER);
        assert_eq!(article.reporter, UNKNOWN_REPORTER);
        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert_eq!(article.thumbnail_url, None);
    }

    #[test]
    fn test_publisher_fallback_order() {
        let extractor = extractor();
        let base = r#"<meta property="og:title" content="Headline" />
            <div id="dic_area">Body</div>
            <span class="_ARTICLE_DATE_TIME">2025.03.01.</span>"#;

        let alt_only = format!(
            r#"{}<img class="media_end_head_top_logo_img" alt="Alt Press" />"#,
            base
        );
        assert_eq!(
            extractor.parse_article(&alt_only, URL).unwrap().publisher,
            "Alt Press"
        );

        let meta_only = format!(r#"{}<meta name="author" content="Meta Daily" />"#, base);
        assert_eq!(
            extractor.parse_article(&meta_only, URL).unwrap().publisher,
            "Meta Daily"
        );
    }
}
