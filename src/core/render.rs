use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::types::{Document, LinkType, LocalizedContent, PortfolioItem};

static STEAM_APP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"store\.steampowered\.com/app/(\d+)").expect("valid regex"));

/// Built-in UI strings, overridden per language by `settings.translations`.
pub fn builtin_text(lang: &str, key: &str) -> Option<&'static str> {
    let text = match (lang, key) {
        ("ko", "nav.home") => "홈",
        ("ko", "nav.news") => "소식",
        ("ko", "readMore") => "자세히 보기",
        ("ko", "loading") => "로딩 중",
        ("ko", "error") => "데이터를 불러올 수 없습니다.",
        ("ko", "empty") => "아직 소식이 없습니다.",
        ("ko", "email") => "이메일",
        ("en", "nav.home") => "Home",
        ("en", "nav.news") => "News",
        ("en", "readMore") => "Read More",
        ("en", "loading") => "Loading",
        ("en", "error") => "Failed to load data.",
        ("en", "empty") => "No news yet.",
        ("en", "email") => "Email",
        ("ja", "nav.home") => "ホーム",
        ("ja", "nav.news") => "ニュース",
        ("ja", "readMore") => "詳しく見る",
        ("ja", "loading") => "読み込み中",
        ("ja", "error") => "データを読み込めませんでした。",
        ("ja", "empty") => "まだニュースがありません。",
        ("ja", "email") => "メール",
        (_, "home.title") => "PIXEL ACHE STUDIO",
        _ => return None,
    };
    Some(text)
}

/// Escapes `& < > " '` for interpolation into markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Saved preference first, then a supported browser language, then `fallback`.
pub fn resolve_language(saved: Option<&str>, browser: Option<&str>, fallback: &str) -> String {
    if let Some(saved) = saved.map(str::trim).filter(|lang| !lang.is_empty()) {
        return saved.to_lowercase();
    }
    match browser.map(str::to_lowercase) {
        Some(lang) if lang.starts_with("ja") => "ja".to_string(),
        Some(lang) if lang.starts_with("en") => "en".to_string(),
        _ => fallback.to_string(),
    }
}

pub fn ui_text(document: &Document, lang: &str, key: &str) -> String {
    document
        .settings
        .translations
        .get(lang)
        .and_then(|values| values.get(key))
        .filter(|value| !value.is_empty())
        .cloned()
        .or_else(|| builtin_text(lang, key).map(str::to_string))
        .unwrap_or_else(|| key.to_string())
}

pub fn steam_app_id(url: &str) -> Option<String> {
    STEAM_APP
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

pub fn youtube_embed_url(url: &str) -> String {
    if url.contains("youtube.com/embed/") {
        return url.to_string();
    }
    let video_id = if let Some((_, rest)) = url.split_once("youtube.com/watch?v=") {
        rest.split('&').next()
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest.split('?').next()
    } else {
        None
    };
    match video_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("https://www.youtube.com/embed/{}", id),
        None => String::new(),
    }
}

pub fn social_icon_class(platform: &str) -> &'static str {
    match platform {
        "twitter" => "fab fa-x-twitter",
        "bluesky" => "fas fa-cloud",
        "instagram" => "fab fa-instagram",
        "youtube" => "fab fa-youtube",
        _ => "fas fa-link",
    }
}

pub fn to_absolute_url(url: &str, base_url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.strip_prefix("./").unwrap_or(url)
    )
}

/// The locally stored style override blob. Every field is optional.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SiteOverrides {
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub colors: Option<OverrideColors>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OverrideColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
}

impl SiteOverrides {
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(font) = self.font.as_deref().filter(|font| !font.is_empty()) {
            vars.push(("--font-family", format!("'{}', monospace", font)));
        }
        if let Some(colors) = &self.colors {
            let entries = [
                ("--primary", &colors.primary),
                ("--secondary", &colors.secondary),
                ("--background", &colors.background),
            ];
            for (name, value) in entries {
                if let Some(value) = value {
                    vars.push((name, value.clone()));
                }
            }
        }
        vars
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub site_name: String,
    pub twitter_site: String,
    pub base_url: String,
    pub page_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetaTag {
    pub attribute: &'static str,
    pub key: &'static str,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPage {
    pub lang: String,
    pub title: String,
    pub description: String,
    pub meta_tags: Vec<MetaTag>,
    pub css_variables: Vec<(&'static str, String)>,
    pub social_html: String,
    pub email_html: String,
    pub featured_html: Option<String>,
    pub grid_html: String,
}

pub struct Renderer<'a> {
    document: &'a Document,
    lang: String,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(document: &'a Document, lang: &str, options: &'a RenderOptions) -> Self {
        Renderer {
            document,
            lang: lang.to_string(),
            options,
        }
    }

    fn text(&self, key: &str) -> String {
        ui_text(self.document, &self.lang, key)
    }

    fn content(&self, item: &'a PortfolioItem) -> Option<&'a LocalizedContent> {
        item.content.get(&self.lang)
    }

    pub fn render(&self, overrides: &SiteOverrides) -> RenderedPage {
        let featured = self.document.featured_item();
        let mut title = self.options.site_name.clone();
        let mut description = String::new();
        let mut meta_tags = Vec::new();

        // Social card tags only accompany a featured item that is actually shown.
        if let Some(item) = featured.filter(|item| self.content(item).is_some()) {
            let card = &item.social_card;
            if !(card.title.is_empty() && card.description.is_empty() && card.image.is_empty()) {
                meta_tags = self.social_card_tags(item);
                title = format!("{} - {}", card.title, self.options.site_name);
                description = card.description.clone();
            }
        }
        if let Some(meta) = self.document.settings.meta.get(&self.lang) {
            title = meta.title.clone();
            description = meta.description.clone();
        }

        let regular: Vec<String> = self
            .document
            .portfolio
            .iter()
            .filter(|item| !item.featured)
            .filter_map(|item| self.card_html(item))
            .collect();
        let grid_html = if regular.is_empty() {
            format!("<div class=\"empty\">{}</div>", escape_html(&self.text("empty")))
        } else {
            regular.concat()
        };

        RenderedPage {
            lang: self.lang.clone(),
            title,
            description,
            meta_tags,
            css_variables: overrides.css_variables(),
            social_html: self.social_html(),
            email_html: self.email_html(),
            featured_html: featured.and_then(|item| self.featured_html(item)),
            grid_html,
        }
    }

    fn social_html(&self) -> String {
        self.document
            .settings
            .social_links
            .iter()
            .map(|link| {
                format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"social-link\" title=\"{}\"><i class=\"{}\"></i></a>",
                    escape_html(&link.url),
                    escape_html(&link.platform),
                    social_icon_class(&link.platform)
                )
            })
            .collect()
    }

    fn email_html(&self) -> String {
        let email = escape_html(&self.document.settings.email);
        format!(
            "{}: <a href=\"mailto:{}\">{}</a>",
            escape_html(&self.text("email")),
            email,
            email
        )
    }

    fn tags_html(content: &LocalizedContent, class: &str) -> String {
        content
            .tags
            .iter()
            .map(|tag| format!("<span class=\"{}\">{}</span>", class, escape_html(tag)))
            .collect()
    }

    fn image_html(item: &PortfolioItem, content: &LocalizedContent, class: &str) -> String {
        if item.image_url.is_empty() {
            return String::new();
        }
        format!(
            "<img src=\"{}\" alt=\"{}\" class=\"{}\">",
            escape_html(&item.image_url),
            escape_html(&content.title),
            class
        )
    }

    fn read_more(&self, link: &str, class: &str, icon: bool) -> String {
        let icon = if icon {
            "<i class=\"fas fa-external-link-alt\"></i> "
        } else {
            ""
        };
        format!(
            "<a href=\"{}\" target=\"_blank\" class=\"{}\">{}{}</a>",
            escape_html(link),
            class,
            icon,
            escape_html(&self.text("readMore"))
        )
    }

    fn link_html(&self, item: &PortfolioItem, featured: bool) -> String {
        if item.link.is_empty() {
            return String::new();
        }
        let link_class = if featured { "featured-link" } else { "portfolio-link" };
        match item.link_type {
            LinkType::Button => self.read_more(&item.link, link_class, !featured),
            LinkType::Iframe => {
                let (class, height) = if featured {
                    ("link-embed", 400)
                } else {
                    ("link-embed-small", 300)
                };
                format!(
                    "<div class=\"{}\"><iframe src=\"{}\" frameborder=\"0\" width=\"100%\" height=\"{}\" sandbox=\"allow-scripts allow-same-origin\"></iframe></div>",
                    class,
                    escape_html(&item.link),
                    height
                )
            }
            LinkType::Auto => match steam_app_id(&item.link) {
                Some(app_id) => {
                    let class = if featured { "steam-widget" } else { "steam-widget-small" };
                    format!(
                        "<div class=\"{}\"><iframe src=\"https://store.steampowered.com/widget/{}/\" frameborder=\"0\" width=\"100%\" height=\"190\"></iframe></div>",
                        class, app_id
                    )
                }
                None => self.read_more(&item.link, link_class, !featured),
            },
        }
    }

    pub fn featured_html(&self, item: &'a PortfolioItem) -> Option<String> {
        let content = self.content(item)?;
        let youtube = if item.youtube_url.is_empty() {
            String::new()
        } else {
            format!(
                "<div class=\"featured-youtube\"><div class=\"youtube-embed\"><iframe src=\"{}\" allowfullscreen></iframe></div></div>",
                escape_html(&youtube_embed_url(&item.youtube_url))
            )
        };
        Some(format!(
            "<div class=\"featured-card\">{}<h1 class=\"featured-title\">{}</h1><p class=\"featured-description\">{}</p><div class=\"featured-tags\">{}</div>{}{}</div>",
            Self::image_html(item, content, "featured-image"),
            escape_html(&content.title),
            escape_html(&content.description),
            Self::tags_html(content, "tag"),
            youtube,
            self.link_html(item, true)
        ))
    }

    pub fn card_html(&self, item: &'a PortfolioItem) -> Option<String> {
        let content = self.content(item)?;
        let youtube = if item.youtube_url.is_empty() {
            String::new()
        } else {
            format!(
                "<a href=\"{}\" target=\"_blank\" class=\"portfolio-link\"><i class=\"fab fa-youtube\"></i> YouTube</a>",
                escape_html(&item.youtube_url)
            )
        };
        Some(format!(
            "<div class=\"portfolio-card\"><div class=\"portfolio-card-top\">{}<div class=\"portfolio-content\"><h2 class=\"portfolio-title\">{}</h2><p class=\"portfolio-description\">{}</p><div class=\"portfolio-tags\">{}</div><div class=\"portfolio-links\">{}</div></div></div>{}</div>",
            Self::image_html(item, content, "portfolio-image"),
            escape_html(&content.title),
            escape_html(&content.description),
            Self::tags_html(content, "portfolio-tag"),
            youtube,
            self.link_html(item, false)
        ))
    }

    fn social_card_tags(&self, item: &PortfolioItem) -> Vec<MetaTag> {
        let card = &item.social_card;
        let image = to_absolute_url(&card.image, &self.options.base_url);
        let property = |key, content: &str| MetaTag {
            attribute: "property",
            key,
            content: content.to_string(),
        };
        let name = |key, content: &str| MetaTag {
            attribute: "name",
            key,
            content: content.to_string(),
        };
        vec![
            property("og:type", "article"),
            property("og:site_name", &self.options.site_name),
            property("og:title", &card.title),
            property("og:description", &card.description),
            property("og:image", &image),
            property("og:image:width", "1200"),
            property("og:image:height", "630"),
            property("og:url", &self.options.page_url),
            name("twitter:card", "summary_large_image"),
            name("twitter:site", &self.options.twitter_site),
            name("twitter:title", &card.title),
            name("twitter:description", &card.description),
            name("twitter:image", &image),
        ]
    }
}

impl RenderedPage {
    pub fn to_html(&self) -> String {
        let meta_tags: String = self
            .meta_tags
            .iter()
            .map(|tag| {
                format!(
                    "<meta {}=\"{}\" content=\"{}\">",
                    tag.attribute,
                    tag.key,
                    escape_html(&tag.content)
                )
            })
            .collect();
        let style: String = self
            .css_variables
            .iter()
            .map(|(name, value)| format!("{}: {};", name, escape_html(value)))
            .collect();
        format!(
            "<!DOCTYPE html><html lang=\"{}\"><head><meta charset=\"utf-8\"><title>{}</title><meta name=\"description\" content=\"{}\">{}</head><body style=\"{}\"><section id=\"home\"><div id=\"featuredPortfolio\">{}</div></section><section id=\"news\"><div id=\"portfolioGrid\">{}</div></section><footer><div id=\"socialLinks\">{}</div><div id=\"footerEmail\">{}</div></footer></body></html>",
            escape_html(&self.lang),
            escape_html(&self.title),
            escape_html(&self.description),
            meta_tags,
            style,
            self.featured_html.as_deref().unwrap_or_default(),
            self.grid_html,
            self.social_html,
            self.email_html
        )
    }
}
