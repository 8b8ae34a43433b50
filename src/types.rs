use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_FONT: &str = "Galmuri9";

/// Language code keyed map, in document order.
pub type LangMap<T> = IndexMap<String, T>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Document {
    pub settings: SiteSettings,
    pub portfolio: Vec<PortfolioItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub twitter_handle: String,
    #[serde(default)]
    pub meta: LangMap<MetaEntry>,
    #[serde(default)]
    pub translations: LangMap<IndexMap<String, String>>,
    #[serde(default)]
    pub og_image: String,
    #[serde(default)]
    pub custom_fonts: Vec<CustomFont>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
    pub accent: String,
}

impl Default for Colors {
    fn default() -> Self {
        Colors {
            primary: "#00FF00".to_string(),
            secondary: "#00FFFF".to_string(),
            background: "#0A0A0F".to_string(),
            text: "#FFFFFF".to_string(),
            accent: "#B100FF".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CustomFont {
    pub name: String,
    pub url: String,
    pub family: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct MetaEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    Auto,
    Button,
    Iframe,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct LocalizedContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SocialCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub content: LangMap<LocalizedContent>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub link_type: LinkType,
    #[serde(default)]
    pub youtube_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub social_card: SocialCard,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// The active language set, in `settings.meta` order.
    pub fn languages(&self) -> Vec<String> {
        self.settings.meta.keys().cloned().collect()
    }

    /// First featured item in list order.
    pub fn featured_item(&self) -> Option<&PortfolioItem> {
        self.portfolio.iter().find(|item| item.featured)
    }
}

impl PortfolioItem {
    pub fn new(id: String, languages: &[String], created_at: String) -> Self {
        let content = languages
            .iter()
            .map(|lang| (lang.clone(), LocalizedContent::default()))
            .collect();
        PortfolioItem {
            id,
            featured: false,
            content,
            link: String::new(),
            link_type: LinkType::Auto,
            youtube_url: String::new(),
            image_url: String::new(),
            social_card: SocialCard::default(),
            created_at,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_document_with_defaults() {
        let doc: Document = serde_json::from_str(
            r#"{"settings":{"meta":{"ko":{"title":"t"},"en":{}}},"portfolio":[{"id":"1"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.languages(), vec!["ko", "en"]);
        assert_eq!(doc.portfolio[0].link_type, LinkType::Auto);
        assert!(!doc.portfolio[0].featured);
        assert_eq!(doc.settings.colors.primary, "#00FF00");
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let text = r#"{"settings":{"font":"x","analytics":"on"},"portfolio":[{"id":"1","views":3}],"version":2}"#;
        let doc: Document = serde_json::from_str(text).unwrap();
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["version"], 2);
        assert_eq!(back["settings"]["analytics"], "on");
        assert_eq!(back["portfolio"][0]["views"], 3);
        assert_eq!(back["portfolio"][0]["linkType"], "auto");
    }

    #[test]
    fn first_featured_wins() {
        let langs = vec!["ko".to_string()];
        let mut a = PortfolioItem::new("a".into(), &langs, String::new());
        let mut b = PortfolioItem::new("b".into(), &langs, String::new());
        a.featured = true;
        b.featured = true;
        let doc = Document {
            settings: serde_json::from_str("{}").unwrap(),
            portfolio: vec![a, b],
            extra: Map::new(),
        };
        assert_eq!(doc.featured_item().map(|i| i.id.as_str()), Some("a"));
    }
}
