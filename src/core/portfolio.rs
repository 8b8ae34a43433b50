use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    core::tabs::{LanguageTabs, TabContext},
    error::{FolioError, Result},
    types::{LinkType, LocalizedContent, PortfolioItem, SocialCard},
};

/// Hands out millisecond-timestamp ids that never repeat within a session
/// and never collide with ids already in the list.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn next_id(&mut self, existing: &[PortfolioItem]) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while existing.iter().any(|item| item.id == candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl TryFrom<i64> for Direction {
    type Error = FolioError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            other => Err(FolioError::InvalidDirection(other)),
        }
    }
}

/// Swaps the item with its neighbour. Returns false at either end.
pub fn move_item(items: &mut [PortfolioItem], index: usize, direction: Direction) -> bool {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1),
    };
    match target {
        Some(target) if index < items.len() && target < items.len() => {
            items.swap(index, target);
            true
        }
        _ => false,
    }
}

/// Removes the item at `source` and reinserts it at `target`.
pub fn reorder(items: &mut Vec<PortfolioItem>, source: usize, target: usize) -> bool {
    if source == target || source >= items.len() || target >= items.len() {
        return false;
    }
    let item = items.remove(source);
    items.insert(target, item);
    true
}

/// Drag-and-drop tracking. Cleared on every drop and drag end.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DragState {
    source: Option<usize>,
}

impl DragState {
    pub fn start(&mut self, index: usize) {
        self.source = Some(index);
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    /// Consumes the tracked source; `None` when no drag is in flight.
    pub fn drop_on(&mut self, target: usize) -> Option<(usize, usize)> {
        self.source.take().map(|source| (source, target))
    }

    pub fn end(&mut self) {
        self.source = None;
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct ContentFields {
    pub title: String,
    pub description: String,
    pub tags: String,
}

/// An edit targets the item's id, so list changes while the editor is
/// open cannot redirect the commit to a different item.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "mode", content = "id", rename_all = "camelCase")]
pub enum EditMode {
    Create,
    Edit(String),
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemEditor {
    pub mode: EditMode,
    pub featured: bool,
    pub image_url: String,
    pub youtube_url: String,
    pub link: String,
    pub link_type: LinkType,
    pub tabs: LanguageTabs<ContentFields>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContentField {
    Title,
    Description,
    Tags,
}

/// Addresses one control of the item editor.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemField {
    Featured,
    ImageUrl,
    YoutubeUrl,
    Link,
    LinkType,
    Content { lang: String, field: ContentField },
}

impl ItemEditor {
    pub fn open(mode: EditMode, item: Option<&PortfolioItem>, languages: &[String]) -> Self {
        let tabs = LanguageTabs::render(TabContext::ItemEditor, languages, |lang| {
            let content = item.and_then(|item| item.content.get(lang));
            content.map_or_else(ContentFields::default, |content| ContentFields {
                title: content.title.clone(),
                description: content.description.clone(),
                tags: content.tags.join(", "),
            })
        });
        ItemEditor {
            mode,
            featured: item.map_or(false, |item| item.featured),
            image_url: item.map(|item| item.image_url.clone()).unwrap_or_default(),
            youtube_url: item.map(|item| item.youtube_url.clone()).unwrap_or_default(),
            link: item.map(|item| item.link.clone()).unwrap_or_default(),
            link_type: item.map_or(LinkType::Auto, |item| item.link_type),
            tabs,
        }
    }

    pub fn set(&mut self, field: &ItemField, value: String) -> Result<()> {
        match field {
            ItemField::Featured => {
                self.featured = matches!(value.trim(), "true" | "on" | "1");
            }
            ItemField::ImageUrl => self.image_url = value,
            ItemField::YoutubeUrl => self.youtube_url = value,
            ItemField::Link => self.link = value,
            ItemField::LinkType => {
                self.link_type = serde_json::from_value(serde_json::Value::String(value.clone()))
                    .map_err(|_| FolioError::Validation(format!("Unknown link type \"{}\"", value)))?;
            }
            ItemField::Content { lang, field } => {
                let fields = self.tabs.panel_mut(lang).ok_or_else(|| {
                    FolioError::Validation(format!("No editor panel for \"{}\"", lang))
                })?;
                match field {
                    ContentField::Title => fields.title = value,
                    ContentField::Description => fields.description = value,
                    ContentField::Tags => fields.tags = value,
                }
            }
        }
        Ok(())
    }

    /// Builds the item from the editor fields. `previous` supplies the
    /// identity and social card when editing.
    pub fn build(&self, previous: Option<&PortfolioItem>, id: String) -> PortfolioItem {
        let content = self
            .tabs
            .panels
            .iter()
            .map(|panel| {
                let content = LocalizedContent {
                    title: panel.fields.title.trim().to_string(),
                    description: panel.fields.description.trim().to_string(),
                    tags: split_tags(&panel.fields.tags),
                };
                (panel.lang.clone(), content)
            })
            .collect();
        PortfolioItem {
            id: previous.map_or(id, |item| item.id.clone()),
            featured: self.featured,
            content,
            link: self.link.trim().to_string(),
            link_type: self.link_type,
            youtube_url: self.youtube_url.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            social_card: previous.map_or_else(SocialCard::default, |item| item.social_card.clone()),
            created_at: previous.map_or_else(now_iso, |item| item.created_at.clone()),
            extra: previous.map(|item| item.extra.clone()).unwrap_or_default(),
        }
    }
}

pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// A row of the portfolio list view.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ListRow {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub featured: bool,
}

pub const UNTITLED: &str = "제목 없음";

pub fn list_rows(items: &[PortfolioItem], languages: &[String]) -> Vec<ListRow> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let title = languages
                .first()
                .and_then(|lang| item.content.get(lang))
                .map(|content| content.title.clone())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            ListRow {
                index,
                id: item.id.clone(),
                title,
                featured: item.featured,
            }
        })
        .collect()
}

pub fn log_move(action: &str, moved: bool, index: usize) {
    if moved {
        info!("{} portfolio item {}", action, index);
    } else {
        debug!("{} portfolio item {} ignored", action, index);
    }
}
