use log::info;
use serde::Serialize;

use crate::{
    core::tabs::normalize_language_code,
    error::{FolioError, Result},
    types::{CustomFont, Document, LocalizedContent, MetaEntry, SocialLink, DEFAULT_FONT},
};

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct IconChoice {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

const fn icon(name: &'static str, icon: &'static str, color: &'static str) -> IconChoice {
    IconChoice { name, icon, color }
}

pub const SNS_ICONS: [IconChoice; 20] = [
    icon("Twitter / X", "fab fa-x-twitter", "#000000"),
    icon("Instagram", "fab fa-instagram", "#E4405F"),
    icon("Facebook", "fab fa-facebook", "#1877F2"),
    icon("YouTube", "fab fa-youtube", "#FF0000"),
    icon("GitHub", "fab fa-github", "#181717"),
    icon("LinkedIn", "fab fa-linkedin", "#0A66C2"),
    icon("Discord", "fab fa-discord", "#5865F2"),
    icon("Twitch", "fab fa-twitch", "#9146FF"),
    icon("TikTok", "fab fa-tiktok", "#000000"),
    icon("Reddit", "fab fa-reddit", "#FF4500"),
    icon("Telegram", "fab fa-telegram", "#26A5E4"),
    icon("WhatsApp", "fab fa-whatsapp", "#25D366"),
    icon("Bluesky", "fas fa-cloud", "#0085FF"),
    icon("Steam", "fab fa-steam", "#000000"),
    icon("Itch.io", "fab fa-itch-io", "#FA5C5C"),
    icon("Unity", "fab fa-unity", "#000000"),
    icon("이메일", "fas fa-envelope", "#EA4335"),
    icon("블로그", "fas fa-blog", "#21759B"),
    icon("웹사이트", "fas fa-globe", "#4285F4"),
    icon("링크", "fas fa-link", "#666666"),
];

pub fn search_icons(query: &str) -> Vec<IconChoice> {
    let query = query.to_lowercase();
    SNS_ICONS
        .iter()
        .filter(|choice| choice.name.to_lowercase().contains(&query))
        .copied()
        .collect()
}

pub fn add_social_link(document: &mut Document) {
    document.settings.social_links.push(SocialLink {
        platform: "new-platform".to_string(),
        url: "https://".to_string(),
        icon: "fas fa-link".to_string(),
    });
    info!("Added social link #{}", document.settings.social_links.len() - 1);
}

pub fn set_social_icon(document: &mut Document, index: usize, icon: &str) -> Result<()> {
    let len = document.settings.social_links.len();
    let link = document
        .settings
        .social_links
        .get_mut(index)
        .ok_or(FolioError::IndexOutOfRange { index, len })?;
    link.icon = icon.to_string();
    Ok(())
}

pub fn add_custom_font(document: &mut Document, name: &str, url: &str, family: &str) -> Result<()> {
    let (name, url, family) = (name.trim(), url.trim(), family.trim());
    if name.is_empty() {
        return Err(FolioError::Validation("폰트 이름을 입력해주세요.".to_string()));
    }
    if url.is_empty() {
        return Err(FolioError::Validation("폰트 URL을 입력해주세요.".to_string()));
    }
    if family.is_empty() {
        return Err(FolioError::Validation("CSS font-family 값을 입력해주세요.".to_string()));
    }
    document.settings.custom_fonts.push(CustomFont {
        name: name.to_string(),
        url: url.to_string(),
        family: family.to_string(),
    });
    info!("Added custom font \"{}\"", name);
    Ok(())
}

/// Removes the font; a site font that pointed at it falls back to the default.
pub fn remove_custom_font(document: &mut Document, index: usize) -> Option<CustomFont> {
    if index >= document.settings.custom_fonts.len() {
        return None;
    }
    let font = document.settings.custom_fonts.remove(index);
    if document.settings.font == font.family {
        document.settings.font = DEFAULT_FONT.to_string();
    }
    info!("Removed custom font \"{}\"", font.name);
    Some(font)
}

/// Adds empty entries for `raw` to meta, translations and every item's
/// content. Existing entries are left alone.
pub fn add_language(document: &mut Document, raw: &str) -> Result<String> {
    let lang = normalize_language_code(raw).ok_or(FolioError::InvalidLanguage)?;
    let settings = &mut document.settings;
    settings
        .meta
        .entry(lang.clone())
        .or_insert_with(MetaEntry::default);
    settings.translations.entry(lang.clone()).or_default();
    for item in &mut document.portfolio {
        item.content
            .entry(lang.clone())
            .or_insert_with(LocalizedContent::default);
    }
    info!("Added language \"{}\"", lang);
    Ok(lang)
}

/// Drops the language from meta and translations. Item content for it stays.
pub fn remove_language(document: &mut Document, lang: &str) -> bool {
    let settings = &mut document.settings;
    let had_meta = settings.meta.shift_remove(lang).is_some();
    let had_translations = settings.translations.shift_remove(lang).is_some();
    if had_meta || had_translations {
        info!("Removed language \"{}\"", lang);
    }
    had_meta || had_translations
}
