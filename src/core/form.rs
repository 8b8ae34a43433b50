use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    core::tabs::{LanguageTabs, TabContext},
    error::{FolioError, Result},
    types::{Colors, CustomFont, Document, MetaEntry, SocialLink, DEFAULT_FONT},
};

pub const DEFAULT_FONTS: [&str; 3] = ["Galmuri9", "Galmuri11", "Galmuri7"];

pub struct TranslationKey {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

pub const TRANSLATION_KEYS: [TranslationKey; 8] = [
    TranslationKey { key: "nav.home", label: "네비게이션 - 홈", placeholder: "홈" },
    TranslationKey { key: "nav.news", label: "네비게이션 - 소식", placeholder: "소식" },
    TranslationKey { key: "home.title", label: "메인 타이틀", placeholder: "PIXEL ACHE STUDIO" },
    TranslationKey { key: "readMore", label: "더 보기 버튼", placeholder: "자세히 보기" },
    TranslationKey { key: "loading", label: "로딩 텍스트", placeholder: "로딩 중" },
    TranslationKey { key: "error", label: "에러 메시지", placeholder: "데이터를 불러올 수 없습니다." },
    TranslationKey { key: "empty", label: "빈 목록 메시지", placeholder: "아직 소식이 없습니다." },
    TranslationKey { key: "email", label: "이메일 라벨", placeholder: "이메일" },
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ColorName {
    Primary,
    Secondary,
    Background,
    Text,
    Accent,
}

/// A color picker and the text box next to it.
#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct ColorField {
    pub picker: String,
    pub text: String,
}

impl ColorField {
    fn new(value: &str) -> Self {
        ColorField {
            picker: value.to_string(),
            text: value.to_string(),
        }
    }

    pub fn sync_picker(&mut self) {
        self.picker = self.text.clone();
    }

    pub fn sync_text(&mut self) {
        self.text = self.picker.clone();
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct ColorFields {
    pub primary: ColorField,
    pub secondary: ColorField,
    pub background: ColorField,
    pub text: ColorField,
    pub accent: ColorField,
}

impl ColorFields {
    fn from_colors(colors: &Colors) -> Self {
        ColorFields {
            primary: ColorField::new(&colors.primary),
            secondary: ColorField::new(&colors.secondary),
            background: ColorField::new(&colors.background),
            text: ColorField::new(&colors.text),
            accent: ColorField::new(&colors.accent),
        }
    }

    pub fn get_mut(&mut self, name: ColorName) -> &mut ColorField {
        match name {
            ColorName::Primary => &mut self.primary,
            ColorName::Secondary => &mut self.secondary,
            ColorName::Background => &mut self.background,
            ColorName::Text => &mut self.text,
            ColorName::Accent => &mut self.accent,
        }
    }

    /// Text values are taken verbatim, with no hex validation.
    fn collect(&self) -> Colors {
        Colors {
            primary: self.primary.text.clone(),
            secondary: self.secondary.text.clone(),
            background: self.background.text.clone(),
            text: self.text.text.clone(),
            accent: self.accent.text.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum SocialField {
    Platform,
    Url,
    Icon,
}

/// One text input of the social links section, tagged with its row index.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SocialInput {
    pub index: usize,
    pub field: SocialField,
    pub value: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct MetaFields {
    pub title: String,
    pub description: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TranslationField {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MetaField {
    Title,
    Description,
}

/// Addresses one control of the settings form.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FormField {
    Font,
    ColorPicker { color: ColorName },
    ColorText { color: ColorName },
    Email,
    TwitterHandle,
    OgImage,
    Meta { lang: String, field: MetaField },
    Translation { lang: String, key: String },
    Social { index: usize, field: SocialField },
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub font: String,
    pub font_options: Vec<String>,
    pub colors: ColorFields,
    pub email: String,
    pub twitter_handle: String,
    pub og_image: String,
    pub social_inputs: Vec<SocialInput>,
    pub meta_tabs: LanguageTabs<MetaFields>,
    pub translation_tabs: LanguageTabs<Vec<TranslationField>>,
}

pub fn populate_form(document: &Document) -> FormState {
    let settings = &document.settings;
    let font = if settings.font.is_empty() {
        DEFAULT_FONT.to_string()
    } else {
        settings.font.clone()
    };
    FormState {
        font,
        font_options: font_options(&settings.custom_fonts),
        colors: ColorFields::from_colors(&settings.colors),
        email: settings.email.clone(),
        twitter_handle: settings.twitter_handle.clone(),
        og_image: settings.og_image.clone(),
        social_inputs: social_inputs(&settings.social_links),
        meta_tabs: meta_tabs(document),
        translation_tabs: translation_tabs(document),
    }
}

pub fn font_options(custom_fonts: &[CustomFont]) -> Vec<String> {
    DEFAULT_FONTS
        .iter()
        .map(|font| font.to_string())
        .chain(custom_fonts.iter().map(|font| font.family.clone()))
        .collect()
}

pub fn social_inputs(links: &[SocialLink]) -> Vec<SocialInput> {
    links
        .iter()
        .enumerate()
        .flat_map(|(index, link)| {
            [
                (SocialField::Platform, &link.platform),
                (SocialField::Url, &link.url),
                (SocialField::Icon, &link.icon),
            ]
            .into_iter()
            .map(move |(field, value)| SocialInput {
                index,
                field,
                value: value.clone(),
            })
        })
        .collect()
}

pub fn meta_tabs(document: &Document) -> LanguageTabs<MetaFields> {
    let meta = &document.settings.meta;
    LanguageTabs::render(TabContext::Meta, &document.languages(), |lang| {
        let entry = meta.get(lang).cloned().unwrap_or_default();
        MetaFields {
            title: entry.title,
            description: entry.description,
        }
    })
}

pub fn translation_tabs(document: &Document) -> LanguageTabs<Vec<TranslationField>> {
    let translations = &document.settings.translations;
    LanguageTabs::render(TabContext::Translations, &document.languages(), |lang| {
        let existing = translations.get(lang);
        TRANSLATION_KEYS
            .iter()
            .map(|entry| TranslationField {
                key: entry.key,
                label: entry.label,
                placeholder: entry.placeholder,
                value: existing
                    .and_then(|values| values.get(entry.key))
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    })
}

/// Groups inputs by row index and keeps rows with both a platform and a URL.
pub fn collect_social_links(inputs: &[SocialInput]) -> Vec<SocialLink> {
    let mut rows: BTreeMap<usize, SocialLink> = BTreeMap::new();
    for input in inputs {
        let row = rows.entry(input.index).or_default();
        match input.field {
            SocialField::Platform => row.platform = input.value.clone(),
            SocialField::Url => row.url = input.value.clone(),
            SocialField::Icon => row.icon = input.value.clone(),
        }
    }
    rows.into_values()
        .filter(|link| !link.platform.is_empty() && !link.url.is_empty())
        .collect()
}

/// Writes the form back into the working copy. Sections without a form
/// control (custom fonts, portfolio, unknown keys) are left as they are.
pub fn collect_form_data(form: &FormState, document: &mut Document) {
    let settings = &mut document.settings;
    settings.font = form.font.clone();
    settings.colors = form.colors.collect();
    settings.social_links = collect_social_links(&form.social_inputs);
    settings.email = form.email.clone();
    settings.twitter_handle = form.twitter_handle.trim().to_string();
    settings.og_image = form.og_image.trim().to_string();

    settings.meta = form
        .meta_tabs
        .panels
        .iter()
        .map(|panel| {
            let entry = MetaEntry {
                title: panel.fields.title.clone(),
                description: panel.fields.description.clone(),
            };
            (panel.lang.clone(), entry)
        })
        .collect();

    let languages: Vec<String> = settings.meta.keys().cloned().collect();
    settings
        .translations
        .retain(|lang, _| languages.contains(lang));
    for lang in &languages {
        let values = settings.translations.entry(lang.clone()).or_default();
        let Some(fields) = form.translation_tabs.panel(lang) else {
            continue;
        };
        for field in fields {
            let value = field.value.trim();
            if value.is_empty() {
                values.shift_remove(field.key);
            } else {
                values.insert(field.key.to_string(), value.to_string());
            }
        }
    }
}

impl FormState {
    pub fn set(&mut self, field: &FormField, value: String) -> Result<()> {
        match field {
            FormField::Font => self.font = value,
            FormField::ColorPicker { color } => {
                let color = self.colors.get_mut(*color);
                color.picker = value;
                color.sync_text();
            }
            FormField::ColorText { color } => {
                let color = self.colors.get_mut(*color);
                color.text = value;
                color.sync_picker();
            }
            FormField::Email => self.email = value,
            FormField::TwitterHandle => self.twitter_handle = value,
            FormField::OgImage => self.og_image = value,
            FormField::Meta { lang, field } => {
                let panel = self
                    .meta_tabs
                    .panel_mut(lang)
                    .ok_or_else(|| missing_field(&format!("meta-{}", lang)))?;
                match field {
                    MetaField::Title => panel.title = value,
                    MetaField::Description => panel.description = value,
                }
            }
            FormField::Translation { lang, key } => {
                let input = self
                    .translation_tabs
                    .panel_mut(lang)
                    .and_then(|fields| fields.iter_mut().find(|f| f.key == key))
                    .ok_or_else(|| missing_field(&format!("trans-{}-{}", lang, key)))?;
                input.value = value;
            }
            FormField::Social { index, field } => {
                let input = self
                    .social_inputs
                    .iter_mut()
                    .find(|input| input.index == *index && input.field == *field)
                    .ok_or_else(|| missing_field(&format!("social-{}", index)))?;
                input.value = value;
            }
        }
        Ok(())
    }
}

fn missing_field(id: &str) -> FolioError {
    FolioError::Validation(format!("No form field \"{}\"", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::parse_document;

    fn sample() -> Document {
        parse_document(
            r##"{
              "settings": {
                "font": "Galmuri11",
                "colors": {"primary":"#111111","secondary":"#222222","background":"#333333","text":"#444444","accent":"#555555"},
                "socialLinks": [
                  {"platform":"twitter","url":"https://x.com/a","icon":"fab fa-x-twitter"},
                  {"platform":"youtube","url":"https://youtube.com/a","icon":"fab fa-youtube"}
                ],
                "email": "hello@example.com",
                "twitterHandle": "@studio",
                "meta": {"ko":{"title":"스튜디오","description":"설명"},"en":{"title":"Studio","description":"About"}},
                "translations": {"ko":{"nav.home":"홈","custom.key":"유지"},"en":{"nav.home":"Home"}},
                "ogImage": "./og.png",
                "customFonts": [{"name":"Dot","url":"https://fonts/dot.css","family":"DotFont"}]
              },
              "portfolio": [{"id":"1","content":{"ko":{"title":"하나","description":"","tags":["a"]}},"createdAt":"2024-01-01T00:00:00.000Z"}]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn populate_then_collect_reproduces_document() {
        let original = sample();
        let form = populate_form(&original);
        let mut working = original.clone();
        collect_form_data(&form, &mut working);
        assert_eq!(working, original);
    }

    #[test]
    fn partial_social_rows_are_dropped() {
        let inputs = vec![
            SocialInput { index: 1, field: SocialField::Platform, value: "github".into() },
            SocialInput { index: 1, field: SocialField::Url, value: "".into() },
            SocialInput { index: 0, field: SocialField::Platform, value: "twitter".into() },
            SocialInput { index: 0, field: SocialField::Url, value: "https://x.com".into() },
            SocialInput { index: 2, field: SocialField::Url, value: "https://nowhere".into() },
        ];
        let links = collect_social_links(&inputs);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].platform, "twitter");
        assert_eq!(links[0].icon, "");
    }

    #[test]
    fn colors_pass_through_unvalidated() {
        let mut doc = sample();
        let mut form = populate_form(&doc);
        form.set(&FormField::ColorText { color: ColorName::Accent }, "not-a-color".into())
            .unwrap();
        assert_eq!(form.colors.accent.picker, "not-a-color");
        collect_form_data(&form, &mut doc);
        assert_eq!(doc.settings.colors.accent, "not-a-color");
    }

    #[test]
    fn picker_input_updates_text() {
        let mut form = populate_form(&sample());
        form.set(&FormField::ColorPicker { color: ColorName::Primary }, "#abcdef".into())
            .unwrap();
        assert_eq!(form.colors.primary.text, "#abcdef");
    }

    #[test]
    fn translations_trim_and_drop_empty_but_keep_unknown_keys() {
        let mut doc = sample();
        let mut form = populate_form(&doc);
        let home = FormField::Translation { lang: "ko".into(), key: "nav.home".into() };
        let news = FormField::Translation { lang: "ko".into(), key: "nav.news".into() };
        form.set(&home, "   ".into()).unwrap();
        form.set(&news, "  소식 ".into()).unwrap();
        collect_form_data(&form, &mut doc);
        let ko = &doc.settings.translations["ko"];
        assert!(!ko.contains_key("nav.home"));
        assert_eq!(ko["nav.news"], "소식");
        assert_eq!(ko["custom.key"], "유지");
    }

    #[test]
    fn trims_handle_and_og_image_only() {
        let mut doc = sample();
        let mut form = populate_form(&doc);
        form.set(&FormField::TwitterHandle, " @x ".into()).unwrap();
        form.set(&FormField::OgImage, " img.png ".into()).unwrap();
        form.set(&FormField::Email, " a@b.c ".into()).unwrap();
        collect_form_data(&form, &mut doc);
        assert_eq!(doc.settings.twitter_handle, "@x");
        assert_eq!(doc.settings.og_image, "img.png");
        assert_eq!(doc.settings.email, " a@b.c ");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut form = populate_form(&sample());
        let field = FormField::Meta { lang: "fr".into(), field: MetaField::Title };
        assert!(form.set(&field, "x".into()).is_err());
    }

    #[test]
    fn font_options_list_defaults_then_custom() {
        let form = populate_form(&sample());
        assert_eq!(form.font_options, vec!["Galmuri9", "Galmuri11", "Galmuri7", "DotFont"]);
    }
}
