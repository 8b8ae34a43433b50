use serde::{Deserialize, Serialize};

/// The three places the admin shows one panel per language.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TabContext {
    Meta,
    Translations,
    ItemEditor,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LanguagePanel<P> {
    pub lang: String,
    pub label: String,
    pub active: bool,
    pub fields: P,
}

/// Tab buttons and panels for one context. A rebuild always discards the
/// previous selection.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LanguageTabs<P> {
    pub context: TabContext,
    pub panels: Vec<LanguagePanel<P>>,
}

impl<P> LanguageTabs<P> {
    pub fn render<F>(context: TabContext, languages: &[String], panel_for: F) -> Self
    where
        F: FnMut(&str) -> P,
    {
        Self::render_with_active(context, languages, 0, panel_for)
    }

    pub fn render_with_active<F>(
        context: TabContext,
        languages: &[String],
        active_index: usize,
        mut panel_for: F,
    ) -> Self
    where
        F: FnMut(&str) -> P,
    {
        let panels = languages
            .iter()
            .enumerate()
            .map(|(idx, lang)| LanguagePanel {
                lang: lang.clone(),
                label: language_display_name(lang),
                active: idx == active_index,
                fields: panel_for(lang),
            })
            .collect();
        LanguageTabs { context, panels }
    }

    /// Marks `lang` active. Unknown codes leave the current selection alone.
    pub fn switch_tab(&mut self, lang: &str) -> bool {
        if !self.panels.iter().any(|panel| panel.lang == lang) {
            return false;
        }
        for panel in &mut self.panels {
            panel.active = panel.lang == lang;
        }
        true
    }

    /// `None` when there are no languages at all.
    pub fn active_language(&self) -> Option<&str> {
        self.panels
            .iter()
            .find(|panel| panel.active)
            .map(|panel| panel.lang.as_str())
    }

    pub fn panel(&self, lang: &str) -> Option<&P> {
        self.panels
            .iter()
            .find(|panel| panel.lang == lang)
            .map(|panel| &panel.fields)
    }

    pub fn panel_mut(&mut self, lang: &str) -> Option<&mut P> {
        self.panels
            .iter_mut()
            .find(|panel| panel.lang == lang)
            .map(|panel| &mut panel.fields)
    }
}

pub fn language_display_name(lang: &str) -> String {
    match lang {
        "ko" => "한국어",
        "en" => "영어",
        "ja" => "日本語",
        "zh" => "中文",
        "es" => "Español",
        "fr" => "Français",
        "de" => "Deutsch",
        other => return other.to_uppercase(),
    }
    .to_string()
}

/// Trims and lowercases a user-typed language code.
pub fn normalize_language_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_lowercase();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn first_language_is_active_after_render() {
        let tabs = LanguageTabs::render(TabContext::Meta, &langs(&["ko", "en", "ja"]), |_| ());
        assert_eq!(tabs.active_language(), Some("ko"));
        assert_eq!(tabs.panels.iter().filter(|p| p.active).count(), 1);
        assert_eq!(tabs.panels[2].label, "日本語");
    }

    #[test]
    fn switch_to_unknown_language_is_silent() {
        let mut tabs = LanguageTabs::render(TabContext::Translations, &langs(&["ko", "en"]), |_| ());
        assert!(tabs.switch_tab("en"));
        assert_eq!(tabs.active_language(), Some("en"));
        assert!(!tabs.switch_tab("xx"));
        assert_eq!(tabs.active_language(), Some("en"));
    }

    #[test]
    fn empty_language_list_has_no_active_tab() {
        let tabs: LanguageTabs<()> = LanguageTabs::render(TabContext::ItemEditor, &[], |_| ());
        assert!(tabs.panels.is_empty());
        assert_eq!(tabs.active_language(), None);
    }

    #[test]
    fn unknown_codes_display_uppercased() {
        assert_eq!(language_display_name("pt"), "PT");
        assert_eq!(language_display_name("fr"), "Français");
    }

    #[test]
    fn language_codes_are_normalized() {
        assert_eq!(normalize_language_code("  FR "), Some("fr".to_string()));
        assert_eq!(normalize_language_code("   "), None);
    }
}
