use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        data::{export_document, parse_document, to_pretty_json, ExportFile},
        form::{
            collect_form_data, font_options, meta_tabs, populate_form, social_inputs,
            translation_tabs, FormField, FormState,
        },
        portfolio::{
            list_rows, log_move, move_item, now_iso, reorder, Direction, DragState, EditMode,
            IdGenerator, ItemEditor, ItemField, ListRow,
        },
        site,
        tabs::{language_display_name, TabContext},
    },
    error::{FolioError, Result},
    types::{Document, PortfolioItem},
};

pub const LOGOUT_PROMPT: &str = "로그아웃 하시겠습니까?";

/// Asks the user before anything destructive happens.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// An answer given up front, e.g. by an HTTP client.
pub struct Preconfirmed(pub bool);

impl Confirm for Preconfirmed {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    Settings,
    Portfolio,
    Meta,
    Translations,
    Json,
}

/// Admin commands, addressed by their `action` name.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    SwitchView { view: View },
    SwitchTab { context: TabContext, lang: String },
    SetField { field: FormField, value: String },
    AddLanguage { lang: String },
    RemoveLanguage { lang: String },
    AddSocialLink,
    RemoveSocialLink { index: usize },
    SetSocialIcon { index: usize, icon: String },
    AddCustomFont { name: String, url: String, family: String },
    RemoveCustomFont { index: usize },
    AddItem,
    RemoveItem { index: usize },
    MoveItem { index: usize, direction: i64 },
    ReorderItem { source: usize, target: usize },
    DragStart { index: usize },
    DropOn { index: usize },
    DragEnd,
    OpenEditor { index: Option<usize> },
    SetItemField { field: ItemField, value: String },
    CommitEditor,
    CancelEditor,
    EditTextView { text: String },
    ValidateJson,
    FormatJson,
    Save,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Applied,
    Unchanged,
    Declined,
    Language { lang: String },
    Validation { valid: bool, message: String },
    Exported { file_name: String, size: usize },
}

/// Everything the admin editor mutates: the working copy, the form that
/// mirrors it, the text view, the item editor modal and drag tracking.
#[derive(Debug)]
pub struct EditorSession {
    document: Document,
    form: FormState,
    text_view: String,
    view: View,
    editor: Option<ItemEditor>,
    drag: DragState,
    ids: IdGenerator,
    last_export: Option<ExportFile>,
}

impl EditorSession {
    pub fn new(document: Document) -> Result<Self> {
        let form = populate_form(&document);
        let text_view = to_pretty_json(&document)?;
        info!(
            "Editor session opened with {} languages and {} items",
            document.settings.meta.len(),
            document.portfolio.len()
        );
        Ok(EditorSession {
            document,
            form,
            text_view,
            view: View::default(),
            editor: None,
            drag: DragState::default(),
            ids: IdGenerator::default(),
            last_export: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn text_view(&self) -> &str {
        &self.text_view
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn editor(&self) -> Option<&ItemEditor> {
        self.editor.as_ref()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn last_export(&self) -> Option<&ExportFile> {
        self.last_export.as_ref()
    }

    pub fn list_rows(&self) -> Vec<ListRow> {
        list_rows(&self.document.portfolio, &self.document.languages())
    }

    pub fn update_text_view(&mut self) -> Result<()> {
        self.text_view = to_pretty_json(&self.document)?;
        Ok(())
    }

    /// Positions in the list shifted, so any drag in flight is stale.
    fn list_changed(&mut self) -> Result<()> {
        self.drag.end();
        self.update_text_view()
    }

    fn render_language_tabs(&mut self) {
        self.form.meta_tabs = meta_tabs(&self.document);
        self.form.translation_tabs = translation_tabs(&self.document);
    }

    pub fn switch_view(&mut self, view: View) -> Result<()> {
        if view == View::Json {
            self.update_text_view()?;
        }
        self.view = view;
        debug!("Switched to {:?} view", view);
        Ok(())
    }

    pub fn switch_tab(&mut self, context: TabContext, lang: &str) -> bool {
        match context {
            TabContext::Meta => self.form.meta_tabs.switch_tab(lang),
            TabContext::Translations => self.form.translation_tabs.switch_tab(lang),
            TabContext::ItemEditor => self
                .editor
                .as_mut()
                .map_or(false, |editor| editor.tabs.switch_tab(lang)),
        }
    }

    pub fn add_language(&mut self, raw: &str) -> Result<String> {
        let lang = site::add_language(&mut self.document, raw)?;
        self.render_language_tabs();
        self.update_text_view()?;
        Ok(lang)
    }

    pub fn remove_language(&mut self, lang: &str, confirm: &mut dyn Confirm) -> Result<bool> {
        let settings = &self.document.settings;
        if !settings.meta.contains_key(lang) && !settings.translations.contains_key(lang) {
            return Ok(false);
        }
        let prompt = format!("'{}' 언어를 삭제하시겠습니까?", language_display_name(lang));
        if !confirm.confirm(&prompt) {
            debug!("Removal of language \"{}\" declined", lang);
            return Ok(false);
        }
        site::remove_language(&mut self.document, lang);
        self.render_language_tabs();
        self.update_text_view()?;
        Ok(true)
    }

    pub fn add_social_link(&mut self) -> Result<()> {
        site::add_social_link(&mut self.document);
        self.form.social_inputs = social_inputs(&self.document.settings.social_links);
        self.update_text_view()
    }

    pub fn remove_social_link(&mut self, index: usize, confirm: &mut dyn Confirm) -> Result<bool> {
        if index >= self.document.settings.social_links.len() {
            return Ok(false);
        }
        if !confirm.confirm("이 SNS 링크를 삭제하시겠습니까?") {
            debug!("Removal of social link {} declined", index);
            return Ok(false);
        }
        self.document.settings.social_links.remove(index);
        info!("Removed social link {}", index);
        self.form.social_inputs = social_inputs(&self.document.settings.social_links);
        self.update_text_view()?;
        Ok(true)
    }

    pub fn set_social_icon(&mut self, index: usize, icon: &str) -> Result<()> {
        site::set_social_icon(&mut self.document, index, icon)?;
        self.form.social_inputs = social_inputs(&self.document.settings.social_links);
        self.update_text_view()
    }

    pub fn add_custom_font(&mut self, name: &str, url: &str, family: &str) -> Result<()> {
        site::add_custom_font(&mut self.document, name, url, family)?;
        self.form.font_options = font_options(&self.document.settings.custom_fonts);
        self.update_text_view()
    }

    pub fn remove_custom_font(&mut self, index: usize, confirm: &mut dyn Confirm) -> Result<bool> {
        if index >= self.document.settings.custom_fonts.len() {
            return Ok(false);
        }
        if !confirm.confirm("이 폰트를 삭제하시겠습니까?") {
            return Ok(false);
        }
        if let Some(font) = site::remove_custom_font(&mut self.document, index) {
            if self.form.font == font.family {
                self.form.font = self.document.settings.font.clone();
            }
        }
        self.form.font_options = font_options(&self.document.settings.custom_fonts);
        self.update_text_view()?;
        Ok(true)
    }

    /// Appends an empty item with content for every active language.
    pub fn add_item(&mut self) -> Result<String> {
        let id = self.ids.next_id(&self.document.portfolio);
        let item = PortfolioItem::new(
            id.clone(),
            &self.document.languages(),
            now_iso(),
        );
        self.document.portfolio.push(item);
        info!("Added portfolio item {}", id);
        self.list_changed()?;
        Ok(id)
    }

    pub fn remove_item(&mut self, index: usize, confirm: &mut dyn Confirm) -> Result<bool> {
        if index >= self.document.portfolio.len() {
            return Ok(false);
        }
        if !confirm.confirm("이 포트폴리오 항목을 삭제하시겠습니까?") {
            debug!("Removal of portfolio item {} declined", index);
            return Ok(false);
        }
        let removed = self.document.portfolio.remove(index);
        info!("Removed portfolio item {} ({})", index, removed.id);
        self.list_changed()?;
        Ok(true)
    }

    pub fn move_item(&mut self, index: usize, direction: Direction) -> Result<bool> {
        let moved = move_item(&mut self.document.portfolio, index, direction);
        log_move("Moved", moved, index);
        if moved {
            self.list_changed()?;
        }
        Ok(moved)
    }

    pub fn reorder_by_drag(&mut self, source: usize, target: usize) -> Result<bool> {
        let moved = reorder(&mut self.document.portfolio, source, target);
        log_move("Dragged", moved, source);
        if moved {
            self.list_changed()?;
        }
        Ok(moved)
    }

    pub fn drag_start(&mut self, index: usize) {
        if index < self.document.portfolio.len() {
            self.drag.start(index);
        }
    }

    pub fn drop_on(&mut self, target: usize) -> Result<bool> {
        match self.drag.drop_on(target) {
            Some((source, target)) => self.reorder_by_drag(source, target),
            None => {
                debug!("Drop on {} without an active drag", target);
                Ok(false)
            }
        }
    }

    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    /// `None` opens the editor for a new item.
    pub fn open_editor(&mut self, index: Option<usize>) -> Result<()> {
        let languages = self.document.languages();
        let editor = match index {
            Some(index) => {
                let len = self.document.portfolio.len();
                let item = self
                    .document
                    .portfolio
                    .get(index)
                    .ok_or(FolioError::IndexOutOfRange { index, len })?;
                ItemEditor::open(EditMode::Edit(item.id.clone()), Some(item), &languages)
            }
            None => ItemEditor::open(EditMode::Create, None, &languages),
        };
        self.editor = Some(editor);
        Ok(())
    }

    pub fn set_item_field(&mut self, field: &ItemField, value: String) -> Result<()> {
        self.editor
            .as_mut()
            .ok_or(FolioError::EditorClosed)?
            .set(field, value)
    }

    /// Writes the modal back into the list and closes it.
    pub fn commit_editor(&mut self) -> Result<usize> {
        let editor = self.editor.as_ref().ok_or(FolioError::EditorClosed)?;
        let index = match &editor.mode {
            EditMode::Edit(id) => {
                let index = self
                    .document
                    .portfolio
                    .iter()
                    .position(|item| &item.id == id)
                    .ok_or_else(|| FolioError::ItemRemoved(id.clone()))?;
                let previous = &self.document.portfolio[index];
                let item = editor.build(Some(previous), id.clone());
                self.document.portfolio[index] = item;
                info!("Updated portfolio item {}", index);
                index
            }
            EditMode::Create => {
                let id = self.ids.next_id(&self.document.portfolio);
                let item = editor.build(None, id);
                self.document.portfolio.push(item);
                info!("Created portfolio item {}", self.document.portfolio.len() - 1);
                self.document.portfolio.len() - 1
            }
        };
        self.editor = None;
        self.list_changed()?;
        Ok(index)
    }

    pub fn cancel_editor(&mut self) {
        if self.editor.take().is_some() {
            debug!("Item editor cancelled");
        }
    }

    pub fn edit_text_view(&mut self, text: String) {
        self.text_view = text;
    }

    pub fn validate_json(&self) -> std::result::Result<(), String> {
        serde_json::from_str::<serde_json::Value>(&self.text_view)
            .map(|_| ())
            .map_err(|error| error.to_string())
    }

    pub fn format_json(&mut self) -> Result<()> {
        let value: serde_json::Value =
            serde_json::from_str(&self.text_view).map_err(|error| FolioError::Parse {
                message: error.to_string(),
            })?;
        self.text_view = serde_json::to_string_pretty(&value)?;
        Ok(())
    }

    /// Replaces the working copy with the parsed text view.
    pub fn parse_text_view(&mut self) -> Result<()> {
        let document = parse_document(&self.text_view).map_err(|error| {
            warn!("Text view rejected: {}", error);
            error
        })?;
        self.document = document;
        self.form = populate_form(&self.document);
        self.drag.end();
        Ok(())
    }

    /// Folds the active view into the working copy and emits the export file.
    /// On failure the working copy is untouched.
    pub fn save(&mut self) -> Result<ExportFile> {
        if self.view == View::Json {
            self.parse_text_view()?;
        } else {
            collect_form_data(&self.form, &mut self.document);
        }
        let file = export_document(&self.document)?;
        self.update_text_view()?;
        self.last_export = Some(file.clone());
        Ok(file)
    }

    pub fn dispatch(&mut self, action: Action, confirm: &mut dyn Confirm) -> Result<Outcome> {
        let outcome = match action {
            Action::SwitchView { view } => {
                self.switch_view(view)?;
                Outcome::Applied
            }
            Action::SwitchTab { context, lang } => changed(self.switch_tab(context, &lang)),
            Action::SetField { field, value } => {
                self.form.set(&field, value)?;
                Outcome::Applied
            }
            Action::AddLanguage { lang } => Outcome::Language {
                lang: self.add_language(&lang)?,
            },
            Action::RemoveLanguage { lang } => {
                declined_or_applied(self.remove_language(&lang, confirm)?)
            }
            Action::AddSocialLink => {
                self.add_social_link()?;
                Outcome::Applied
            }
            Action::RemoveSocialLink { index } => {
                declined_or_applied(self.remove_social_link(index, confirm)?)
            }
            Action::SetSocialIcon { index, icon } => {
                self.set_social_icon(index, &icon)?;
                Outcome::Applied
            }
            Action::AddCustomFont { name, url, family } => {
                self.add_custom_font(&name, &url, &family)?;
                Outcome::Applied
            }
            Action::RemoveCustomFont { index } => {
                declined_or_applied(self.remove_custom_font(index, confirm)?)
            }
            Action::AddItem => {
                self.add_item()?;
                Outcome::Applied
            }
            Action::RemoveItem { index } => declined_or_applied(self.remove_item(index, confirm)?),
            Action::MoveItem { index, direction } => {
                changed(self.move_item(index, Direction::try_from(direction)?)?)
            }
            Action::ReorderItem { source, target } => changed(self.reorder_by_drag(source, target)?),
            Action::DragStart { index } => {
                self.drag_start(index);
                Outcome::Applied
            }
            Action::DropOn { index } => changed(self.drop_on(index)?),
            Action::DragEnd => {
                self.drag_end();
                Outcome::Applied
            }
            Action::OpenEditor { index } => {
                self.open_editor(index)?;
                Outcome::Applied
            }
            Action::SetItemField { field, value } => {
                self.set_item_field(&field, value)?;
                Outcome::Applied
            }
            Action::CommitEditor => {
                self.commit_editor()?;
                Outcome::Applied
            }
            Action::CancelEditor => {
                self.cancel_editor();
                Outcome::Applied
            }
            Action::EditTextView { text } => {
                self.edit_text_view(text);
                Outcome::Applied
            }
            Action::ValidateJson => match self.validate_json() {
                Ok(()) => Outcome::Validation {
                    valid: true,
                    message: "✓ JSON이 유효합니다.".to_string(),
                },
                Err(message) => Outcome::Validation {
                    valid: false,
                    message: format!("✗ JSON 오류: {}", message),
                },
            },
            Action::FormatJson => {
                self.format_json()?;
                Outcome::Applied
            }
            Action::Save => {
                let file = self.save()?;
                Outcome::Exported {
                    file_name: file.file_name.to_string(),
                    size: file.bytes.len(),
                }
            }
        };
        Ok(outcome)
    }
}

fn changed(applied: bool) -> Outcome {
    if applied {
        Outcome::Applied
    } else {
        Outcome::Unchanged
    }
}

fn declined_or_applied(applied: bool) -> Outcome {
    if applied {
        Outcome::Applied
    } else {
        Outcome::Declined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        form::{MetaField, SocialField},
        portfolio::ContentField,
    };

    fn session() -> EditorSession {
        let document = parse_document(
            r#"{
              "settings": {
                "font": "Galmuri9",
                "socialLinks": [
                  {"platform":"twitter","url":"https://x.com/a","icon":"fab fa-x-twitter"},
                  {"platform":"instagram","url":"https://instagram.com/a","icon":"fab fa-instagram"},
                  {"platform":"youtube","url":"https://youtube.com/a","icon":"fab fa-youtube"}
                ],
                "meta": {"ko":{"title":"스튜디오","description":""},"en":{"title":"Studio","description":""}},
                "translations": {"ko":{},"en":{}}
              },
              "portfolio": [
                {"id":"A","content":{"ko":{"title":"가"},"en":{"title":"A"}},"socialCard":{"title":"card","description":"","image":""},"createdAt":"2024-01-01T00:00:00.000Z"},
                {"id":"B","content":{"ko":{"title":"나"}}},
                {"id":"C","content":{"ko":{"title":"다"}}},
                {"id":"D","content":{"ko":{"title":"라"}}},
                {"id":"E","content":{"ko":{"title":"마"}}}
              ]
            }"#,
        )
        .unwrap();
        EditorSession::new(document).unwrap()
    }

    fn ids(session: &EditorSession) -> Vec<&str> {
        session.document().portfolio.iter().map(|item| item.id.as_str()).collect()
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    #[test]
    fn declined_social_removal_keeps_links() {
        let mut session = session();
        assert!(!session.remove_social_link(1, &mut no).unwrap());
        assert_eq!(session.document().settings.social_links.len(), 3);
        let mut asked = Vec::new();
        let mut record = |prompt: &str| {
            asked.push(prompt.to_string());
            true
        };
        assert!(session.remove_social_link(1, &mut record).unwrap());
        assert_eq!(asked.len(), 1);
        let platforms: Vec<&str> = session
            .document()
            .settings
            .social_links
            .iter()
            .map(|link| link.platform.as_str())
            .collect();
        assert_eq!(platforms, vec!["twitter", "youtube"]);
        assert!(session
            .form()
            .social_inputs
            .iter()
            .any(|input| input.index == 1 && input.value == "youtube"));
    }

    #[test]
    fn drag_from_two_to_zero() {
        let mut session = session();
        session.drag_start(2);
        assert!(session.drop_on(0).unwrap());
        assert_eq!(ids(&session), vec!["C", "A", "B", "D", "E"]);
        assert!(session.text_view().find("\"C\"") < session.text_view().find("\"A\""));
        assert!(!session.drop_on(3).unwrap());
    }

    #[test]
    fn removal_clears_drag_in_flight() {
        let mut session = session();
        session.drag_start(2);
        assert!(session.remove_item(0, &mut yes).unwrap());
        assert_eq!(session.drag().source(), None);
        assert!(!session.drop_on(0).unwrap());
        assert_eq!(ids(&session), vec!["B", "C", "D", "E"]);

        session.drag_start(1);
        assert!(session.move_item(2, Direction::Up).unwrap());
        assert!(!session.drop_on(0).unwrap());
        session.drag_start(1);
        session.add_item().unwrap();
        assert!(!session.drop_on(0).unwrap());
    }

    #[test]
    fn text_save_clears_drag() {
        let mut session = session();
        session.drag_start(3);
        session.switch_view(View::Json).unwrap();
        session.save().unwrap();
        assert!(!session.drop_on(0).unwrap());
        assert_eq!(ids(&session), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn boundary_moves_change_nothing() {
        let mut session = session();
        let before = session.text_view().to_string();
        assert!(!session.move_item(0, Direction::Up).unwrap());
        assert!(!session.move_item(4, Direction::Down).unwrap());
        assert_eq!(ids(&session), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(session.text_view(), before);
    }

    #[test]
    fn remove_item_needs_confirmation() {
        let mut session = session();
        assert!(!session.remove_item(1, &mut no).unwrap());
        assert!(!session.remove_item(9, &mut yes).unwrap());
        assert!(session.remove_item(1, &mut yes).unwrap());
        assert_eq!(ids(&session), vec!["A", "C", "D", "E"]);
    }

    #[test]
    fn added_item_has_content_for_each_language() {
        let mut session = session();
        let id = session.add_item().unwrap();
        let item = session.document().portfolio.last().unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.content.keys().collect::<Vec<_>>(), vec!["ko", "en"]);
        assert!(!item.featured);
        assert!(!item.created_at.is_empty());
        assert!(session.document().portfolio[..5].iter().all(|other| other.id != id));
    }

    #[test]
    fn editor_commit_edit_keeps_identity() {
        let mut session = session();
        session.open_editor(Some(0)).unwrap();
        let tags = ItemField::Content { lang: "ko".into(), field: ContentField::Tags };
        session.set_item_field(&tags, "a, b ,, c".into()).unwrap();
        assert!(session.switch_tab(TabContext::ItemEditor, "en"));
        assert_eq!(session.commit_editor().unwrap(), 0);
        let item = &session.document().portfolio[0];
        assert_eq!(item.id, "A");
        assert_eq!(item.social_card.title, "card");
        assert_eq!(item.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(item.content["ko"].tags, vec!["a", "b", "c"]);
        assert!(session.editor().is_none());
        assert!(matches!(session.commit_editor(), Err(FolioError::EditorClosed)));
    }

    #[test]
    fn editor_commit_follows_item_after_list_changes() {
        let mut session = session();
        session.open_editor(Some(2)).unwrap();
        let title = ItemField::Content { lang: "ko".into(), field: ContentField::Title };
        session.set_item_field(&title, "다-수정".into()).unwrap();
        assert!(session.remove_item(0, &mut yes).unwrap());
        assert!(session.move_item(1, Direction::Up).unwrap());
        assert_eq!(session.commit_editor().unwrap(), 0);
        let titles: Vec<(&str, &str)> = session
            .document()
            .portfolio
            .iter()
            .map(|item| (item.id.as_str(), item.content["ko"].title.as_str()))
            .collect();
        assert_eq!(
            titles,
            vec![("C", "다-수정"), ("B", "나"), ("D", "라"), ("E", "마")]
        );
    }

    #[test]
    fn editor_commit_fails_when_item_was_removed() {
        let mut session = session();
        session.open_editor(Some(1)).unwrap();
        assert!(session.remove_item(1, &mut yes).unwrap());
        let before = session.document().clone();
        assert!(matches!(session.commit_editor(), Err(FolioError::ItemRemoved(id)) if id == "B"));
        assert_eq!(session.document(), &before);
        assert!(session.editor().is_some());
    }

    #[test]
    fn translations_only_language_can_be_removed() {
        let mut session = session();
        let mut document = session.document().clone();
        document.settings.translations.insert("fr".into(), Default::default());
        session.edit_text_view(serde_json::to_string(&document).unwrap());
        session.parse_text_view().unwrap();
        assert!(session.remove_language("fr", &mut yes).unwrap());
        assert!(!session.document().settings.translations.contains_key("fr"));
        assert!(!session.remove_language("fr", &mut yes).unwrap());
    }

    #[test]
    fn editor_cancel_leaves_document_alone() {
        let mut session = session();
        let before = session.document().clone();
        session.open_editor(None).unwrap();
        let title = ItemField::Content { lang: "ko".into(), field: ContentField::Title };
        session.set_item_field(&title, "새 항목".into()).unwrap();
        session.cancel_editor();
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn editor_create_appends() {
        let mut session = session();
        session.open_editor(None).unwrap();
        let title = ItemField::Content { lang: "en".into(), field: ContentField::Title };
        session.set_item_field(&title, "  New  ".into()).unwrap();
        assert_eq!(session.commit_editor().unwrap(), 5);
        let item = &session.document().portfolio[5];
        assert_eq!(item.content["en"].title, "New");
        assert_eq!(item.content["ko"].title, "");
        assert!(session.open_editor(Some(42)).is_err());
    }

    #[test]
    fn remove_language_rerenders_settings_tabs() {
        let mut session = session();
        session.add_language("fr").unwrap();
        assert_eq!(session.form().meta_tabs.panels.len(), 3);
        assert!(session.switch_tab(TabContext::Meta, "fr"));
        assert!(!session.remove_language("fr", &mut no).unwrap());
        assert!(session.remove_language("fr", &mut yes).unwrap());
        assert_eq!(session.form().meta_tabs.active_language(), Some("ko"));
        assert_eq!(session.form().translation_tabs.panels.len(), 2);
        assert!(session.document().portfolio[0].content.contains_key("fr"));
        assert!(!session.document().settings.meta.contains_key("fr"));
        assert!(!session.text_view().contains("\"fr\": {}"));
    }

    #[test]
    fn json_view_is_regenerated_on_switch_but_not_parsed_back() {
        let mut session = session();
        session.add_social_link().unwrap();
        session.switch_view(View::Json).unwrap();
        assert!(session.text_view().contains("new-platform"));
        session.edit_text_view("{ broken".to_string());
        session.switch_view(View::Settings).unwrap();
        assert_eq!(session.document().settings.social_links.len(), 4);
    }

    #[test]
    fn failed_text_save_leaves_working_copy() {
        let mut session = session();
        session.switch_view(View::Json).unwrap();
        let before = session.document().clone();
        session.edit_text_view("{ \"settings\": ".to_string());
        assert!(matches!(session.save(), Err(FolioError::Parse { .. })));
        session.edit_text_view(r#"{"settings":{}}"#.to_string());
        assert!(matches!(session.save(), Err(FolioError::MissingSection("portfolio"))));
        assert_eq!(session.document(), &before);
        assert!(session.last_export().is_none());
    }

    #[test]
    fn text_save_replaces_document_and_form() {
        let mut session = session();
        session.switch_view(View::Json).unwrap();
        session.edit_text_view(
            r#"{"settings":{"email":"new@example.com","meta":{"ja":{}}},"portfolio":[]}"#.to_string(),
        );
        let file = session.save().unwrap();
        assert_eq!(file.file_name, "portfolio.json");
        assert_eq!(session.document().settings.email, "new@example.com");
        assert_eq!(session.form().email, "new@example.com");
        assert_eq!(session.form().meta_tabs.active_language(), Some("ja"));
    }

    #[test]
    fn form_save_collects_fields() {
        let mut session = session();
        let field = FormField::Meta { lang: "en".into(), field: MetaField::Title };
        session
            .dispatch(Action::SetField { field, value: "Renamed".into() }, &mut yes)
            .unwrap();
        let field = FormField::Social { index: 0, field: SocialField::Url };
        session
            .dispatch(Action::SetField { field, value: String::new() }, &mut yes)
            .unwrap();
        session.save().unwrap();
        assert_eq!(session.document().settings.meta["en"].title, "Renamed");
        assert_eq!(session.document().settings.social_links.len(), 2);
        let exported = String::from_utf8(session.last_export().unwrap().bytes.clone()).unwrap();
        assert!(exported.contains("Renamed"));
    }

    #[test]
    fn text_view_round_trip_is_faithful() {
        let mut session = session();
        let before = session.document().clone();
        session.parse_text_view().unwrap();
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn dispatch_maps_actions() {
        let mut session = session();
        let action: Action =
            serde_json::from_str(r#"{"action":"moveItem","index":1,"direction":-1}"#).unwrap();
        assert_eq!(session.dispatch(action, &mut Preconfirmed(false)).unwrap(), Outcome::Applied);
        assert_eq!(ids(&session), vec!["B", "A", "C", "D", "E"]);

        let action: Action = serde_json::from_str(r#"{"action":"removeItem","index":0}"#).unwrap();
        assert_eq!(session.dispatch(action, &mut Preconfirmed(false)).unwrap(), Outcome::Declined);

        let action: Action =
            serde_json::from_str(r#"{"action":"moveItem","index":1,"direction":2}"#).unwrap();
        assert!(matches!(
            session.dispatch(action, &mut Preconfirmed(true)),
            Err(FolioError::InvalidDirection(2))
        ));

        let action: Action = serde_json::from_str(
            r#"{"action":"setField","field":{"kind":"translation","lang":"en","key":"readMore"},"value":"More"}"#,
        )
        .unwrap();
        session.dispatch(action, &mut Preconfirmed(true)).unwrap();
        session.dispatch(Action::Save, &mut Preconfirmed(true)).unwrap();
        assert_eq!(session.document().settings.translations["en"]["readMore"], "More");
    }

    #[test]
    fn validate_reports_without_touching_document() {
        let mut session = session();
        session.edit_text_view("nope".to_string());
        match session.dispatch(Action::ValidateJson, &mut Preconfirmed(true)).unwrap() {
            Outcome::Validation { valid, message } => {
                assert!(!valid);
                assert!(message.starts_with("✗"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(session.format_json().is_err());
        session.edit_text_view("{\"a\":1}".to_string());
        session.format_json().unwrap();
        assert_eq!(session.text_view(), "{\n  \"a\": 1\n}");
    }
}
