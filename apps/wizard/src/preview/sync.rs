//! Edit capture: the registry of editable fields and the write-back into the document.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::resume::{display_text, ResumeDocument};
use crate::preview::keypath::KeyPath;
use crate::preview::render::PreviewTree;
use crate::preview::visibility::{email_path, is_contact_path, phone_path, separator_visible};

#[derive(Debug, Clone, PartialEq)]
pub struct EditableField {
    pub path: KeyPath,
    /// Text shown when the preview was rendered.
    pub rendered: String,
    /// Text currently displayed, the source of truth until the next sync.
    pub current: String,
}

impl EditableField {
    pub fn is_edited(&self) -> bool {
        self.current != self.rendered
    }
}

/// Editable fields of one rendered preview, keyed by key-path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableView {
    fields: BTreeMap<KeyPath, EditableField>,
    /// `None` when the preview has no separator (error notice).
    separator: Option<bool>,
}

impl EditableView {
    pub fn from_tree(tree: &PreviewTree) -> Self {
        let fields = tree
            .editable_nodes()
            .into_iter()
            .filter_map(|node| {
                let path = node.key.clone()?;
                let text = node.text_content();
                Some((
                    path.clone(),
                    EditableField {
                        path,
                        rendered: text.clone(),
                        current: text,
                    },
                ))
            })
            .collect();

        Self {
            fields,
            separator: tree.separator().map(|separator| !separator.hidden),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &EditableField> {
        self.fields.values()
    }

    pub fn text(&self, path: &KeyPath) -> Option<&str> {
        self.fields.get(path).map(|field| field.current.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(EditableField::is_edited)
    }

    /// Replaces the displayed text of an editable field.
    /// Returns false when no editable field has this path.
    pub fn edit(&mut self, path: &KeyPath, text: impl Into<String>) -> bool {
        let Some(field) = self.fields.get_mut(path) else {
            debug!("Ignoring edit to non-editable path {path}");
            return false;
        };
        field.current = text.into();

        if is_contact_path(path) {
            self.refresh_separator();
        }
        true
    }

    pub fn separator_visible(&self) -> bool {
        self.separator.unwrap_or(false)
    }

    fn refresh_separator(&mut self) {
        if self.separator.is_some() {
            let visible = separator_visible(self.text(&email_path()), self.text(&phone_path()));
            self.separator = Some(visible);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub applied: usize,
    pub unchanged: usize,
    /// Edited paths that no longer resolve against the document. Their edits are dropped.
    pub skipped: Vec<KeyPath>,
}

/// Writes displayed text back into the document as strings.
///
/// The displayed text is compared against the document's current value, so a
/// field reverted after an earlier sync is written again. Fields that already
/// match are left alone, and a field with no value in the document (the name
/// placeholder) is only written once its text has been edited. Syncing an
/// untouched preview, or syncing twice, changes nothing.
pub fn sync(document: &mut ResumeDocument, view: &EditableView) -> SyncReport {
    let mut report = SyncReport::default();

    for field in view.fields() {
        match field.path.resolve(document.as_value_mut()) {
            Ok(slot) => {
                let stored = slot.get().filter(|value| !value.is_null()).map(display_text);
                let unchanged = match stored {
                    Some(text) => text == field.current,
                    None => !field.is_edited(),
                };
                if unchanged {
                    report.unchanged += 1;
                } else {
                    slot.set(Value::String(field.current.clone()));
                    report.applied += 1;
                }
            }
            Err(err) if field.is_edited() => {
                warn!("Dropping edit to {}: {err}", field.path);
                report.skipped.push(field.path.clone());
            }
            Err(_) => report.unchanged += 1,
        }
    }

    debug!(
        applied = report.applied,
        unchanged = report.unchanged,
        skipped = report.skipped.len(),
        "Synchronized preview edits"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::render::render;
    use serde_json::json;

    fn sample() -> ResumeDocument {
        ResumeDocument::new(json!({
            "designation_line": "Platform Engineer",
            "contact_info": {"email": "a@x.com", "phone": "555-0100"},
            "sections": [
                {"title": "Summary", "content": "Builds reliable systems."},
                {"title": "Skills", "content": ["Rust", 2024, true]},
                {"title": "Experience", "content": [
                    {"job_title": "SRE", "company_and_date": "Acme | 2020", "duties": ["on-call"]}
                ]},
                {"title": "Notes"}
            ],
            "generated_by": "backend"
        }))
    }

    fn view_of(document: &ResumeDocument) -> EditableView {
        EditableView::from_tree(&render(Some(document)))
    }

    fn path(s: &str) -> KeyPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_render_then_sync_without_edits_is_identity() {
        let original = sample();
        let mut document = original.clone();
        let view = view_of(&document);

        let report = sync(&mut document, &view);
        assert_eq!(document, original);
        assert_eq!(report.applied, 0);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_sync_twice_equals_sync_once() {
        let mut document = sample();
        let mut view = view_of(&document);
        view.edit(&path("sections[1].content[1]"), "2025");

        sync(&mut document, &view);
        let once = document.clone();
        let second = sync(&mut document, &view);

        assert_eq!(document, once);
        assert_eq!(second.applied, 0);
    }

    #[test]
    fn test_edited_name_is_written_back() {
        let mut document = ResumeDocument::new(json!({"candidate_name": "A"}));
        let mut view = view_of(&document);
        assert!(view.edit(&path("candidate_name"), "B"));

        let report = sync(&mut document, &view);
        assert_eq!(report.applied, 1);
        assert_eq!(document.as_value()["candidate_name"], json!("B"));
    }

    #[test]
    fn test_reverted_edit_is_written_on_next_sync() {
        let mut document = ResumeDocument::new(json!({"candidate_name": "A"}));
        let mut view = view_of(&document);

        view.edit(&path("candidate_name"), "B");
        sync(&mut document, &view);
        assert_eq!(document.as_value()["candidate_name"], json!("B"));

        view.edit(&path("candidate_name"), "A");
        let report = sync(&mut document, &view);
        assert_eq!(report.applied, 1);
        assert_eq!(document.as_value()["candidate_name"], json!("A"));
    }

    #[test]
    fn test_placeholder_name_written_only_when_edited() {
        let original = ResumeDocument::new(json!({"sections": []}));
        let mut document = original.clone();
        let mut view = view_of(&document);

        sync(&mut document, &view);
        assert_eq!(document, original);

        view.edit(&path("candidate_name"), "Jane Doe");
        sync(&mut document, &view);
        assert_eq!(document.as_value()["candidate_name"], json!("Jane Doe"));
    }

    #[test]
    fn test_numeric_leaf_becomes_string_when_edited() {
        let mut document = sample();
        let mut view = view_of(&document);
        view.edit(&path("sections[1].content[1]"), "2025");

        sync(&mut document, &view);
        assert_eq!(
            document.as_value()["sections"][1]["content"][1],
            json!("2025")
        );
        assert_eq!(document.as_value()["sections"][1]["content"][2], json!(true));
    }

    #[test]
    fn test_unresolvable_edit_is_skipped() {
        let mut document = sample();
        let mut view = view_of(&document);
        view.edit(&path("sections[0].content"), "Rewritten summary");
        view.edit(&path("candidate_name"), "Z");

        document.as_value_mut()["sections"] = json!([]);
        let report = sync(&mut document, &view);

        assert_eq!(report.skipped, vec![path("sections[0].content")]);
        assert_eq!(report.applied, 1);
        assert_eq!(document.as_value()["candidate_name"], json!("Z"));
        assert_eq!(document.as_value()["sections"], json!([]));
    }

    #[test]
    fn test_edit_to_unknown_path_is_rejected() {
        let document = sample();
        let mut view = view_of(&document);
        assert!(!view.edit(&path("sections[2].content[0].job_title"), "CTO"));
        assert!(!view.is_dirty());
    }

    #[test]
    fn test_separator_follows_contact_edits() {
        let document = sample();
        let mut view = view_of(&document);
        let email = email_path();
        let phone = phone_path();

        assert!(view.separator_visible());

        view.edit(&email, "   ");
        assert!(!view.separator_visible());

        view.edit(&phone, "");
        assert!(!view.separator_visible());

        view.edit(&email, "b@y.com");
        assert!(!view.separator_visible());

        view.edit(&phone, "555");
        assert!(view.separator_visible());
    }

    #[test]
    fn test_separator_stays_hidden_without_phone() {
        let document = ResumeDocument::new(json!({"contact_info": {"email": "a@x.com"}}));
        let mut view = view_of(&document);
        assert!(!view.separator_visible());

        view.edit(&email_path(), "c@z.com");
        assert!(!view.separator_visible());
    }

    #[test]
    fn test_error_notice_has_no_fields() {
        let view = EditableView::from_tree(&render(None));
        assert!(view.is_empty());
        assert!(!view.separator_visible());
    }
}
