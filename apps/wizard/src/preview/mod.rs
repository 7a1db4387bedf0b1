// Editable résumé preview: key-path addressing, rendering, edit capture and the
// contact separator rule. The rendered tree is a read-only projection; edits are
// held in an EditableView and written back to the document by `sync`.

pub mod keypath;
pub mod render;
pub mod sync;
pub mod visibility;

use crate::models::resume::ResumeDocument;

pub use keypath::KeyPath;
pub use render::{render, PreviewTree};
pub use sync::{sync, EditableView, SyncReport};

/// A rendered preview together with its live edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    tree: PreviewTree,
    view: EditableView,
}

impl Preview {
    pub fn render(document: Option<&ResumeDocument>) -> Self {
        let tree = render(document);
        let view = EditableView::from_tree(&tree);
        Self { tree, view }
    }

    pub fn tree(&self) -> &PreviewTree {
        &self.tree
    }

    pub fn view(&self) -> &EditableView {
        &self.view
    }

    pub fn edit(&mut self, path: &KeyPath, text: impl Into<String>) -> bool {
        self.view.edit(path, text)
    }

    /// HTML of the preview as currently displayed, edits included.
    pub fn to_html(&self) -> String {
        self.tree.html_with(Some(&self.view))
    }
}
