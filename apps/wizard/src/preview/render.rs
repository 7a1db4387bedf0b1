//! Résumé preview renderer: document → editable markup tree.
//!
//! Every editable leaf carries the key-path of the field it displays. Object
//! entries (jobs, projects, ...) are laid out read-only.

use serde_json::Value;

use crate::models::resume::{display_text, is_scalar, ResumeDocument, SectionContent, SectionView};
use crate::preview::keypath::KeyPath;
use crate::preview::sync::EditableView;
use crate::preview::visibility::{email_path, phone_path, separator_visible};

pub const SEPARATOR_CLASS: &str = "contact-separator";
pub const SEPARATOR_TEXT: &str = " | ";
pub const INVALID_DOCUMENT_NOTICE: &str = "Error: Invalid resume data received.";

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    /// Present on editable nodes only.
    pub key: Option<KeyPath>,
    /// Explicitly non-editable inside an editable region.
    pub locked: bool,
    pub hidden: bool,
    pub children: Vec<PreviewNode>,
}

impl Element {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            key: None,
            locked: false,
            hidden: false,
            children: Vec::new(),
        }
    }

    fn editable(tag: &'static str, key: KeyPath, text: String) -> Self {
        let mut element = Self::new(tag).text(text);
        element.key = Some(key);
        element
    }

    fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(PreviewNode::Text(text.into()));
        self
    }

    fn push(&mut self, child: Element) {
        self.children.push(PreviewNode::Element(child));
    }

    pub fn is_editable(&self) -> bool {
        self.key.is_some()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[PreviewNode], out: &mut String) {
    for node in nodes {
        match node {
            PreviewNode::Text(text) => out.push_str(text),
            PreviewNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// The rendered preview. Read-only once built; edits live in [`EditableView`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTree {
    root: Element,
}

impl PreviewTree {
    fn error_notice() -> Self {
        Self {
            root: Element::new("p")
                .class("preview-error")
                .text(INVALID_DOCUMENT_NOTICE),
        }
    }

    pub fn is_error_notice(&self) -> bool {
        self.root.class == Some("preview-error")
    }

    /// Editable elements in document order.
    pub fn editable_nodes(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        walk(&self.root, &mut |element| {
            if element.is_editable() {
                found.push(element);
            }
        });
        found
    }

    pub fn separator(&self) -> Option<&Element> {
        let mut found = None;
        walk(&self.root, &mut |element| {
            if found.is_none() && element.class == Some(SEPARATOR_CLASS) {
                found = Some(element);
            }
        });
        found
    }

    pub fn to_html(&self) -> String {
        self.html_with(None)
    }

    /// Serializes the tree, taking live text and separator visibility from `view` when given.
    pub(crate) fn html_with(&self, view: Option<&EditableView>) -> String {
        let mut out = String::new();
        write_element(&self.root, &mut out, view);
        out
    }
}

fn walk<'a>(element: &'a Element, visit: &mut impl FnMut(&'a Element)) {
    visit(element);
    for child in &element.children {
        if let PreviewNode::Element(child) = child {
            walk(child, visit);
        }
    }
}

fn write_element(element: &Element, out: &mut String, view: Option<&EditableView>) {
    out.push('<');
    out.push_str(element.tag);
    if let Some(class) = element.class {
        out.push_str(&format!(" class=\"{class}\""));
    }
    if let Some(key) = &element.key {
        out.push_str(&format!(
            " contenteditable=\"true\" data-key=\"{}\"",
            escape_html(&key.encode())
        ));
    } else if element.locked {
        out.push_str(" contenteditable=\"false\"");
    }
    let hidden = match (view, element.class) {
        (Some(view), Some(SEPARATOR_CLASS)) => !view.separator_visible(),
        _ => element.hidden,
    };
    if hidden {
        out.push_str(" style=\"display:none\"");
    }
    out.push('>');

    // void element
    if element.tag == "hr" {
        return;
    }

    let live_text = element
        .key
        .as_ref()
        .and_then(|key| view.and_then(|view| view.text(key)));
    match live_text {
        Some(text) => out.push_str(&escape_html(text)),
        None => {
            for child in &element.children {
                match child {
                    PreviewNode::Text(text) => out.push_str(&escape_html(text)),
                    PreviewNode::Element(child) => write_element(child, out, view),
                }
            }
        }
    }

    out.push_str(&format!("</{}>", element.tag));
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders a document into a preview tree.
///
/// A missing document, or one that is not a JSON object, renders as a single
/// error notice instead of failing.
pub fn render(document: Option<&ResumeDocument>) -> PreviewTree {
    let Some(document) = document.filter(|doc| doc.as_object().is_some()) else {
        return PreviewTree::error_notice();
    };

    let mut root = Element::new("div").class("resume-preview");
    root.push(render_header(document));
    root.push(Element::new("hr").class("preview-hr"));
    for section in document.sections() {
        root.push(render_section(&section));
    }

    PreviewTree { root }
}

fn render_header(document: &ResumeDocument) -> Element {
    let mut header = Element::new("div").class("preview-header");
    header.push(Element::editable(
        "h2",
        KeyPath::root("candidate_name"),
        document.candidate_name(),
    ));
    if let Some(designation) = document.designation_line() {
        header.push(
            Element::editable("p", KeyPath::root("designation_line"), designation)
                .class("designation"),
        );
    }
    header.push(render_contact(document));
    header
}

/// One span per non-empty contact field with the separator between the two slots.
/// The separator is always emitted so the visibility rule has a target; it starts
/// hidden unless both fields are present.
fn render_contact(document: &ResumeDocument) -> Element {
    let email = document.contact("email");
    let phone = document.contact("phone");

    let mut separator = Element::new("span")
        .class(SEPARATOR_CLASS)
        .text(SEPARATOR_TEXT);
    separator.locked = true;
    separator.hidden = !separator_visible(email.as_deref(), phone.as_deref());

    let mut contact = Element::new("p").class("contact-info");
    if let Some(email) = email {
        contact.push(Element::editable("span", email_path(), email));
    }
    contact.push(separator);
    if let Some(phone) = phone {
        contact.push(Element::editable("span", phone_path(), phone));
    }
    contact
}

fn render_section(section: &SectionView<'_>) -> Element {
    let mut block = Element::new("div").class("preview-section");
    block.push(Element::new("h3").text(section.title.to_uppercase()));

    let content_path = KeyPath::root("sections")
        .index(section.index)
        .field("content");

    match section.content {
        SectionContent::Entries(entries) => {
            let title = section.title.to_lowercase();
            let layout: fn(&Value) -> Element = if title.contains("experience") {
                render_job
            } else if title.contains("project") {
                render_project
            } else {
                render_generic_entry
            };
            for entry in entries {
                block.push(layout(entry));
            }
        }
        SectionContent::Items(items) => {
            let mut list = Element::new("ul");
            for (j, item) in items.iter().enumerate() {
                if is_scalar(item) {
                    list.push(Element::editable(
                        "li",
                        content_path.clone().index(j),
                        display_text(item),
                    ));
                } else {
                    list.push(Element::new("li").text(display_text(item)));
                }
            }
            block.push(list);
        }
        SectionContent::Text(value) if is_scalar(value) => {
            block.push(Element::editable("p", content_path, display_text(value)));
        }
        SectionContent::Text(value) => {
            block.push(Element::new("p").text(display_text(value)));
        }
    }

    block
}

fn field_text(entry: &Value, field: &str) -> Option<String> {
    entry
        .get(field)
        .map(display_text)
        .filter(|text| !text.is_empty())
}

fn render_job(entry: &Value) -> Element {
    let mut job = Element::new("div").class("preview-job");
    if let Some(title) = field_text(entry, "job_title") {
        job.push(Element::new("p").class("job-title").text(title));
    }
    if let Some(meta) = field_text(entry, "company_and_date") {
        job.push(Element::new("p").class("job-meta").text(meta));
    }
    if let Some(duties) = entry.get("duties").and_then(Value::as_array) {
        let mut list = Element::new("ul");
        for duty in duties {
            list.push(Element::new("li").text(display_text(duty)));
        }
        job.push(list);
    }
    job
}

fn render_project(entry: &Value) -> Element {
    let mut project = Element::new("div").class("preview-project");
    if let Some(name) = field_text(entry, "project_name") {
        project.push(Element::new("p").class("project-name").text(name));
    }
    if let Some(description) = field_text(entry, "description") {
        project.push(Element::new("p").text(description));
    }
    if let Some(stack) = field_text(entry, "tech_stack") {
        project.push(
            Element::new("p")
                .class("tech-stack")
                .text(format!("Tech Stack: {stack}")),
        );
    }
    project
}

fn render_generic_entry(entry: &Value) -> Element {
    let mut block = Element::new("div").class("preview-entry");
    let Some(fields) = entry.as_object() else {
        return block.text(display_text(entry));
    };
    for (name, value) in fields {
        let text = match value {
            Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(", "),
            other => display_text(other),
        };
        if !text.is_empty() {
            block.push(Element::new("p").text(format!("{}: {text}", humanize(name))));
        }
    }
    block
}

/// `start_date` → `Start date`.
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
