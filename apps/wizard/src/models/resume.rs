use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PLACEHOLDER_NAME: &str = "Candidate Name";

/// The résumé document returned by the backend.
///
/// Kept as the raw JSON object so fields this client does not know about survive
/// the round trip back to the download endpoint. Typed accessors below expose the
/// parts the preview understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeDocument(Value);

/// A section that passed the render filter (title and content both present).
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    pub index: usize,
    pub title: &'a str,
    pub content: SectionContent<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum SectionContent<'a> {
    /// Array whose first element is an object (experience, projects, ...).
    Entries(&'a [Value]),
    /// Array of scalars, one bullet per item.
    Items(&'a [Value]),
    /// A single paragraph.
    Text(&'a Value),
}

impl ResumeDocument {
    pub fn new(root: Value) -> Self {
        Self(root)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn candidate_name(&self) -> String {
        match self.0.get("candidate_name") {
            None | Some(Value::Null) => PLACEHOLDER_NAME.to_string(),
            Some(value) => display_text(value),
        }
    }

    pub fn designation_line(&self) -> Option<String> {
        self.0
            .get("designation_line")
            .map(display_text)
            .filter(|s| !s.is_empty())
    }

    /// A contact field (`email`, `phone`) if it has displayable text.
    pub fn contact(&self, field: &str) -> Option<String> {
        self.0
            .get("contact_info")
            .and_then(|info| info.get(field))
            .map(display_text)
            .filter(|s| !s.is_empty())
    }

    /// Sections with both a title and content, keeping their original indices.
    pub fn sections(&self) -> impl Iterator<Item = SectionView<'_>> {
        self.0
            .get("sections")
            .and_then(Value::as_array)
            .map(|sections| sections.as_slice())
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(index, section)| {
                let title = section.get("title")?.as_str().filter(|t| !t.is_empty())?;
                let content = section.get("content").filter(|c| is_truthy(c))?;
                Some(SectionView {
                    index,
                    title,
                    content: SectionContent::classify(content),
                })
            })
    }
}

impl<'a> SectionContent<'a> {
    fn classify(content: &'a Value) -> Self {
        match content {
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                SectionContent::Entries(items)
            }
            Value::Array(items) => SectionContent::Items(items),
            other => SectionContent::Text(other),
        }
    }
}

/// Text shown for a leaf value. Strings are shown verbatim, `null` as empty,
/// anything else in its JSON form.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
