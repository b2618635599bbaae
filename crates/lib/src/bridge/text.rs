//! Collaborative text values.

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error as DeError, Visitor},
};
use std::fmt;

use super::{TEXT_NEWTYPE, TextBinding, channel, diff};

/// A text value backed by a collaborative text object.
///
/// Encoding a `Text` never replaces the document's text node once it exists:
/// the bridge computes a minimal insert/remove diff against the current
/// content and applies only that splice, so concurrent edits merge instead
/// of being clobbered.
///
/// Decoding produces a *bound* `Text`: mutating methods write through to the
/// underlying text object immediately. All positions are char offsets.
#[derive(Debug, Clone, Default)]
pub struct Text {
    value: String,
    binding: Option<TextBinding>,
}

impl Text {
    /// Creates an unbound text value.
    pub fn new(value: impl Into<String>) -> Self {
        Text {
            value: value.into(),
            binding: None,
        }
    }

    /// Returns the last known content.
    ///
    /// For a bound text this reflects local edits; edits merged in from
    /// other collaborators become visible after [`refresh`](Text::refresh).
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the content length in chars.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Returns `true` if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns `true` if this text is a live reference into a document.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Deletes `delete` chars at `pos`, then inserts `insert` there. A bound
    /// text writes the splice through to its document immediately.
    ///
    /// # Panics
    /// Panics if `pos + delete` is past the end of the content.
    pub fn splice(&mut self, pos: usize, delete: usize, insert: &str) -> crate::Result<()> {
        let chars: Vec<char> = self.value.chars().collect();
        assert!(
            pos + delete <= chars.len(),
            "splice range {}..{} out of bounds for text of length {}",
            pos,
            pos + delete,
            chars.len()
        );
        if let Some(binding) = &self.binding {
            binding.doc.splice_text(&binding.obj, pos, delete, insert)?;
        }
        let mut updated: String = chars[..pos].iter().collect();
        updated.push_str(insert);
        updated.extend(&chars[pos + delete..]);
        self.value = updated;
        Ok(())
    }

    /// Appends `text` at the end.
    pub fn push_str(&mut self, text: &str) -> crate::Result<()> {
        self.splice(self.len(), 0, text)
    }

    /// Replaces the whole content, applying the change as one minimal
    /// splice when bound.
    pub fn set(&mut self, new: impl Into<String>) -> crate::Result<()> {
        let new = new.into();
        if let Some(binding) = &self.binding
            && let Some(splice) = diff::splice_for(&self.value, &new)
        {
            binding
                .doc
                .splice_text(&binding.obj, splice.pos, splice.delete, &splice.insert)?;
        }
        self.value = new;
        Ok(())
    }

    /// Re-reads the content from the document, when bound.
    pub fn refresh(&mut self) -> crate::Result<&str> {
        if let Some(binding) = &self.binding {
            self.value = binding.doc.text(&binding.obj)?;
        }
        Ok(&self.value)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::new(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::new(value)
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Text {}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(TEXT_NEWTYPE, &self.value)
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Text;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a text value")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Text, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Text {
            value,
            binding: channel::take_text_binding(),
        })
    }

    fn visit_str<E>(self, value: &str) -> Result<Text, E>
    where
        E: DeError,
    {
        self.visit_string(value.to_string())
    }

    fn visit_string<E>(self, value: String) -> Result<Text, E>
    where
        E: DeError,
    {
        Ok(Text {
            value,
            binding: channel::take_text_binding(),
        })
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(TEXT_NEWTYPE, TextVisitor)
    }
}
