use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one declared indicator field.
///
/// Each log-source family owns a contiguous block of ids starting at its base
/// offset, so families never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl FieldId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The `n`th id of the family starting at `self`.
    pub const fn offset(self, n: u32) -> Self {
        Self(self.0 + n)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Wire name, display name and description of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name_json: String,
    pub name: String,
    pub description: String,
}

impl FieldMeta {
    pub fn new(name_json: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name_json: name_json.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Name of the first missing attribute, if any.
    pub fn missing(&self) -> Option<&'static str> {
        if self.name_json.trim().is_empty() {
            Some("name_json")
        } else if self.name.trim().is_empty() {
            Some("name")
        } else if self.description.trim().is_empty() {
            Some("description")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_offsets() {
        const BASE: FieldId = FieldId::new(1000);
        assert_eq!(BASE.offset(0), FieldId(1000));
        assert_eq!(BASE.offset(3), FieldId(1003));
    }

    #[test]
    fn test_missing_metadata() {
        let full = FieldMeta::new("p_any_x", "AnyX", "x values");
        assert_eq!(full.missing(), None);

        let no_json = FieldMeta::new("", "X", "x");
        assert_eq!(no_json.missing(), Some("name_json"));

        let no_desc = FieldMeta::new("p_any_x", "X", "  ");
        assert_eq!(no_desc.missing(), Some("description"));
    }
}
