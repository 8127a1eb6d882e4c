//! Platform-agnostic integration item descriptor.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Uniform descriptor for a remote record (contact, company, page,
/// database, base, table).
///
/// Every platform normalizer maps its native records into this shape.
/// All fields have documented defaults so normalization is total: a
/// record with nothing but an `id` still produces a valid item.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct IntegrationItem {
    /// Platform-native identifier.
    pub id: String,

    /// Category tag, e.g. `contact`, `company`, `page`, `database`.
    #[serde(rename = "type")]
    pub item_type: String,

    /// Human-readable display name with a per-platform synthetic
    /// fallback (`Contact {id}`, `Untitled`, ...).
    pub name: String,

    /// Whether the item behaves as a container (database, base).
    pub directory: bool,

    /// Identifier of the containing item, if the record declares a
    /// non-top-level parent. Lookup-only, never an ownership edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Label of the parent's type or path, paired with `parent_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path_or_name: Option<String>,

    /// Source-platform creation timestamp; `None` when the platform
    /// omits it or the value does not parse as RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<Timestamp>,

    /// Source-platform last-modified timestamp; same rules as
    /// `creation_time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<Timestamp>,

    /// Descriptive URL slot. Platform-dependent: HubSpot reuses it for
    /// the contact email / company domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// MIME type, when the platform exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// `true` when the item is active, `false` when archived. Each
    /// normalizer documents its mapping rule.
    pub visibility: bool,
}

impl IntegrationItem {
    /// Creates an item with the required fields; optional fields start
    /// empty and `visibility` defaults to active.
    pub fn new(id: impl Into<String>, item_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            name: name.into(),
            directory: false,
            parent_id: None,
            parent_path_or_name: None,
            creation_time: None,
            last_modified_time: None,
            url: None,
            mime_type: None,
            visibility: true,
        }
    }

    /// Marks the item as a container.
    pub fn with_directory(mut self, directory: bool) -> Self {
        self.directory = directory;
        self
    }

    /// Attaches a parent back-reference.
    pub fn with_parent(
        mut self,
        parent_id: impl Into<String>,
        parent_path_or_name: impl Into<String>,
    ) -> Self {
        self.parent_id = Some(parent_id.into());
        self.parent_path_or_name = Some(parent_path_or_name.into());
        self
    }

    /// Sets the creation and last-modified timestamps, parsed from
    /// RFC 3339 strings. Unparsable values normalize to `None`.
    pub fn with_timestamps(mut self, created: Option<&str>, modified: Option<&str>) -> Self {
        self.creation_time = created.and_then(parse_timestamp);
        self.last_modified_time = modified.and_then(parse_timestamp);
        self
    }

    /// Fills the descriptive URL slot.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the archived/active flag.
    pub fn with_visibility(mut self, visibility: bool) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Parses a source-platform timestamp, tolerating missing offsets.
fn parse_timestamp(value: &str) -> Option<Timestamp> {
    value.parse::<Timestamp>().ok()
}
