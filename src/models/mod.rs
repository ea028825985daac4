use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use strum::Display;
use validator::Validate;

// ============================================================================
// Tag Models
// ============================================================================

/// Severity of a single observation, ordered from compliant to harmful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TagStatus {
    Good,
    Warning,
    Error,
    Info,
}

impl TagStatus {
    /// Errors and warnings count towards `issuesCount`.
    pub fn is_issue(self) -> bool {
        matches!(self, TagStatus::Error | TagStatus::Warning)
    }
}

/// Which attribute identifies the inspected tag. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKey {
    /// `<meta name="...">`, also used for `title`, `charset` and `language`.
    Name(String),
    /// `<meta property="...">`
    Property(String),
    /// `<link rel="...">`, whose value lives in `href`.
    Rel(String),
}

impl TagKey {
    pub fn name(key: &str) -> Self {
        TagKey::Name(key.to_string())
    }

    pub fn property(key: &str) -> Self {
        TagKey::Property(key.to_string())
    }

    pub fn rel(key: &str) -> Self {
        TagKey::Rel(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            TagKey::Name(k) | TagKey::Property(k) | TagKey::Rel(k) => k,
        }
    }

    fn attribute(&self) -> &'static str {
        match self {
            TagKey::Name(_) => "name",
            TagKey::Property(_) => "property",
            TagKey::Rel(_) => "rel",
        }
    }

    fn value_field(&self) -> &'static str {
        match self {
            TagKey::Rel(_) => "href",
            _ => "content",
        }
    }
}

/// One inspected tag with its computed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTagObservation {
    pub key: TagKey,
    pub content: Option<String>,
    pub status: TagStatus,
    pub message: Option<String>,
}

impl MetaTagObservation {
    pub fn new(key: TagKey, content: Option<String>, status: TagStatus) -> Self {
        Self {
            key,
            content: content.filter(|c| !c.is_empty()),
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn missing(&self) -> bool {
        self.content.is_none()
    }
}

/// Serializes as `{name|property|rel, content|href, status, missing, message}`
/// so link tags carry `href` instead of `content`.
impl Serialize for MetaTagObservation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.key.attribute(), self.key.as_str())?;
        if let Some(content) = &self.content {
            map.serialize_entry(self.key.value_field(), content)?;
        }
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("missing", &self.missing())?;
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

// ============================================================================
// Report Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The complete result of analysing one page.
///
/// The `og_*`, `twitter_*`, `meta_*` and `page_title` fields are copies of
/// values already present in the tag groups, kept for preview rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    pub seo_score: u8,
    pub meta_tags_count: usize,
    pub issues_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
    pub basic_meta_tags: Vec<MetaTagObservation>,
    pub social_meta_tags: Vec<MetaTagObservation>,
    pub technical_meta_tags: Vec<MetaTagObservation>,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    /// All observations in group order: basic, social, technical.
    pub fn all_tags(&self) -> impl Iterator<Item = &MetaTagObservation> {
        self.basic_meta_tags
            .iter()
            .chain(&self.social_meta_tags)
            .chain(&self.technical_meta_tags)
    }

    /// Look up an observation by its key string, e.g. `"og:image"`.
    pub fn tag(&self, key: &str) -> Option<&MetaTagObservation> {
        self.all_tags().find(|t| t.key.as_str() == key)
    }
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 2048, message = "Please enter a valid website address"))]
    pub url: String,
}
