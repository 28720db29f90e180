//! Paper data model matching the Semantic Scholar `/paper/search` schema.
//!
//! Upstream records are loosely typed: any field may be missing, `null`, or
//! of the wrong type. A mistyped field decodes to "absent" and the rest of
//! the record is kept; only an entry that is not an object is malformed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A research paper from Semantic Scholar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Unique Semantic Scholar paper ID.
    #[serde(default, deserialize_with = "lenient")]
    pub paper_id: Option<String>,

    /// Semantic Scholar landing page.
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,

    /// Paper title.
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// Paper abstract.
    #[serde(default, deserialize_with = "lenient")]
    pub r#abstract: Option<String>,

    /// List of authors. Anything other than a list decodes as empty.
    #[serde(default, deserialize_with = "lenient_authors")]
    pub authors: Vec<AuthorRef>,

    /// Publication year.
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<i32>,

    /// Whether this paper is open access.
    #[serde(default, deserialize_with = "lenient")]
    pub is_open_access: Option<bool>,

    /// Open access PDF information.
    #[serde(default, deserialize_with = "lenient")]
    pub open_access_pdf: Option<OpenAccessPdf>,

    /// Direct PDF link derived from `open_access_pdf`. Set by [`Paper::normalize`].
    #[serde(default, skip_deserializing)]
    pub pdf_url: Option<String>,
}

impl Paper {
    /// Derive `pdf_url` from the nested open access PDF URL.
    ///
    /// Empty URLs count as absent.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.pdf_url = self
            .open_access_pdf
            .as_ref()
            .and_then(|pdf| pdf.url.as_deref())
            .filter(|url| !url.is_empty())
            .map(str::to_owned);
        self
    }

    /// Whether a downloadable PDF link is known for this paper.
    #[must_use]
    pub fn has_pdf(&self) -> bool {
        self.pdf_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Author names in order, skipping entries without a non-empty name.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Author reference embedded in a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Open access PDF information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccessPdf {
    /// Direct URL to the PDF.
    #[serde(default)]
    pub url: Option<String>,

    /// Status of open access.
    #[serde(default)]
    pub status: Option<String>,
}

/// One entry of the upstream `data` list after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PaperRecord {
    /// Decoded paper with `pdf_url` derived.
    Paper(Paper),

    /// Entry that is not a JSON object.
    Malformed {
        /// Why the entry was rejected.
        reason: String,
    },
}

impl PaperRecord {
    /// Decode and normalize a raw upstream entry.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::Malformed { reason: format!("expected an object, got {value}") };
        }

        match serde_json::from_value::<Paper>(value) {
            Ok(paper) => Self::Paper(paper.normalize()),
            Err(e) => Self::Malformed { reason: e.to_string() },
        }
    }

    /// The decoded paper, if any.
    #[must_use]
    pub const fn paper(&self) -> Option<&Paper> {
        match self {
            Self::Paper(paper) => Some(paper),
            Self::Malformed { .. } => None,
        }
    }
}

impl From<Paper> for PaperRecord {
    fn from(paper: Paper) -> Self {
        Self::Paper(paper.normalize())
    }
}

/// Search response wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    /// Total matches reported upstream.
    #[serde(default)]
    pub total: Option<i64>,

    /// Raw result entries. Missing or `null` means no results.
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

impl SearchResult {
    /// Decode every entry into a [`PaperRecord`].
    #[must_use]
    pub fn into_records(self) -> Vec<PaperRecord> {
        self.data.unwrap_or_default().into_iter().map(PaperRecord::from_value).collect()
    }
}

/// Paper fields exposed to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialPaper {
    /// Paper title.
    pub title: Option<String>,

    /// Paper abstract.
    pub r#abstract: Option<String>,

    /// Publication year.
    pub year: Option<i32>,

    /// Author names in upstream order.
    pub authors: Vec<String>,

    /// Direct PDF link.
    pub pdf_url: Option<String>,
}

impl From<&Paper> for EssentialPaper {
    fn from(paper: &Paper) -> Self {
        Self {
            title: paper.title.clone(),
            r#abstract: paper.r#abstract.clone(),
            year: paper.year,
            authors: paper.author_names(),
            pdf_url: paper.pdf_url.clone(),
        }
    }
}

/// Decode `T`, treating any shape mismatch as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_authors<'de, D>(deserializer: D) -> Result<Vec<AuthorRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .map(|entry| AuthorRef {
            author_id: entry.get("authorId").and_then(Value::as_str).map(str::to_owned),
            name: entry.get("name").and_then(Value::as_str).map(str::to_owned),
        })
        .collect())
}
