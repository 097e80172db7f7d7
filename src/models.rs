use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Book metadata as returned by `GET /book/{author}/{book}`.
///
/// The record is kept as received and re-serializes unchanged. Only the
/// download URLs under `urls.download` are read out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book(Value);

impl Default for Book {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Book {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    pub fn title(&self) -> Option<&Value> {
        self.0.get("title")
    }

    /// Download URL for `format`, if the API provided a non-empty string.
    pub fn download_url(&self, format: DownloadFormat) -> Option<&str> {
        self.0
            .get("urls")?
            .get("download")?
            .get(format.key())?
            .as_str()
            .filter(|u| !u.is_empty())
    }
}

/// Response of `GET /author/{author}/books`.
///
/// The shape of the entries in `list` is not published, so the list is kept
/// as raw JSON text. An explicit `"list": null` is kept as the text `null`;
/// `None` means the field was absent.
#[derive(Debug, Deserialize)]
pub struct AuthorBooks {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "present_raw")]
    pub list: Option<Box<RawValue>>,
}

fn present_raw<'de, D>(deserializer: D) -> std::result::Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Epub,
    Pdf,
    Mobi,
}

impl DownloadFormat {
    pub const ALL: [DownloadFormat; 3] = [Self::Epub, Self::Pdf, Self::Mobi];

    /// Label used in the link listing (`EPUB=…`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Epub => "EPUB",
            Self::Pdf => "PDF",
            Self::Mobi => "Mobi",
        }
    }

    /// Key under `urls.download` in the book record.
    fn key(self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Pdf => "pdf",
            Self::Mobi => "mobi",
        }
    }
}

impl FromStr for DownloadFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "epub" => Ok(Self::Epub),
            "pdf" => Ok(Self::Pdf),
            "mobi" => Ok(Self::Mobi),
            other => bail!("unknown download format [{}] (expected epub, pdf or mobi)", other),
        }
    }
}
