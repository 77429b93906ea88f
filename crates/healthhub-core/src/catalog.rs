//! Read-only content catalog.
//!
//! Health topics, government schemes, hospitals and wellness articles are
//! reference data provisioned as JSON files in the data directory. The
//! catalog reads them fresh on every call and never writes. A lookup miss
//! is `None` (the front end renders it as not-found); a missing or
//! unreadable catalog file is an error, since the data is expected to be
//! provisioned by the operator.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::storage::data_dir;

/// A health-information topic. The file is keyed by topic id; the key is
/// injected into the record on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub brief: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A government health scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheme {
    pub id: u64,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// A hospital directory entry. Records without an id in the file get one
/// assigned positionally on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: u64,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawHospital {
    #[serde(default)]
    id: Option<u64>,
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

/// A wellness article, keyed by slug in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// File-backed content directory.
pub struct Catalog {
    dir: PathBuf,
}

impl Catalog {
    /// Open the catalog against the application data directory.
    pub fn open() -> Result<Self, CatalogError> {
        let dir = data_dir().map_err(|e| CatalogError::LoadFailed {
            path: PathBuf::from("."),
            message: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    /// Open the catalog against a specific directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, CatalogError> {
        let path = self.dir.join(name);
        let content =
            std::fs::read_to_string(&path).map_err(|e| CatalogError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&content).map_err(|e| CatalogError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// All topics, id-sorted, with the map key injected as `id`.
    pub fn topics(&self) -> Result<Vec<Topic>, CatalogError> {
        let raw: BTreeMap<String, Topic> = self.read_json("topics.json")?;
        Ok(raw
            .into_iter()
            .map(|(id, mut topic)| {
                topic.id = id;
                topic
            })
            .collect())
    }

    pub fn topic(&self, id: &str) -> Result<Option<Topic>, CatalogError> {
        Ok(self.topics()?.into_iter().find(|t| t.id == id))
    }

    /// All schemes in file order.
    pub fn schemes(&self) -> Result<Vec<Scheme>, CatalogError> {
        self.read_json("schemes.json")
    }

    pub fn scheme(&self, id: u64) -> Result<Option<Scheme>, CatalogError> {
        Ok(self.schemes()?.into_iter().find(|s| s.id == id))
    }

    /// All hospitals in file order; records without an id get `i + 1`.
    pub fn hospitals(&self) -> Result<Vec<Hospital>, CatalogError> {
        let raw: Vec<RawHospital> = self.read_json("hospitals.json")?;
        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(i, h)| Hospital {
                id: h.id.unwrap_or(i as u64 + 1),
                fields: h.fields,
            })
            .collect())
    }

    pub fn hospital(&self, id: u64) -> Result<Option<Hospital>, CatalogError> {
        Ok(self.hospitals()?.into_iter().find(|h| h.id == id))
    }

    /// All articles, keyed by slug.
    pub fn articles(&self) -> Result<BTreeMap<String, Article>, CatalogError> {
        self.read_json("articles.json")
    }

    pub fn article(&self, slug: &str) -> Result<Option<Article>, CatalogError> {
        Ok(self.articles()?.remove(slug))
    }
}
