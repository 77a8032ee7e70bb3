//! Route document model and its JSON persistence.
//!
//! A document is a list of named routes, each an ordered list of points. Any
//! key the model does not know about (at document, route, or point level) is
//! captured into a flattened map so that a load/save round-trip keeps the
//! caller's payload verbatim.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Stable identity used to collapse points that refer to the same physical
/// waypoint into one graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointKey {
    /// Explicit external identifier carried by the point.
    Id(String),
    /// Display name, used when no identifier is present.
    Name(String),
    /// Bit patterns of the coordinates, used for anonymous points.
    Position { lat_bits: u64, lon_bits: u64 },
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKey::Id(id) => write!(f, "id:{id}"),
            PointKey::Name(name) => write!(f, "name:{name}"),
            PointKey::Position { lat_bits, lon_bits } => write!(
                f,
                "pos:{},{}",
                f64::from_bits(*lat_bits),
                f64::from_bits(*lon_bits)
            ),
        }
    }
}

/// One point record within a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoutePoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            lat,
            lon,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Name shown to users; empty when the point is unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Identity key: the explicit id when present, else the display name,
    /// else the exact coordinates.
    pub fn key(&self) -> PointKey {
        match (self.id.as_deref(), self.display_name()) {
            (Some(id), _) if !id.is_empty() => PointKey::Id(id.to_string()),
            (_, name) if !name.is_empty() => PointKey::Name(name.to_string()),
            _ => PointKey::Position {
                lat_bits: self.lat.to_bits(),
                lon_bits: self.lon.to_bits(),
            },
        }
    }
}

/// Named, ordered sequence of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub points: Vec<RoutePoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Route {
    pub fn new(name: impl Into<String>, points: Vec<RoutePoint>) -> Self {
        Self {
            name: Some(name.into()),
            points,
            extra: Map::new(),
        }
    }

    /// Route label, or the empty string when the route has none.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.name = Some(label.into());
    }
}

/// A whole route document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            extra: Map::new(),
        }
    }

    /// Serialize as pretty-printed JSON with a trailing newline.
    pub fn to_json_string(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(Error::Serialize)?;
        json.push('\n');
        Ok(json)
    }
}

impl FromStr for Document {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

/// Read and parse a route document.
pub fn load_document(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::DocumentNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(err),
    })?;
    let document: Document = raw.parse().map_err(|source| Error::MalformedDocument {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        routes = document.routes.len(),
        "loaded route document"
    );
    Ok(document)
}

/// Write a route document, replacing `path` atomically.
pub fn save_document(path: &Path, document: &Document) -> Result<()> {
    let json = document.to_json_string()?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|err| Error::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    debug!(path = %path.display(), bytes = json.len(), "saved route document");
    Ok(())
}
