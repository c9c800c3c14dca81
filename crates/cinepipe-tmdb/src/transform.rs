//! Detail + credits JSON → flat movie record

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// === Lenient deserializers ===

/// Deserialize any value, keeping it only if it has the expected type
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list, mapping malformed elements to their default so
/// list positions are preserved; a non-list becomes empty
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect())
}

// === Typed row structs ===

/// `/movie/{id}` payload, only the fields the record uses.
///
/// Everything except `genres` is carried through as the raw JSON value;
/// `null` and absent both come out as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieDetail {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub original_title: Option<Value>,
    pub release_date: Option<Value>,
    pub budget: Option<Value>,
    pub revenue: Option<Value>,
    pub runtime: Option<Value>,
    #[serde(deserialize_with = "lenient_vec")]
    pub genres: Vec<NamedEntry>,
    pub popularity: Option<Value>,
    pub vote_average: Option<Value>,
    pub vote_count: Option<Value>,
}

/// Genre or cast member: anything with a `name`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NamedEntry {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CrewEntry {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub job: Option<String>,
}

/// `/movie/{id}/credits` payload
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieCredits {
    #[serde(deserialize_with = "lenient_vec")]
    pub cast: Vec<NamedEntry>,
    #[serde(deserialize_with = "lenient_vec")]
    pub crew: Vec<CrewEntry>,
}

impl MovieCredits {
    /// First crew member (list order) credited as Director
    pub fn director(&self) -> Option<String> {
        self.crew
            .iter()
            .find(|c| c.job.as_deref() == Some("Director"))
            .and_then(|c| c.name.clone())
    }

    /// Name of the cast member at `idx`, if billed
    pub fn cast_name(&self, idx: usize) -> Option<String> {
        self.cast.get(idx).and_then(|c| c.name.clone())
    }
}

// === Output record ===

/// One flattened row of the result set (field order is the output order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub original_title: Option<Value>,
    pub release_date: Option<Value>,
    pub budget: Option<Value>,
    pub revenue: Option<Value>,
    pub runtime: Option<Value>,
    /// Genre names joined with ", "
    pub genres: String,
    pub popularity: Option<Value>,
    pub vote_avg: Option<Value>,
    pub vote_count: Option<Value>,
    pub director: Option<String>,
    pub cast1: Option<String>,
    pub cast2: Option<String>,
    pub cast3: Option<String>,
}

/// Typed view of a JSON object; anything else yields the default
fn from_object<T: DeserializeOwned + Default>(value: &Value) -> T {
    if !value.is_object() {
        return T::default();
    }
    T::deserialize(value).unwrap_or_default()
}

/// Flatten a detail/credits pair. Never fails: detail fields pass through
/// as-is, missing ones become `None`; malformed genres or credits degrade
/// to an empty string or `None`.
pub fn transform(detail: &Value, credits: &Value) -> MovieRecord {
    let detail: MovieDetail = from_object(detail);
    let credits: MovieCredits = from_object(credits);

    let genres = detail
        .genres
        .iter()
        .filter_map(|g| g.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ");

    MovieRecord {
        id: detail.id,
        title: detail.title,
        original_title: detail.original_title,
        release_date: detail.release_date,
        budget: detail.budget,
        revenue: detail.revenue,
        runtime: detail.runtime,
        genres,
        popularity: detail.popularity,
        vote_avg: detail.vote_average,
        vote_count: detail.vote_count,
        director: credits.director(),
        cast1: credits.cast_name(0),
        cast2: credits.cast_name(1),
        cast3: credits.cast_name(2),
    }
}
