use crate::{
    core::geo::MarkSet,
    prelude::HashMap,
    MarkError, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A saved set of marks for one map, as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedMapRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub map_id: String,
    pub map_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub marks: MarkSet,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarkedMap {
    pub map_id: String,
    pub map_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub marks: MarkSet,
}

impl NewMarkedMap {
    pub fn validate(&self) -> Result<()> {
        if self.map_id.trim().is_empty() {
            return Err(MarkError::Validation("mapId and mapName are required".into()).into());
        }
        Ok(())
    }
}

/// Partial update; only present fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedMapUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<MarkSet>,
}

impl MarkedMapUpdate {
    /// Update that replaces only the marks
    pub fn marks(marks: MarkSet) -> Self {
        Self {
            marks: Some(marks),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map_name.is_none() && self.image_url.is_none() && self.marks.is_none()
    }

    pub fn apply_to(&self, record: &mut MarkedMapRecord) {
        if let Some(name) = &self.map_name {
            record.map_name = name.clone();
        }
        if let Some(url) = &self.image_url {
            record.image_url = url.clone();
        }
        if let Some(marks) = &self.marks {
            record.marks = marks.clone();
        }
    }
}

/// List/search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    pub today_only: bool,
}

impl ListQuery {
    pub fn all() -> Self {
        Self {
            q: None,
            today_only: false,
        }
    }

    pub fn search(q: impl Into<String>, today_only: bool) -> Self {
        Self {
            q: Some(q.into()),
            today_only,
        }
    }

    /// Trimmed search text; blank text means no filter
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: None,
            today_only: true,
        }
    }
}

/// The map currently chosen for marking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSelection {
    #[serde(rename = "index")]
    pub map_id: String,
    pub name: String,
    /// `None` when no image is known for the map
    #[serde(default, deserialize_with = "deserialize_image_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub map_page_url: String,
}

impl MapSelection {
    pub fn new(map_id: impl Into<String>, name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            map_id: map_id.into(),
            name: name.into(),
            image_url: image_url.filter(|url| !url.trim().is_empty()),
            map_page_url: String::new(),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

fn deserialize_image_url<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|url| !url.trim().is_empty()))
}

impl From<&MarkedMapRecord> for MapSelection {
    fn from(record: &MarkedMapRecord) -> Self {
        Self::new(
            record.map_id.clone(),
            record.map_name.clone(),
            Some(record.image_url.clone()),
        )
    }
}

/// One entry per distinct map in a record listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub map_id: String,
    pub map_name: String,
    pub image_url: String,
    pub total_marks: usize,
    pub saved_count: usize,
}

/// Group records by `map_id` in first-seen order, counting marks and records.
/// The first record of a map supplies its name and image.
pub fn group_by_map(records: &[MarkedMapRecord]) -> Vec<MapSummary> {
    let mut positions: HashMap<&str, usize> = HashMap::default();
    let mut summaries: Vec<MapSummary> = Vec::new();

    for record in records {
        match positions.get(record.map_id.as_str()) {
            Some(&pos) => {
                let summary = &mut summaries[pos];
                summary.total_marks += record.marks.len();
                summary.saved_count += 1;
            }
            None => {
                positions.insert(record.map_id.as_str(), summaries.len());
                summaries.push(MapSummary {
                    map_id: record.map_id.clone(),
                    map_name: record.map_name.clone(),
                    image_url: record.image_url.clone(),
                    total_marks: record.marks.len(),
                    saved_count: 1,
                });
            }
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::MarkPosition;

    fn record(id: &str, map_id: &str, name: &str, marks: usize) -> MarkedMapRecord {
        MarkedMapRecord {
            id: id.to_string(),
            map_id: map_id.to_string(),
            map_name: name.to_string(),
            image_url: format!("https://cdn.example/{map_id}.png"),
            marks: (0..marks).map(|i| MarkPosition::new(i as f64, i as f64)).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_record_wire_format() {
        let json = r#"{
            "_id": "65f0c1",
            "mapId": "TNL-042",
            "mapName": "Frostspring Volcano",
            "imageUrl": "https://cdn.example/TNL-042.png",
            "marks": [{"x": 12.5, "y": 40}, {"x": 80, "y": 5, "name": "Chest"}],
            "createdAt": "2026-10-18T08:30:00Z",
            "updatedAt": null
        }"#;
        let record: MarkedMapRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "65f0c1");
        assert_eq!(record.map_id, "TNL-042");
        assert_eq!(record.marks.len(), 2);
        assert_eq!(record.marks[1].name.as_deref(), Some("Chest"));
        assert!(record.created_at.is_some());
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_update_serializes_only_present_fields() {
        let update = MarkedMapUpdate::marks(vec![MarkPosition::new(1.0, 2.0)]);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"marks": [{"x": 1.0, "y": 2.0}]}));
        assert!(MarkedMapUpdate::default().is_empty());
    }

    #[test]
    fn test_new_record_requires_map_id() {
        let payload = NewMarkedMap {
            map_id: " ".to_string(),
            map_name: "Somewhere".to_string(),
            image_url: String::new(),
            marks: vec![],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_query_text() {
        assert_eq!(ListQuery::search("  volcano ", true).text(), Some("volcano"));
        assert_eq!(ListQuery::search("   ", false).text(), None);
        assert_eq!(ListQuery::all().text(), None);
    }

    #[test]
    fn test_group_by_map() {
        let records = vec![
            record("a", "TNL-1", "Tunnel", 3),
            record("b", "DNG-9", "Dungeon", 1),
            record("c", "TNL-1", "Tunnel (renamed)", 2),
        ];
        let summaries = group_by_map(&records);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].map_id, "TNL-1");
        assert_eq!(summaries[0].map_name, "Tunnel");
        assert_eq!(summaries[0].total_marks, 5);
        assert_eq!(summaries[0].saved_count, 2);
        assert_eq!(summaries[1].map_id, "DNG-9");
        assert_eq!(summaries[1].saved_count, 1);
    }

    #[test]
    fn test_selection_without_image() {
        let selection = MapSelection::new("X", "Unknown", Some(String::new()));
        assert!(!selection.has_image());
    }

    #[test]
    fn test_decoded_selection_blank_image() {
        let blank: MapSelection =
            serde_json::from_str(r#"{"index":"X-1","name":"No Image","imageUrl":"  "}"#).unwrap();
        assert_eq!(blank.image_url, None);
        assert!(!blank.has_image());

        let missing: MapSelection = serde_json::from_str(r#"{"index":"X-1","name":"No Image"}"#).unwrap();
        assert!(!missing.has_image());

        let present: MapSelection =
            serde_json::from_str(r#"{"index":"X-1","name":"Map","imageUrl":"https://cdn.example/X-1.png"}"#)
                .unwrap();
        assert_eq!(present.image_url.as_deref(), Some("https://cdn.example/X-1.png"));
    }
}
