use serde::{Deserialize, Deserializer, Serialize};

/// Coarse geographic partition of the catalog
///
/// Zones outside the known set keep their catalog spelling, so two different
/// unknown zones never compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Zone {
    East,
    West,
    North,
    South,
    Central,
    Other(String),
}

impl Zone {
    pub fn as_str(&self) -> &str {
        match self {
            Zone::East => "east",
            Zone::West => "west",
            Zone::North => "north",
            Zone::South => "south",
            Zone::Central => "central",
            Zone::Other(raw) => raw,
        }
    }
}

impl From<String> for Zone {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "east" => Zone::East,
            "west" => Zone::West,
            "north" => Zone::North,
            "south" => Zone::South,
            "central" => Zone::Central,
            _ => Zone::Other(raw),
        }
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Listing category; unknown categories keep their catalog spelling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    Apartment,
    Villa,
    Plot,
    Penthouse,
    Commercial,
    Other(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::Plot => "plot",
            PropertyType::Penthouse => "penthouse",
            PropertyType::Commercial => "commercial",
            PropertyType::Other(raw) => raw,
        }
    }
}

impl From<String> for PropertyType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "apartment" => PropertyType::Apartment,
            "villa" => PropertyType::Villa,
            "plot" => PropertyType::Plot,
            "penthouse" => PropertyType::Penthouse,
            "commercial" => PropertyType::Commercial,
            _ => PropertyType::Other(raw),
        }
    }
}

impl From<PropertyType> for String {
    fn from(property_type: PropertyType) -> Self {
        match property_type {
            PropertyType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Listing lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    Active,
    PreLaunch,
    UnderConstruction,
    ReadyToMove,
    SoldOut,
    #[serde(other)]
    Other,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Active => "active",
            PropertyStatus::PreLaunch => "pre-launch",
            PropertyStatus::UnderConstruction => "under-construction",
            PropertyStatus::ReadyToMove => "ready-to-move",
            PropertyStatus::SoldOut => "sold-out",
            PropertyStatus::Other => "other",
        }
    }
}

/// One priced unit-layout variant of a listing (e.g. "3 BHK" at a given price)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    pub price: f64,
    #[serde(default, alias = "bhk")]
    pub layout: String,
}

/// A property listing as supplied by the catalog
///
/// Serialized camelCase like the rest of the API; catalog rows spell the base
/// score `overall_score`, which is accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub zone: Zone,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, alias = "overall_score")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configurations: Vec<Configuration>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area: String,
}

impl Property {
    /// Exact tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn shares_tag_with(&self, other: &Property) -> bool {
        self.tags.iter().any(|t| other.has_tag(t))
    }
}

// Catalog rows frequently carry explicit nulls for optional collections
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_deserializes_catalog_row() {
        let row = json!({
            "id": "p-1",
            "name": "Skyline Residency",
            "zone": "east",
            "type": "apartment",
            "status": "pre-launch",
            "tags": ["high-roi", "metro-connectivity"],
            "overall_score": 72.5,
            "configurations": [{ "price": 85.0, "bhk": "3 BHK" }],
            "area": "Whitefield"
        });

        let property: Property = serde_json::from_value(row).unwrap();
        assert_eq!(property.zone, Zone::East);
        assert_eq!(property.property_type, PropertyType::Apartment);
        assert_eq!(property.status, PropertyStatus::PreLaunch);
        assert_eq!(property.configurations[0].layout, "3 BHK");
        assert!(property.has_tag("high-roi"));
    }

    #[test]
    fn test_null_collections_become_empty() {
        let row = json!({
            "id": "p-2",
            "zone": "west",
            "type": "villa",
            "status": "active",
            "tags": null,
            "configurations": null,
            "area": null
        });

        let property: Property = serde_json::from_value(row).unwrap();
        assert!(property.tags.is_empty());
        assert!(property.configurations.is_empty());
        assert!(property.area.is_empty());
        assert_eq!(property.overall_score, None);
    }

    #[test]
    fn test_unknown_enum_values_map_to_other() {
        let row = json!({
            "id": "p-3",
            "zone": "outer-ring",
            "type": "farmhouse",
            "status": "on-hold"
        });

        let property: Property = serde_json::from_value(row).unwrap();
        assert_eq!(property.zone, Zone::Other("outer-ring".to_string()));
        assert_eq!(property.property_type.as_str(), "farmhouse");
        assert_eq!(property.status, PropertyStatus::Other);
    }

    #[test]
    fn test_unknown_zones_stay_distinct() {
        let ring = Zone::from("outer-ring".to_string());
        let belt = Zone::from("hebbal-belt".to_string());
        assert_ne!(ring, belt);
        assert_eq!(Zone::from("east".to_string()), Zone::East);
        assert_eq!(
            serde_json::to_value(&PropertyType::Other("row-house".to_string())).unwrap(),
            json!("row-house")
        );
    }

    #[test]
    fn test_property_serializes_camel_case() {
        let row = json!({
            "id": "p-4",
            "zone": "central",
            "type": "plot",
            "status": "active",
            "overallScore": 61.0
        });

        let property: Property = serde_json::from_value(row).unwrap();
        assert_eq!(property.overall_score, Some(61.0));

        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["overallScore"], 61.0);
        assert_eq!(value["type"], "plot");
        assert!(value.get("overall_score").is_none());
    }

    #[test]
    fn test_status_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&PropertyStatus::ReadyToMove).unwrap(),
            "\"ready-to-move\""
        );
        assert_eq!(PropertyStatus::PreLaunch.as_str(), "pre-launch");
    }
}
