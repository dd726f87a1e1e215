use serde::{Deserialize, Serialize};

/// Anything that can be referenced from a build line.
///
/// Catalog identity is the string `id`, which never changes once the catalog
/// is loaded.
pub trait CatalogItem {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// A single retailer's price for a piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Retailer name (e.g., `Amazon`).
    pub source: String,
    pub price: f64,
    pub url: String,
}

/// Purchasable hardware: tanks, filters, lights, substrate and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub category: EquipmentCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(default, alias = "prices")]
    pub price_quotes: Vec<PriceQuote>,
    #[serde(default, alias = "specifications", skip_serializing_if = "Option::is_none")]
    pub specs: Option<String>,
}

impl CatalogItem for Equipment {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Equipment categories offered by the catalog browser's filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EquipmentCategory {
    Tank,
    Heater,
    #[serde(rename = "CO2 Equipment")]
    Co2Equipment,
    Environment,
    Filter,
    Lighting,
    #[serde(rename = "Water Treatment")]
    WaterTreatment,
}

impl EquipmentCategory {
    pub const ALL: [EquipmentCategory; 7] = [
        Self::Tank,
        Self::Heater,
        Self::Co2Equipment,
        Self::Environment,
        Self::Filter,
        Self::Lighting,
        Self::WaterTreatment,
    ];

    /// Display label, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tank => "Tank",
            Self::Heater => "Heater",
            Self::Co2Equipment => "CO2 Equipment",
            Self::Environment => "Environment",
            Self::Filter => "Filter",
            Self::Lighting => "Lighting",
            Self::WaterTreatment => "Water Treatment",
        }
    }

    /// Parse a label case-insensitively. Accepts `co2` and `water-treatment`
    /// style shorthands used on the command line and in query strings.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "tank" => Some(Self::Tank),
            "heater" => Some(Self::Heater),
            "co2 equipment" | "co2" => Some(Self::Co2Equipment),
            "environment" => Some(Self::Environment),
            "filter" => Some(Self::Filter),
            "lighting" => Some(Self::Lighting),
            "water treatment" | "treatment" => Some(Self::WaterTreatment),
            _ => None,
        }
    }
}

/// Fish (including invertebrates) or plant species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Livestock {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    #[serde(alias = "type")]
    pub kind: LivestockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CatalogItem for Livestock {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LivestockKind {
    Fish,
    Plant,
}

impl LivestockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fish => "Fish",
            Self::Plant => "Plant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fish" => Some(Self::Fish),
            "plant" | "plants" => Some(Self::Plant),
            _ => None,
        }
    }
}

/// A catalog item copied into a build, together with how many were chosen.
///
/// The item's fields are flattened so a stored line reads like the catalog
/// entry plus a `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl<T: CatalogItem> LineItem<T> {
    pub fn new(item: T, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn id(&self) -> &str {
        self.item.id()
    }
}

fn default_quantity() -> u32 {
    1
}

pub type EquipmentLine = LineItem<Equipment>;
pub type LivestockLine = LineItem<Livestock>;
