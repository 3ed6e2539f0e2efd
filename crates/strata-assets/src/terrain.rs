//! Landform and geologic-province variant tables.

use serde::Deserialize;

/// One landform variant: a named terrain archetype with a selection weight.
///
/// Weights feed the weighted-index noise leaf; an index into the loaded
/// table is what the landform map stores per cell.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LandformDef {
    /// Variant name (e.g. "plains", "highlands").
    pub code: String,
    /// Selection weight; zero keeps the index reserved but never picked.
    pub weight: i32,
    /// RGB hex color used by map rendering (e.g. "#60a040").
    pub map_color: Option<String>,
}

impl Default for LandformDef {
    fn default() -> Self {
        Self {
            code: String::new(),
            weight: 0,
            map_color: None,
        }
    }
}

/// One geologic-province variant: governs which rock strata and deposits
/// dominate a region.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProvinceDef {
    /// Variant name (e.g. "sedimentary", "volcanic").
    pub code: String,
    /// Selection weight.
    pub weight: i32,
    /// RGB hex color used by map rendering.
    pub map_color: Option<String>,
}

impl Default for ProvinceDef {
    fn default() -> Self {
        Self {
            code: String::new(),
            weight: 0,
            map_color: None,
        }
    }
}

/// File wrapper: variant tables ship as `{"variants": [...]}` documents.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantsFile<T> {
    pub variants: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landforms_file_deserializes() {
        let json = r##"{
            "variants": [
                {"code": "plains", "weight": 40, "mapColor": "#60a040"},
                {"code": "highlands", "weight": 15},
                {"code": "reserved", "weight": 0}
            ]
        }"##;
        let file: VariantsFile<LandformDef> = serde_json::from_str(json).expect("valid json");
        assert_eq!(file.variants.len(), 3);
        assert_eq!(file.variants[0].code, "plains");
        assert_eq!(file.variants[1].weight, 15);
        assert!(file.variants[1].map_color.is_none());
    }

    #[test]
    fn test_provinces_file_deserializes() {
        let json = r#"{"variants": [{"code": "volcanic", "weight": 5}]}"#;
        let file: VariantsFile<ProvinceDef> = serde_json::from_str(json).expect("valid json");
        assert_eq!(file.variants[0].code, "volcanic");
    }
}
