//! JSON Schema for the `CarrotPlay` configuration file.

use crate::config::CarrotConfig;

/// Generates a JSON Schema for the configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(CarrotConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert(
            "$id".to_string(),
            serde_json::json!(
                "https://raw.githubusercontent.com/carrotplay/carrotplay/main/carrotplay.schema.json"
            ),
        );
    }

    schema
}

/// Pretty-printed JSON Schema, ready to save next to a config file.
#[must_use]
pub fn print_schema() -> String { serde_json::to_string_pretty(&generate_schema()).unwrap_or_default() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_schema_produces_valid_json() {
        let schema_json = print_schema();
        let parsed: serde_json::Value = serde_json::from_str(&schema_json).unwrap();

        assert!(parsed["$id"].as_str().unwrap().ends_with("carrotplay.schema.json"));
        assert_eq!(parsed["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(parsed["title"], "CarrotConfig");
        assert!(parsed["properties"]["panes"].is_object());
        assert!(parsed["properties"]["tracker"].is_object());
    }

    #[test]
    fn test_schema_defines_section_types() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();
        for name in ["PanesConfig", "DividerConfig", "AnimationConfig", "ResizeConfig", "InputConfig"] {
            assert!(parsed["$defs"][name].is_object(), "missing {name}");
        }
    }

    #[test]
    fn test_schema_json_is_pretty_printed() {
        assert!(print_schema().contains('\n'));
    }
}
