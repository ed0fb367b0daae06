use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A type the model can be asked to produce through a forced tool call.
///
/// Blanket-implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Tool `input_schema` for this type: a single self-contained object schema
    /// with every `$ref` inlined and the draft metadata removed.
    fn tool_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("title");
                map.remove("definitions")
            }
            _ => None,
        };
        if let Some(Value::Object(defs)) = definitions {
            inline_refs(&mut value, &defs, 0);
        }
        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

// Self-referential types would otherwise recurse forever.
const MAX_INLINE_DEPTH: usize = 16;

fn inline_refs(value: &mut Value, defs: &Map<String, Value>, depth: usize) {
    if depth > MAX_INLINE_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| defs.get(name))
                .cloned();
            if let Some(def) = target {
                *value = def;
                inline_refs(value, defs, depth + 1);
                return;
            }

            // schemars wraps documented refs as `allOf: [{$ref}]`
            if let Some(Value::Array(all_of)) = map.get("allOf") {
                if let [single] = all_of.as_slice() {
                    let mut single = single.clone();
                    inline_refs(&mut single, defs, depth + 1);
                    map.remove("allOf");
                    if let Value::Object(inner) = single {
                        for (k, v) in inner {
                            map.entry(k).or_insert(v);
                        }
                    }
                }
            }

            for v in map.values_mut() {
                inline_refs(v, defs, depth);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, defs, depth);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "UPPERCASE")]
    #[allow(dead_code)]
    enum Label {
        Yes,
        No,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Finding {
        /// The label the model settled on.
        label: Label,
        notes: Option<String>,
        facts: Vec<String>,
    }

    #[test]
    fn schema_is_a_plain_object() {
        let schema = Finding::tool_schema();
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.get("type"), Some(&Value::String("object".into())));
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));
    }

    #[test]
    fn nested_refs_are_inlined() {
        let schema = Finding::tool_schema();
        let text = serde_json::to_string(&schema).unwrap();
        assert!(!text.contains("$ref"), "{text}");
        assert!(text.contains("YES") && text.contains("NO"), "{text}");
    }

    #[test]
    fn required_fields_survive() {
        let schema = Finding::tool_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"label"));
        assert!(required.contains(&"facts"));
        assert!(!required.contains(&"notes"));
    }

    #[test]
    fn type_name_comes_from_schemars() {
        assert_eq!(Finding::type_name(), "Finding");
    }
}
