//! Turns the example configurations a workspace advertises for each
//! datasource type into form fields, and form values back into the
//! metadata payload the datasource is created with.

use crate::remote::{AvailableDatasource, CLOUDLIST};
use crate::ui::FormField;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys that are never offered as editable fields.
pub const RESERVED_KEYS: [&str; 3] = ["metadata", "id", "provider"];

pub const CLOUDLIST_CHOICE: &str = "Cloudlist";

const FIELD_CHAR_LIMIT: usize = 100;
const FIELD_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaParseError {
    #[error("template for `{kind}` is not a json object: {message}")]
    InvalidTemplate { kind: String, message: String },
    #[error("field `{key}` of `{kind}` has a non-string example value")]
    NonStringField { kind: String, key: String },
    #[error("cloudlist entry {index} has no provider")]
    MissingProvider { index: usize },
}

/// Editable fields for one datasource type, or one cloudlist provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceSchema {
    pub kind: String,
    pub provider: Option<String>,
    pub fields: Vec<FormField>,
}

impl DatasourceSchema {
    pub fn is_cloudlist(&self) -> bool {
        self.kind.eq_ignore_ascii_case(CLOUDLIST)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCatalog {
    pub types: Vec<DatasourceSchema>,
    /// Keyed by the provider's display name.
    pub cloudlist: Vec<(String, DatasourceSchema)>,
    pub warnings: Vec<SchemaParseError>,
}

impl SchemaCatalog {
    pub fn parse(available: &[AvailableDatasource]) -> Self {
        let mut catalog = SchemaCatalog::default();
        for entry in available {
            let template = match template_object(&entry.kind, &entry.template) {
                Ok(template) => template,
                Err(err) => {
                    catalog.warnings.push(err);
                    continue;
                }
            };
            if entry.kind.eq_ignore_ascii_case(CLOUDLIST) {
                catalog.parse_cloudlist(&template);
                continue;
            }
            let fields = fields_from_object(&entry.kind, &template, &mut catalog.warnings);
            catalog.types.push(DatasourceSchema {
                kind: entry.kind.clone(),
                provider: None,
                fields,
            });
        }
        catalog
    }

    fn parse_cloudlist(&mut self, template: &Map<String, Value>) {
        let raw = template
            .get("config")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let entries: Vec<Value> = match serde_json::from_str(raw) {
            Ok(entries) => entries,
            Err(err) => {
                self.warnings.push(SchemaParseError::InvalidTemplate {
                    kind: CLOUDLIST.to_string(),
                    message: err.to_string(),
                });
                return;
            }
        };
        for (index, entry) in entries.iter().enumerate() {
            let Some(object) = entry.as_object() else {
                self.warnings.push(SchemaParseError::InvalidTemplate {
                    kind: CLOUDLIST.to_string(),
                    message: format!("entry {index} is not an object"),
                });
                continue;
            };
            let Some(provider) = object.get("provider").and_then(Value::as_str) else {
                self.warnings
                    .push(SchemaParseError::MissingProvider { index });
                continue;
            };
            let kind = format!("{CLOUDLIST}/{provider}");
            let fields = fields_from_object(&kind, object, &mut self.warnings);
            self.cloudlist.push((
                title_case_key(provider, ""),
                DatasourceSchema {
                    kind: CLOUDLIST.to_string(),
                    provider: Some(provider.to_string()),
                    fields,
                },
            ));
        }
    }

    /// Root choices in listing order, with cloudlist last when it has
    /// providers.
    pub fn root_choices(&self) -> Vec<String> {
        let mut choices: Vec<String> = self
            .types
            .iter()
            .map(|schema| title_case_key(&schema.kind, " "))
            .collect();
        if !self.cloudlist.is_empty() {
            choices.push(CLOUDLIST_CHOICE.to_string());
        }
        choices
    }

    pub fn provider_choices(&self) -> Vec<String> {
        self.cloudlist.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Resolves a choice path to the schema it selects.
    pub fn schema_for(&self, path: &[String]) -> Option<&DatasourceSchema> {
        let first = path.first()?;
        if first.eq_ignore_ascii_case(CLOUDLIST_CHOICE) {
            let provider = path.get(1)?;
            return self
                .cloudlist
                .iter()
                .find(|(name, _)| name == provider)
                .map(|(_, schema)| schema);
        }
        self.types
            .iter()
            .find(|schema| title_case_key(&schema.kind, " ").eq_ignore_ascii_case(first))
    }
}

fn template_object(kind: &str, template: &Value) -> Result<Map<String, Value>, SchemaParseError> {
    let invalid = |message: String| SchemaParseError::InvalidTemplate {
        kind: kind.to_string(),
        message,
    };
    match template {
        Value::Object(map) => Ok(map.clone()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(invalid("decoded value is not an object".to_string())),
            Err(err) => Err(invalid(err.to_string())),
        },
        other => Err(invalid(format!("unexpected {}", json_kind(other)))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn fields_from_object(
    kind: &str,
    object: &Map<String, Value>,
    warnings: &mut Vec<SchemaParseError>,
) -> Vec<FormField> {
    let sorted: BTreeMap<&String, &Value> = object.iter().collect();
    let mut fields = Vec::new();
    for (key, value) in sorted {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Some(example) = value.as_str() else {
            warnings.push(SchemaParseError::NonStringField {
                kind: kind.to_string(),
                key: key.clone(),
            });
            continue;
        };
        fields.push(
            FormField::new(title_case_key(key, " "), example)
                .with_limits(FIELD_CHAR_LIMIT, FIELD_WIDTH)
                .with_key(key.clone()),
        );
    }
    fields
}

/// `org-name` becomes `Org Name` with `" "`, `Orgname` with `""`.
pub fn title_case_key(key: &str, separator: &str) -> String {
    let joined = key
        .split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .collect::<Vec<&str>>()
        .join(separator);
    let mut titled = String::with_capacity(joined.len());
    let mut word_start = true;
    for ch in joined.chars() {
        if word_start {
            titled.extend(ch.to_uppercase());
        } else {
            titled.extend(ch.to_lowercase());
        }
        word_start = ch.is_whitespace();
    }
    titled
}

/// Builds the serialized metadata a datasource is created with.
pub fn build_metadata(
    schema: &DatasourceSchema,
    values: &[String],
) -> Result<String, serde_json::Error> {
    let mut object = Map::new();
    for (field, value) in schema.fields.iter().zip(values) {
        object.insert(field.original_key.clone(), Value::String(value.clone()));
    }
    if let Some(provider) = &schema.provider {
        object.insert("provider".to_string(), Value::String(provider.clone()));
    }
    if !schema.is_cloudlist() {
        return serde_json::to_string(&Value::Object(object));
    }
    let config = serde_json::to_string(&Value::Array(vec![Value::Object(object)]))?;
    serde_json::to_string(&serde_json::json!({
        "config": config,
        "repo": CLOUDLIST,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn available(kind: &str, template: Value) -> AvailableDatasource {
        AvailableDatasource {
            kind: kind.to_string(),
            template,
        }
    }

    #[test]
    fn title_case_replaces_separators() {
        assert_eq!(title_case_key("org-name", " "), "Org Name");
        assert_eq!(title_case_key("aws_access_key", " "), "Aws Access Key");
        assert_eq!(title_case_key("do", ""), "Do");
        assert_eq!(title_case_key("google_cloud", ""), "Googlecloud");
        assert_eq!(title_case_key("org-name", ""), "Orgname");
    }

    #[test]
    fn reserved_keys_are_never_fields() {
        let catalog = SchemaCatalog::parse(&[available(
            "github",
            json!({"id": "", "metadata": "x", "provider": "p", "token": "ghp", "org-name": "acme"}),
        )]);
        let keys: Vec<&str> = catalog.types[0]
            .fields
            .iter()
            .map(|field| field.original_key.as_str())
            .collect();
        assert_eq!(keys, vec!["org-name", "token"]);
        assert_eq!(catalog.types[0].fields[0].label, "Org Name");
        assert_eq!(catalog.types[0].fields[0].placeholder, "acme");
        assert!(catalog.warnings.is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_with_warnings() {
        let catalog = SchemaCatalog::parse(&[
            available("s3", json!("not json")),
            available("github", json!({"token": "ghp", "retries": 3})),
            available(
                CLOUDLIST,
                json!({"config": "[{\"id\":\"\"},{\"provider\":\"aws\",\"key\":\"k\"}]"}),
            ),
        ]);
        assert_eq!(catalog.types.len(), 1);
        assert_eq!(catalog.types[0].fields.len(), 1);
        assert_eq!(catalog.cloudlist.len(), 1);
        assert_eq!(catalog.warnings.len(), 3);
        assert!(catalog
            .warnings
            .contains(&SchemaParseError::MissingProvider { index: 0 }));
    }

    #[test]
    fn string_encoded_templates_are_accepted() {
        let catalog =
            SchemaCatalog::parse(&[available("s3", json!("{\"bucket\":\"my-bucket\"}"))]);
        assert_eq!(catalog.types[0].fields[0].original_key, "bucket");
    }

    #[test]
    fn choice_paths_resolve_to_schemas() {
        let catalog = SchemaCatalog::parse(&[
            available("github", json!({"token": "ghp"})),
            available(
                CLOUDLIST,
                json!({"config": "[{\"provider\":\"aws\",\"key\":\"k\"}]", "repo": "cloudlist"}),
            ),
        ]);
        assert_eq!(catalog.root_choices(), vec!["Github", "Cloudlist"]);
        assert_eq!(catalog.provider_choices(), vec!["Aws"]);
        let aws = catalog
            .schema_for(&["Cloudlist".to_string(), "Aws".to_string()])
            .expect("aws schema");
        assert_eq!(aws.provider.as_deref(), Some("aws"));
        assert!(catalog.schema_for(&["Github".to_string()]).is_some());
        assert!(catalog.schema_for(&["Cloudlist".to_string()]).is_none());
    }

    #[test]
    fn cloudlist_metadata_wraps_config_array() {
        let schema = DatasourceSchema {
            kind: CLOUDLIST.to_string(),
            provider: Some("aws".to_string()),
            fields: vec![FormField::new("Key", "k").with_key("key")],
        };
        let metadata = build_metadata(&schema, &["AKIA".to_string()]).expect("metadata");
        let decoded: Value = serde_json::from_str(&metadata).expect("decode");
        assert_eq!(decoded["repo"], "cloudlist");
        let config: Value =
            serde_json::from_str(decoded["config"].as_str().expect("config")).expect("config json");
        assert_eq!(config, json!([{"key": "AKIA", "provider": "aws"}]));
    }

    #[test]
    fn plain_metadata_is_a_flat_object() {
        let schema = DatasourceSchema {
            kind: "github".to_string(),
            provider: None,
            fields: vec![FormField::new("Token", "ghp").with_key("token")],
        };
        let metadata = build_metadata(&schema, &["secret".to_string()]).expect("metadata");
        assert_eq!(metadata, r#"{"token":"secret"}"#);
    }
}
