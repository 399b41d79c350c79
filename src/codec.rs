//! Config file encoding and decoding.
//!
//! Decoding turns a YAML, TOML, or JSON document into a flat
//! [`ConfigDocument`]: each top-level key maps to a single value or an ordered
//! list of values, all in text form. Nested structures are kept only as a
//! marker so the resolver can report them as a shape mismatch.
//!
//! [`generate_default`] goes the other way, writing a fully commented YAML
//! skeleton from the registry's descriptions and defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::FlagError;
use crate::registry::Registry;

/// A decoded config value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Scalar(String),
    List(Vec<String>),
    /// A table, map, or list with non-scalar items.
    Structured,
}

/// Config file contents keyed by flag key.
pub type ConfigDocument = BTreeMap<String, ConfigValue>;

/// Supported config file syntaxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick a format from the file extension, defaulting to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Bool(b) => b.to_string(),
            RawScalar::Int(i) => i.to_string(),
            RawScalar::Float(f) => f.to_string(),
            RawScalar::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Null,
    Scalar(RawScalar),
    List(Vec<RawScalar>),
    Other(IgnoredAny),
}

type RawDocument = BTreeMap<String, RawEntry>;

/// Decode `content` in `format`. `path` only labels errors.
pub fn decode(content: &str, format: ConfigFormat, path: &Path) -> Result<ConfigDocument, FlagError> {
    if is_blank(content, format) {
        return Ok(ConfigDocument::new());
    }

    let raw = match format {
        ConfigFormat::Yaml => serde_yaml::from_str::<RawDocument>(content).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str::<RawDocument>(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str::<RawDocument>(content).map_err(|e| e.to_string()),
    }
    .map_err(|reason| FlagError::Decode {
        path: path.to_path_buf(),
        reason,
    })?;

    let document = raw
        .into_iter()
        .filter_map(|(key, entry)| {
            let value = match entry {
                RawEntry::Null => return None,
                RawEntry::Scalar(s) => ConfigValue::Scalar(s.into_text()),
                RawEntry::List(items) => {
                    ConfigValue::List(items.into_iter().map(RawScalar::into_text).collect())
                }
                RawEntry::Other(_) => ConfigValue::Structured,
            };
            Some((key, value))
        })
        .collect();
    Ok(document)
}

/// Whether the document holds nothing but comments and whitespace.
fn is_blank(content: &str, format: ConfigFormat) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || (format != ConfigFormat::Json && line.starts_with('#'))
    })
}

/// Read and decode the config file at `path`.
pub fn load(path: &Path) -> Result<ConfigDocument, FlagError> {
    let content = std::fs::read_to_string(path).map_err(|e| FlagError::FileAccess {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode(&content, ConfigFormat::from_path(path), path)
}

/// Generate a commented-out YAML skeleton listing every settable flag.
///
/// Config-only flags and triggers are left out.
pub fn generate_default(registry: &Registry) -> String {
    let mut out = format!(
        "# {} config file\n# generated by {}\n",
        registry.tool(),
        registry.generator()
    );
    for def in registry.flags() {
        if def.is_config_only() || def.cell().is_trigger() {
            continue;
        }
        out.push('\n');
        out.push_str(&format!("# {}\n", def.description().to_lowercase()));
        out.push_str(format!("#{}: {}", def.key(), def.default_text()).trim_end());
        out.push('\n');
    }
    out.truncate(out.trim_end_matches('\n').len());
    out
}

/// Write the skeleton to `path`, creating parent directories.
pub fn write_default(registry: &Registry, path: &Path) -> Result<PathBuf, FlagError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FlagError::FileAccess {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, generate_default(registry)).map_err(|e| FlagError::FileAccess {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Flag;
    use crate::tokenize::ListMode;
    use tempfile::TempDir;

    fn yaml(content: &str) -> ConfigDocument {
        decode(content, ConfigFormat::Yaml, Path::new("test.yaml")).unwrap()
    }

    #[test]
    fn yaml_scalars_and_lists() {
        let document = yaml(
            "
string-value: test
slice-value:
 - test
 - test2
int-value: 543
bool-value: true
duration-value: 1h",
        );
        assert_eq!(document["string-value"], ConfigValue::Scalar("test".into()));
        assert_eq!(
            document["slice-value"],
            ConfigValue::List(vec!["test".into(), "test2".into()])
        );
        assert_eq!(document["int-value"], ConfigValue::Scalar("543".into()));
        assert_eq!(document["bool-value"], ConfigValue::Scalar("true".into()));
        assert_eq!(document["duration-value"], ConfigValue::Scalar("1h".into()));
    }

    #[test]
    fn yaml_nested_map_is_structured() {
        let document = yaml("outer:\n  inner: 1\n");
        assert_eq!(document["outer"], ConfigValue::Structured);
    }

    #[test]
    fn yaml_null_entries_are_dropped() {
        let document = yaml("empty:\nset: x\n");
        assert!(!document.contains_key("empty"));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn comment_only_document_is_empty() {
        assert!(yaml("# nothing here\n\n#key: value\n").is_empty());
        assert!(yaml("").is_empty());
    }

    #[test]
    fn toml_document() {
        let document = decode(
            "threads = 10\nheaders = [\"a\", \"b\"]\n",
            ConfigFormat::Toml,
            Path::new("c.toml"),
        )
        .unwrap();
        assert_eq!(document["threads"], ConfigValue::Scalar("10".into()));
        assert_eq!(
            document["headers"],
            ConfigValue::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn json_document() {
        let document = decode(
            r#"{"silent": false, "rate": 1.5, "nested": {"a": 1}}"#,
            ConfigFormat::Json,
            Path::new("c.json"),
        )
        .unwrap();
        assert_eq!(document["silent"], ConfigValue::Scalar("false".into()));
        assert_eq!(document["rate"], ConfigValue::Scalar("1.5".into()));
        assert_eq!(document["nested"], ConfigValue::Structured);
    }

    #[test]
    fn malformed_document_is_decode_error() {
        let result = decode("key: [unclosed", ConfigFormat::Yaml, Path::new("bad.yaml"));
        assert!(matches!(result, Err(FlagError::Decode { .. })));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Yaml);
    }

    #[test]
    fn load_missing_file_is_file_access_error() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(FlagError::FileAccess { .. })));
    }

    #[test]
    fn generated_skeleton_matches_expected_layout() {
        let mut reg = Registry::new("testtool");
        reg.declare(
            Flag::string("test", "test-default-value")
                .description("Default value for a test flag example"),
        );
        reg.declare(
            Flag::string_list("slice", &["item1", "item2"], ListMode::Verbatim)
                .description("String slice flag example value"),
        );
        let generated = generate_default(&reg);
        let (first, rest) = generated.split_once('\n').unwrap();
        assert_eq!(first, "# testtool config file");

        let expected = format!(
            "# generated by {}

# default value for a test flag example
#test: test-default-value

# string slice flag example value
#slice: [\"item1\", \"item2\"]",
            reg.generator()
        );
        assert_eq!(rest, expected);
    }

    #[test]
    fn skeleton_skips_config_only_and_triggers() {
        let mut reg = Registry::new("testtool");
        reg.declare(Flag::string("secret", "").config_only());
        reg.declare(Flag::trigger("update", || {}));
        reg.declare(Flag::string("empty", "").description("Nothing set"));
        let generated = generate_default(&reg);
        assert!(!generated.contains("secret"));
        assert!(!generated.contains("update"));
        assert!(generated.ends_with("# nothing set\n#empty:"));
    }

    #[test]
    fn skeleton_decodes_to_empty_document() {
        let reg = crate::fixtures::test::data_types_registry();
        assert!(yaml(&generate_default(&reg)).is_empty());
    }

    #[test]
    fn write_default_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let reg = crate::fixtures::test::data_types_registry();
        write_default(&reg, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("#int-value: 0"));
    }
}
