//! Core resolution: decide, flag by flag, which source supplies the value.
//!
//! Operates on a registry whose cells already hold defaults and command-line
//! values, plus a decoded [`ConfigDocument`]. No I/O happens here. For each
//! declared flag:
//!
//! 1. Explicitly set on the command line: keep the current value.
//! 2. Present in the document: apply it (scalars through the cell's parser,
//!    lists assigned as a whole).
//! 3. Otherwise the compiled-in default stands.
//!
//! Failures are collected rather than aborting, so one bad entry does not keep
//! the remaining flags from resolving.

use std::collections::HashSet;

use crate::codec::{ConfigDocument, ConfigValue};
use crate::error::FlagError;
use crate::registry::{FlagDefinition, Registry};
use crate::tokenize;
use crate::value::ValueCell;

/// Keys of flags assigned at least once on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitSet(HashSet<String>);

impl ExplicitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str) {
        self.0.insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: ExplicitSet) {
        self.0.extend(other.0);
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExplicitSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Apply `document` to every flag of `registry` not in `explicit`.
///
/// Returns [`FlagError::Resolve`] holding one error per offending flag, after
/// every flag has been attempted.
pub fn resolve(
    registry: &mut Registry,
    explicit: &ExplicitSet,
    document: &ConfigDocument,
) -> Result<(), FlagError> {
    let mut errors = Vec::new();

    for def in registry.flags_mut() {
        let key = def.key().to_string();
        if explicit.contains(&key) {
            if document.contains_key(&key) {
                tracing::debug!(flag = %key, "set on the command line, ignoring config file value");
            }
            continue;
        }
        let Some(value) = document.get(&key) else {
            continue;
        };
        if let Err(e) = apply(def, value) {
            tracing::debug!(flag = %key, error = %e, "config file value rejected");
            errors.push(e);
        }
    }

    for key in document.keys() {
        if registry.lookup(key).is_none_or(|def| def.key() != key) {
            tracing::debug!(key = %key, "config file key matches no declared flag");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FlagError::Resolve(errors))
    }
}

fn apply(def: &mut FlagDefinition, value: &ConfigValue) -> Result<(), FlagError> {
    match value {
        ConfigValue::Scalar(text) => {
            let list_mode = match def.cell() {
                ValueCell::List { mode, .. } => Some(*mode),
                _ => None,
            };
            match list_mode {
                Some(mode) => set_list(def, tokenize::tokenize_one(mode, text)),
                None => def.set_from_text(text),
            }
        }
        ConfigValue::List(items) => {
            if def.cell().is_list() {
                set_list(def, items.clone())
            } else {
                Err(shape_mismatch(def, "a single value", "a list"))
            }
        }
        ConfigValue::Structured => {
            let expected = if def.cell().is_list() {
                "a list"
            } else {
                "a single value"
            };
            Err(shape_mismatch(def, expected, "a nested structure"))
        }
    }
}

fn set_list(def: &mut FlagDefinition, items: Vec<String>) -> Result<(), FlagError> {
    let key = def.key().to_string();
    def.cell_mut()
        .set_list(items)
        .map_err(|invalid| FlagError::Parse {
            flag: key,
            value: String::new(),
            reason: invalid.0,
        })
}

fn shape_mismatch(def: &FlagDefinition, expected: &'static str, found: &'static str) -> FlagError {
    FlagError::ShapeMismatch {
        flag: def.key().to_string(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{data_types_registry, doc};
    use crate::registry::Flag;
    use crate::tokenize::ListMode;
    use std::time::Duration;

    #[test]
    fn defaults_only() {
        let mut reg = data_types_registry();
        resolve(&mut reg, &ExplicitSet::new(), &ConfigDocument::new()).unwrap();
        assert_eq!(reg.get_str("string-value"), Some(""));
        assert_eq!(reg.get_int("int-value"), Some(0));
        assert_eq!(reg.get_bool("bool-value"), Some(false));
        assert_eq!(reg.get_duration("duration-value"), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn document_overrides_every_kind() {
        let mut reg = data_types_registry();
        let document = doc(&[
            ("string-value", ConfigValue::Scalar("test".into())),
            (
                "slice-value",
                ConfigValue::List(vec!["test".into(), "test2".into()]),
            ),
            ("int-value", ConfigValue::Scalar("543".into())),
            ("bool-value", ConfigValue::Scalar("true".into())),
            ("duration-value", ConfigValue::Scalar("2h".into())),
        ]);
        resolve(&mut reg, &ExplicitSet::new(), &document).unwrap();
        assert_eq!(reg.get_str("string-value"), Some("test"));
        assert_eq!(reg.get_list("slice-value").unwrap(), ["test", "test2"]);
        assert_eq!(reg.get_int("int-value"), Some(543));
        assert_eq!(reg.get_bool("bool-value"), Some(true));
        assert_eq!(reg.get_duration("duration-value"), Some(Duration::from_secs(7200)));
    }

    #[test]
    fn explicit_value_wins_over_document() {
        let mut reg = data_types_registry();
        reg.set("int-value", "7").unwrap();
        let explicit: ExplicitSet = ["int-value"].into_iter().collect();
        let document = doc(&[
            ("int-value", ConfigValue::Scalar("543".into())),
            ("bool-value", ConfigValue::Scalar("true".into())),
        ]);
        resolve(&mut reg, &explicit, &document).unwrap();
        assert_eq!(reg.get_int("int-value"), Some(7));
        assert_eq!(reg.get_bool("bool-value"), Some(true));
    }

    #[test]
    fn document_list_replaces_default_list() {
        let mut reg = Registry::new("tool");
        reg.declare(Flag::string_list("tags", &["a", "b"], ListMode::Verbatim));
        let document = doc(&[("tags", ConfigValue::List(vec!["c".into()]))]);
        resolve(&mut reg, &ExplicitSet::new(), &document).unwrap();
        assert_eq!(reg.get_list("tags").unwrap(), ["c"]);
    }

    #[test]
    fn scalar_for_list_is_tokenized_by_mode() {
        let mut reg = Registry::new("tool");
        reg.declare(Flag::string_list("csv", &[], ListMode::CommaSeparated));
        reg.declare(Flag::string_list("raw", &[], ListMode::Verbatim));
        let document = doc(&[
            ("csv", ConfigValue::Scalar("a,\"b\"".into())),
            ("raw", ConfigValue::Scalar("a,b".into())),
        ]);
        resolve(&mut reg, &ExplicitSet::new(), &document).unwrap();
        assert_eq!(reg.get_list("csv").unwrap(), ["a", "b"]);
        assert_eq!(reg.get_list("raw").unwrap(), ["a,b"]);
    }

    #[test]
    fn config_only_flag_resolves_from_document() {
        let mut reg = Registry::new("tool");
        reg.declare(Flag::string_list("config-only", &[], ListMode::Verbatim).config_only());
        let document = doc(&[(
            "config-only",
            ConfigValue::List(vec!["test".into(), "test2".into()]),
        )]);
        resolve(&mut reg, &ExplicitSet::new(), &document).unwrap();
        assert_eq!(reg.get_list("config-only").unwrap(), ["test", "test2"]);
    }

    #[test]
    fn errors_are_collected_and_other_flags_still_resolve() {
        let mut reg = data_types_registry();
        let document = doc(&[
            ("int-value", ConfigValue::List(vec!["1".into()])),
            ("bool-value", ConfigValue::Scalar("maybe".into())),
            ("string-value", ConfigValue::Scalar("kept".into())),
            ("duration-value", ConfigValue::Structured),
        ]);
        let err = resolve(&mut reg, &ExplicitSet::new(), &document).unwrap_err();
        let errors = match err {
            FlagError::Resolve(errors) => errors,
            other => panic!("Expected Resolve, got {other:?}"),
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| matches!(
            e,
            FlagError::ShapeMismatch { flag, .. } if flag == "int-value"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            FlagError::Parse { flag, .. } if flag == "bool-value"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            FlagError::ShapeMismatch { flag, .. } if flag == "duration-value"
        )));
        assert_eq!(reg.get_str("string-value"), Some("kept"));
    }

    #[test]
    fn unknown_document_keys_are_ignored() {
        let mut reg = data_types_registry();
        let document = doc(&[(
            "severity",
            ConfigValue::List(vec!["info".into(), "high".into()]),
        )]);
        resolve(&mut reg, &ExplicitSet::new(), &document).unwrap();
    }

    #[test]
    fn enum_resolves_by_name() {
        let mut reg = crate::fixtures::test::enum_registry();
        let document = doc(&[("enum-value", ConfigValue::Scalar("two".into()))]);
        resolve(&mut reg, &ExplicitSet::new(), &document).unwrap();
        assert_eq!(reg.get_enum("enum-value"), Some(2));

        let bad = doc(&[("enum-value", ConfigValue::Scalar("three".into()))]);
        assert!(resolve(&mut reg, &ExplicitSet::new(), &bad).is_err());
        assert_eq!(reg.get_enum("enum-value"), Some(2));
    }

    #[test]
    fn redeclared_flag_resolves_to_default_each_time() {
        let mut reg = Registry::new("tool");
        for _ in 0..2 {
            reg.declare(Flag::string("test", "compiled"));
            resolve(&mut reg, &ExplicitSet::new(), &ConfigDocument::new()).unwrap();
            assert_eq!(reg.get_str("test"), Some("compiled"));
        }
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn explicit_set_collects_keys() {
        let mut set = ExplicitSet::new();
        assert!(set.is_empty());
        set.insert("a");
        set.extend(["b"].into_iter().collect());
        assert!(set.contains("a") && set.contains("b"));
        assert_eq!(set.len(), 2);
    }
}
