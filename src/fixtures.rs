#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use crate::codec::{ConfigDocument, ConfigValue};
    use crate::registry::{Flag, Registry};
    use crate::tokenize::ListMode;
    use crate::value::Choice;

    /// One flag of every scalar kind plus a list, all with simple defaults.
    pub fn data_types_registry() -> Registry {
        let mut reg = Registry::new("testtool");
        reg.declare(
            Flag::string("string-value", "").description("Default value for a test flag example"),
        );
        reg.declare(
            Flag::string_list("slice-value", &[], ListMode::CommaSeparated)
                .description("String slice flag example value"),
        );
        reg.declare(Flag::int("int-value", 0).description("Int value example"));
        reg.declare(Flag::bool("bool-value", false).description("Bool value example"));
        reg.declare(
            Flag::duration("duration-value", Duration::from_secs(3600))
                .description("Duration value example"),
        );
        reg
    }

    pub fn choices() -> Vec<Choice> {
        vec![
            Choice::new("zero", 0),
            Choice::new("one", 1),
            Choice::new("two", 2),
        ]
    }

    pub fn enum_registry() -> Registry {
        let mut reg = Registry::new("testtool");
        reg.declare(
            Flag::enumeration("enum-value", 0, choices())
                .short("en")
                .description("Enum with default value(zero/one/two)"),
        );
        reg
    }

    pub fn doc(entries: &[(&str, ConfigValue)]) -> ConfigDocument {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn data_types_registry_loads_defaults() {
        let reg = data_types_registry();
        assert_eq!(reg.len(), 5);
        assert_eq!(reg.get_str("string-value"), Some(""));
        assert!(reg.get_list("slice-value").unwrap().is_empty());
        assert_eq!(reg.get_duration("duration-value"), Some(Duration::from_secs(3600)));
    }
}
