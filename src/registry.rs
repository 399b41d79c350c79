//! Flag declarations and the registry that holds them.
//!
//! Flags are declared through the [`Flag`] builder and stored in declaration
//! order. Both long and short names resolve to the same definition. Groups keep
//! the order in which they were first used, since usage text lists them that
//! way.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::FlagError;
use crate::tokenize::ListMode;
use crate::value::{Callback, Choice, ValueCell};

/// Group key used when a flag does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Builder for a flag declaration. Pass it to [`Registry::declare`].
#[derive(Debug)]
pub struct Flag {
    long: String,
    short: String,
    description: String,
    group: String,
    config_only: bool,
    cell: ValueCell,
}

impl Flag {
    fn new(long: &str, cell: ValueCell) -> Self {
        Self {
            long: long.to_string(),
            short: String::new(),
            description: String::new(),
            group: DEFAULT_GROUP.to_string(),
            config_only: false,
            cell,
        }
    }

    pub fn string(long: &str, default: &str) -> Self {
        Self::new(long, ValueCell::String(default.to_string()))
    }

    pub fn string_list(long: &str, default: &[&str], mode: ListMode) -> Self {
        let items = default.iter().map(|s| s.to_string()).collect();
        Self::new(long, ValueCell::list(items, mode))
    }

    pub fn int(long: &str, default: i64) -> Self {
        Self::new(long, ValueCell::Int(default))
    }

    pub fn bool(long: &str, default: bool) -> Self {
        Self::new(long, ValueCell::Bool(default))
    }

    pub fn duration(long: &str, default: Duration) -> Self {
        Self::new(long, ValueCell::Duration(default))
    }

    /// An enumeration over named constants, defaulting to `default`.
    ///
    /// # Panics
    ///
    /// Panics if `default` is not the value of one of `choices`.
    pub fn enumeration(long: &str, default: i64, choices: Vec<Choice>) -> Self {
        assert!(
            choices.iter().any(|c| c.value == default),
            "flagfig: default {default} of enumeration flag '{long}' is not one of its choices"
        );
        Self::new(
            long,
            ValueCell::Enum {
                current: default,
                choices,
            },
        )
    }

    /// A switch that runs `callback` when set to true.
    pub fn trigger(long: &str, callback: impl FnMut() + 'static) -> Self {
        let callback: Callback = Box::new(callback);
        Self::new(
            long,
            ValueCell::Trigger {
                fired: false,
                callback,
            },
        )
    }

    pub fn short(mut self, short: &str) -> Self {
        self.short = short.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    /// Only settable from the config file; the argument walker never sees it.
    pub fn config_only(mut self) -> Self {
        self.config_only = true;
        self
    }
}

/// A declared flag: names, metadata, default, and live value.
#[derive(Debug)]
pub struct FlagDefinition {
    pub(crate) long: String,
    pub(crate) short: String,
    pub(crate) description: String,
    pub(crate) group: String,
    pub(crate) config_only: bool,
    pub(crate) default_text: String,
    pub(crate) default_is_zero: bool,
    pub(crate) default_annotation: String,
    pub(crate) cell: ValueCell,
    /// Position on the registry's declaration timeline.
    pub(crate) seq: usize,
}

impl FlagDefinition {
    /// The name the flag is known by in config files and the explicit set:
    /// its long name, or its short name when it has no long one.
    pub fn key(&self) -> &str {
        if self.long.is_empty() {
            &self.short
        } else {
            &self.long
        }
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Move the flag into `group`. Chains after [`Registry::declare`].
    pub fn set_group(&mut self, group: &str) -> &mut Self {
        self.group = group.to_string();
        self
    }

    pub fn is_config_only(&self) -> bool {
        self.config_only
    }

    /// Textual form of the compiled-in default.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    pub fn cell(&self) -> &ValueCell {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut ValueCell {
        &mut self.cell
    }

    /// Apply one raw value, naming the flag in any error.
    pub fn set_from_text(&mut self, raw: &str) -> Result<(), FlagError> {
        self.cell
            .set_from_text(raw)
            .map_err(|invalid| FlagError::Parse {
                flag: self.key().to_string(),
                value: raw.to_string(),
                reason: invalid.0,
            })
    }
}

/// Panic unless the flag has at least one name and every name could be
/// written on a command line.
pub(crate) fn validate_names(long: &str, short: &str) {
    if long.is_empty() && short.is_empty() {
        panic!("flagfig: flag declared without a long or short name");
    }
    for name in [long, short] {
        if name.chars().any(char::is_whitespace) {
            panic!("flagfig: flag name {name:?} contains whitespace");
        }
        if name.starts_with('-') {
            panic!("flagfig: flag name {name:?} begins with '-'");
        }
        if name.contains('=') {
            panic!("flagfig: flag name {name:?} contains '='");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupInfo {
    pub(crate) key: String,
    pub(crate) label: Option<String>,
    /// Earliest point on the declaration timeline the group was used.
    pub(crate) position: usize,
}

/// All declared flags of one tool.
///
/// A registry is a plain value: create as many as needed, there is no
/// process-wide instance.
#[derive(Debug)]
pub struct Registry {
    tool: String,
    description: String,
    generator: String,
    flags: Vec<FlagDefinition>,
    by_long: HashMap<String, usize>,
    by_short: HashMap<String, usize>,
    /// Groups given a label through [`Registry::set_group`].
    groups: Vec<GroupInfo>,
    next_seq: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl Registry {
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            description: String::new(),
            generator: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_string(),
            flags: Vec::new(),
            by_long: HashMap::new(),
            by_short: HashMap::new(),
            groups: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// One-paragraph description printed above the usage text.
    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Identity written into generated config files (`# generated by ...`).
    pub fn set_generator(&mut self, generator: &str) {
        self.generator = generator.to_string();
    }

    /// Declare a flag.
    ///
    /// Re-declaring an existing long name replaces that definition in place.
    ///
    /// # Panics
    ///
    /// Panics if the flag has neither a long nor a short name, if a name
    /// contains whitespace or `=` or begins with `-`, or if either name
    /// already belongs to another flag.
    pub fn declare(&mut self, flag: Flag) -> &mut FlagDefinition {
        validate_names(&flag.long, &flag.short);

        let existing = if flag.long.is_empty() {
            self.by_short.get(&flag.short).copied().filter(|&i| self.flags[i].long.is_empty())
        } else {
            self.by_long.get(&flag.long).copied()
        };

        if !flag.short.is_empty()
            && let Some(&owner) = self.by_short.get(&flag.short)
            && Some(owner) != existing
        {
            panic!(
                "flagfig: short name '{}' is already used by flag '{}'",
                flag.short,
                self.flags[owner].key()
            );
        }
        if !flag.short.is_empty()
            && let Some(&owner) = self.by_long.get(&flag.short)
            && Some(owner) != existing
        {
            panic!(
                "flagfig: short name '{}' is already used as a long name by flag '{}'",
                flag.short,
                self.flags[owner].key()
            );
        }
        if !flag.long.is_empty()
            && let Some(&owner) = self.by_short.get(&flag.long)
            && Some(owner) != existing
        {
            panic!(
                "flagfig: long name '{}' is already used as a short name by flag '{}'",
                flag.long,
                self.flags[owner].key()
            );
        }

        let seq = match existing {
            Some(index) => self.flags[index].seq,
            None => self.next_position(),
        };
        let definition = FlagDefinition {
            default_text: flag.cell.current_text(),
            default_is_zero: flag.cell.is_zero(),
            default_annotation: flag.cell.default_annotation(),
            long: flag.long,
            short: flag.short,
            description: flag.description,
            group: flag.group,
            config_only: flag.config_only,
            cell: flag.cell,
            seq,
        };

        let index = match existing {
            Some(index) => {
                tracing::debug!(flag = definition.key(), "flag re-declared, replacing definition");
                let old = std::mem::replace(&mut self.flags[index], definition);
                if !old.short.is_empty() {
                    self.by_short.remove(&old.short);
                }
                index
            }
            None => {
                self.flags.push(definition);
                self.flags.len() - 1
            }
        };

        let def = &self.flags[index];
        if !def.long.is_empty() {
            self.by_long.insert(def.long.clone(), index);
        }
        if !def.short.is_empty() {
            self.by_short.insert(def.short.clone(), index);
        }
        &mut self.flags[index]
    }

    fn next_position(&mut self) -> usize {
        let position = self.next_seq;
        self.next_seq += 1;
        position
    }

    /// Give a group a display label. The first use of a group fixes its position.
    pub fn set_group(&mut self, key: &str, label: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.key == key) {
            group.label = Some(label.to_string());
            return;
        }
        let position = self.next_position();
        self.groups.push(GroupInfo {
            key: key.to_string(),
            label: Some(label.to_string()),
            position,
        });
    }

    /// Label a group and move the named flags into it.
    pub fn create_group(&mut self, key: &str, label: &str, names: &[&str]) {
        self.set_group(key, label);
        for name in names {
            match self.lookup_mut(name) {
                Some(def) => {
                    def.set_group(key);
                }
                None => tracing::debug!(flag = %name, group = %key, "group names an undeclared flag"),
            }
        }
    }

    /// Non-empty groups in first-use order.
    ///
    /// A group is used first either when it is labeled or when its earliest
    /// member flag was declared, whichever came sooner. Moving a flag with
    /// [`FlagDefinition::set_group`] counts from that flag's declaration.
    pub(crate) fn ordered_groups(&self) -> Vec<GroupInfo> {
        let mut groups = self.groups.clone();
        for flag in &self.flags {
            match groups.iter_mut().find(|g| g.key == flag.group) {
                Some(group) => group.position = group.position.min(flag.seq),
                None => groups.push(GroupInfo {
                    key: flag.group.clone(),
                    label: None,
                    position: flag.seq,
                }),
            }
        }
        groups.retain(|g| self.flags.iter().any(|f| f.group == g.key));
        groups.sort_by_key(|g| g.position);
        groups
    }

    /// Find a flag by long or short name. Long names win on a clash.
    pub fn lookup(&self, name: &str) -> Option<&FlagDefinition> {
        self.index_of(name).map(|i| &self.flags[i])
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut FlagDefinition> {
        self.index_of(name).map(move |i| &mut self.flags[i])
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.by_long
            .get(name)
            .or_else(|| self.by_short.get(name))
            .copied()
    }

    /// All flags in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = &FlagDefinition> {
        self.flags.iter()
    }

    pub(crate) fn flags_mut(&mut self) -> impl Iterator<Item = &mut FlagDefinition> {
        self.flags.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Set a flag programmatically, as if it were given once on the command line.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), FlagError> {
        self.lookup_mut(name)
            .ok_or_else(|| FlagError::UnknownFlag(name.to_string()))?
            .set_from_text(raw)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.lookup(name)?.cell() {
            ValueCell::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        match self.lookup(name)?.cell() {
            ValueCell::List { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.lookup(name)?.cell() {
            ValueCell::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.lookup(name)?.cell() {
            ValueCell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get_duration(&self, name: &str) -> Option<Duration> {
        match self.lookup(name)?.cell() {
            ValueCell::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// The selected constant of an enumeration flag.
    pub fn get_enum(&self, name: &str) -> Option<i64> {
        match self.lookup(name)?.cell() {
            ValueCell::Enum { current, .. } => Some(*current),
            _ => None,
        }
    }

    pub fn trigger_fired(&self, name: &str) -> Option<bool> {
        match self.lookup(name)?.cell() {
            ValueCell::Trigger { fired, .. } => Some(*fired),
            _ => None,
        }
    }
}
