//! Clap adapter for flagfig.
//!
//! This module is the optional bridge between a [`Registry`] and the
//! [clap](https://docs.rs/clap) parser, compiled only with the `clap` Cargo
//! feature (on by default). Use it when an application already parses its
//! arguments with clap and wants flagfig's config file resolution on top.
//!
//! [`to_command`] turns the registry into a `clap::Command`; after clap has
//! parsed, [`apply_matches`] writes every occurrence back into the registry in
//! command-line order and returns the [`ExplicitSet`] for
//! [`resolve`](crate::resolve).
//!
//! Clap only allows single-character short options, so a multi-character
//! short name such as `ts2` is accepted as `--ts2` instead.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::FlagError;
use crate::registry::{FlagDefinition, Registry};
use crate::resolve::ExplicitSet;

/// Build a `clap::Command` with one argument per flag settable on the command
/// line. Config-only flags are left out.
///
/// Clap's own `-h/--help` flag is disabled so a registry may declare `h`.
pub fn to_command(registry: &Registry) -> Command {
    let mut cmd = Command::new(registry.tool().to_string()).disable_help_flag(true);
    if !registry.description().is_empty() {
        cmd = cmd.about(registry.description().to_string());
    }
    for def in registry.flags().filter(|def| !def.is_config_only()) {
        cmd = cmd.arg(to_arg(def));
    }
    cmd
}

fn to_arg(def: &FlagDefinition) -> Arg {
    let mut arg = Arg::new(def.key().to_string())
        .help(def.description().to_string())
        .action(ArgAction::Append);

    let short = single_char(def.short());
    if !def.long().is_empty() {
        arg = arg.long(def.long().to_string());
    }
    match short {
        Some(c) => arg = arg.short(c),
        None if def.short().is_empty() => {}
        None if def.long().is_empty() => arg = arg.long(def.short().to_string()),
        None => arg = arg.alias(def.short().to_string()),
    }

    if def.cell().is_switch() {
        arg.num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    } else {
        arg.num_args(1).allow_hyphen_values(true)
    }
}

fn single_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Apply parsed matches to `registry`, in the order the values appeared on
/// the command line, and report which flags were given.
///
/// `matches` must come from a command built by [`to_command`] for the same
/// registry.
pub fn apply_matches(registry: &mut Registry, matches: &ArgMatches) -> Result<ExplicitSet, FlagError> {
    let mut occurrences: Vec<(usize, String, String)> = Vec::new();
    for def in registry.flags().filter(|def| !def.is_config_only()) {
        let key = def.key();
        let (Some(indices), Some(raw)) = (matches.indices_of(key), matches.get_raw(key)) else {
            continue;
        };
        for (index, value) in indices.zip(raw) {
            occurrences.push((index, key.to_string(), value.to_string_lossy().into_owned()));
        }
    }
    occurrences.sort_by_key(|(index, _, _)| *index);

    let mut explicit = ExplicitSet::new();
    for (_, key, value) in occurrences {
        tracing::debug!(flag = %key, value = %value, "flag set from clap matches");
        registry.set(&key, &value)?;
        explicit.insert(&key);
    }
    Ok(explicit)
}
