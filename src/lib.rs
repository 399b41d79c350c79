//! Typed command-line flags that fall back to a config file, then to compiled
//! defaults.
//!
//! Declare your flags once, parse, and read typed values back:
//!
//! ```no_run
//! use flagfig::{Flag, FlagSet, ListMode};
//!
//! let mut flags = FlagSet::new("scanner");
//! flags.set_group("input", "Input");
//! flags.declare(Flag::string_list("target", &[], ListMode::FileCommaSeparated)
//!     .short("u")
//!     .description("Targets to scan (file or comma separated)")
//!     .group("input"));
//! flags.declare(Flag::int("threads", 25).short("t").description("Number of threads"));
//! flags.parse()?;
//!
//! let threads = flags.registry().get_int("threads");
//! # Ok::<(), flagfig::FlagError>(())
//! ```
//!
//! That call walks the process arguments, looks for `config.yaml` in the
//! platform config directory for `scanner`, writes a commented-out skeleton
//! there if none exists, and otherwise fills every flag not given on the
//! command line from the file.
//!
//! # Precedence
//!
//! ```text
//! Compiled default      Flag::int("threads", 25)
//!        ↑ overridden by
//! Config file           threads: 50
//!        ↑ overridden by
//! Command line          -threads 100
//! ```
//!
//! A flag given on the command line is never touched by the config file, no
//! matter what the file contains for it. Config keys that match no declared
//! flag are ignored, so one config file can be shared between tool versions.
//!
//! # Flag kinds
//!
//! Strings, integers (decimal, `0x`, `0o`, `0b`), booleans, durations
//! (`1h30m`, `500ms`), enumerations over named constants, triggers that run a
//! callback when set, and string lists. A list flag picks a [`ListMode`]:
//!
//! - **`Verbatim`**: every occurrence appends its value unchanged. The default
//!   is dropped on the first occurrence.
//! - **`CommaSeparated`**: the value is split on commas, whole-token quotes
//!   are stripped, and the result replaces the list.
//! - **`FileCommaSeparated`**: like `CommaSeparated`, but a value naming a
//!   readable file contributes that file's lines instead.
//!
//! # Config file
//!
//! YAML by default; files ending in `.toml` or `.json` are decoded as such.
//! Top-level keys are flag keys (the long name, or the short name for flags
//! without one). A scalar sets a scalar flag; a list replaces a list flag.
//! Every failing entry is collected, the rest still apply, and the failures
//! are returned together as [`FlagError::Resolve`].
//!
//! # Usage text
//!
//! [`render`] lists flags grouped in the order their groups were first used,
//! with descriptions aligned per group and non-zero defaults appended.
//!
//! # Lower-level pieces
//!
//! [`FlagSet`] is a thin orchestration layer. Each step is available on its
//! own: build a [`Registry`], run [`walk`] (or the clap adapter), [`load`] or
//! [`decode`] a document, then call [`resolve`].
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`to_command`] builds a
//! `clap::Command` from a registry and [`apply_matches`] writes clap's results
//! back, returning the [`ExplicitSet`] the resolver needs.
//!
//! # Logging
//!
//! The crate emits `tracing` events (`debug` for decisions, `warn` for
//! recovered failures) and never installs a subscriber.

pub mod error;

#[cfg(feature = "clap")]
mod cli;
mod codec;
mod flagset;
mod paths;
mod registry;
mod resolve;
mod tokenize;
mod usage;
mod value;
mod walker;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{apply_matches, to_command};
pub use codec::{
    ConfigDocument, ConfigFormat, ConfigValue, decode, generate_default, load, write_default,
};
pub use error::FlagError;
pub use flagset::FlagSet;
pub use paths::{CONFIG_FILE_NAME, DirMover, FsDirMover, ToolPaths};
pub use registry::{DEFAULT_GROUP, Flag, FlagDefinition, Registry};
pub use resolve::{ExplicitSet, resolve};
pub use tokenize::{FsLineSource, LineSource, ListMode, tokenize, tokenize_one};
pub use usage::{render, render_flags};
pub use value::{Choice, InvalidText, ValueCell};
pub use walker::{WalkOutcome, walk};
