use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::FlagError;
use crate::paths::{DirMover, FsDirMover, ToolPaths};
use crate::registry::{Flag, FlagDefinition, Registry};
use crate::resolve::{self, ExplicitSet};
use crate::usage;
use crate::walker;

/// A registry plus everything needed to resolve it for one process run.
///
/// [`parse_from`](Self::parse_from) runs the whole pipeline:
///
/// 1. Move the legacy config directory into place (once).
/// 2. Walk the command line, applying flags and recording which were given.
/// 3. Locate the config file: [`set_config_file`](Self::set_config_file),
///    else the value of the [`config flag`](Self::set_config_flag), else
///    `config.yaml` in the tool's config directory. A missing default file
///    is created from the generated skeleton.
/// 4. Resolve every flag not given on the command line from that file.
#[derive(Debug)]
pub struct FlagSet {
    registry: Registry,
    explicit: ExplicitSet,
    positional: Vec<String>,
    config_file: Option<PathBuf>,
    config_flag: Option<String>,
    paths: Option<ToolPaths>,
    write_default_config: bool,
    mover: Box<dyn DirMover>,
    migrated: bool,
}

impl FlagSet {
    pub fn new(tool: &str) -> Self {
        Self {
            registry: Registry::new(tool),
            explicit: ExplicitSet::new(),
            positional: Vec::new(),
            config_file: None,
            config_flag: None,
            paths: ToolPaths::for_tool(tool),
            write_default_config: true,
            mover: Box::new(FsDirMover),
            migrated: false,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn declare(&mut self, flag: Flag) -> &mut FlagDefinition {
        self.registry.declare(flag)
    }

    pub fn set_group(&mut self, key: &str, label: &str) {
        self.registry.set_group(key, label);
    }

    pub fn create_group(&mut self, key: &str, label: &str, names: &[&str]) {
        self.registry.create_group(key, label, names);
    }

    pub fn set_description(&mut self, description: &str) {
        self.registry.set_description(description);
    }

    /// Read configuration from `path` instead of the tool's default location.
    pub fn set_config_file(&mut self, path: impl Into<PathBuf>) {
        self.config_file = Some(path.into());
    }

    /// Take the config file path from a declared string flag when it is set.
    pub fn set_config_flag(&mut self, name: &str) {
        self.config_flag = Some(name.to_string());
    }

    /// Replace the tool's config directory locations.
    pub fn set_tool_paths(&mut self, paths: ToolPaths) {
        self.paths = Some(paths);
    }

    pub fn set_dir_mover(&mut self, mover: impl DirMover + 'static) {
        self.mover = Box::new(mover);
    }

    /// Whether a missing default config file is created (default: `true`).
    pub fn write_default_config(&mut self, enabled: bool) {
        self.write_default_config = enabled;
    }

    /// Flags given on the command line so far.
    pub fn explicit(&self) -> &ExplicitSet {
        &self.explicit
    }

    /// Arguments left after flag parsing stopped.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Parse the process arguments.
    pub fn parse(&mut self) -> Result<(), FlagError> {
        self.parse_from(std::env::args().skip(1))
    }

    /// Parse `args` (without the program name) and resolve the config file.
    ///
    /// Command-line errors end parsing before the config file is read. Config
    /// file errors are returned after every resolvable flag has been resolved.
    pub fn parse_from<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.migrate();

        let outcome = walker::walk(&mut self.registry, args)?;
        self.explicit.extend(outcome.explicit);
        self.positional = outcome.positional;

        let Some(path) = self.effective_config_file() else {
            tracing::debug!("no config file location, using defaults and arguments only");
            return Ok(());
        };

        if self.is_default_location(&path) && !path.exists() {
            if self.write_default_config {
                match codec::write_default(&self.registry, &path) {
                    Ok(written) => tracing::debug!(path = %written.display(), "wrote default config file"),
                    Err(e) => tracing::warn!(error = %e, "could not write default config file"),
                }
            }
            return Ok(());
        }

        self.merge_config_file(&path)
    }

    /// Resolve all flags not given on the command line from the file at `path`.
    pub fn merge_config_file(&mut self, path: impl AsRef<Path>) -> Result<(), FlagError> {
        let path = path.as_ref();
        let document = codec::load(path).inspect_err(|e| {
            tracing::warn!(error = %e, "config file not applied");
        })?;
        resolve::resolve(&mut self.registry, &self.explicit, &document)
    }

    pub fn usage(&self) -> String {
        usage::render(&self.registry)
    }

    pub fn generate_default_config(&self) -> String {
        codec::generate_default(&self.registry)
    }

    fn migrate(&mut self) {
        if self.migrated {
            return;
        }
        self.migrated = true;
        let Some(paths) = &self.paths else {
            return;
        };
        if let Some(legacy) = &paths.legacy_dir
            && let Err(e) = self.mover.move_if_exists(legacy, &paths.config_dir)
        {
            tracing::warn!(error = %e, "config directory migration failed");
        }
    }

    fn effective_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_file {
            return Some(path.clone());
        }
        if let Some(flag) = &self.config_flag
            && let Some(value) = self.registry.get_str(flag)
            && !value.is_empty()
        {
            return Some(PathBuf::from(value));
        }
        self.paths.as_ref().map(ToolPaths::config_file)
    }

    fn is_default_location(&self, path: &Path) -> bool {
        self.paths
            .as_ref()
            .is_some_and(|paths| paths.config_file() == path)
    }
}
