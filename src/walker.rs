//! Built-in argument walker.
//!
//! Accepts `-name`, `--name`, `-name=value`, `--name=value` and `-name value`
//! for long and short names alike. Switches (booleans and triggers) never take
//! the following argument; give them an explicit value with `-name=false`.
//! Walking stops at `--` or at the first argument that is not a flag; the rest
//! is returned as positional arguments.
//!
//! Every recognized occurrence is applied to its cell immediately, in
//! command-line order, and the flag is recorded in the [`ExplicitSet`]. The
//! first problem ends the walk; occurrences already applied stay applied.

use crate::error::FlagError;
use crate::registry::Registry;
use crate::resolve::ExplicitSet;

/// What the walker saw on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub explicit: ExplicitSet,
    pub positional: Vec<String>,
}

/// Walk `args` (without the program name), applying each flag to `registry`.
pub fn walk<I, S>(registry: &mut Registry, args: I) -> Result<WalkOutcome, FlagError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut outcome = WalkOutcome::default();

    while let Some(arg) = args.next() {
        if arg == "--" {
            outcome.positional.extend(args);
            break;
        }
        let Some(body) = flag_body(&arg) else {
            outcome.positional.push(arg);
            outcome.positional.extend(args);
            break;
        };

        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };

        let known = registry
            .lookup(name)
            .filter(|def| !def.is_config_only())
            .map(|def| (def.key().to_string(), def.cell().is_switch()));
        let Some((key, is_switch)) = known else {
            if matches!(name, "h" | "help") {
                return Err(FlagError::HelpRequested);
            }
            return Err(FlagError::UnknownFlag(name.to_string()));
        };

        let value = match inline {
            Some(value) => value,
            None if is_switch => "true".to_string(),
            None => args
                .next()
                .ok_or_else(|| FlagError::MissingValue(name.to_string()))?,
        };

        tracing::debug!(flag = %key, value = %value, "flag set from command line");
        registry.set(&key, &value)?;
        outcome.explicit.insert(&key);
    }

    Ok(outcome)
}

/// The part after one or two leading dashes, if `arg` looks like a flag.
fn flag_body(arg: &str) -> Option<&str> {
    let body = arg
        .strip_prefix("--")
        .or_else(|| arg.strip_prefix('-'))?;
    if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
        return None;
    }
    Some(body)
}
