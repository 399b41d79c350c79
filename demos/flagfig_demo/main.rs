//! # flagfig demo application
//!
//! A pretend scanner that shows how a tool wires its flags through flagfig.
//! It does no scanning; it prints the values it resolved.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagfig_demo -- -u example.com,example.org -t 50
//! cargo run --example flagfig_demo -- -h
//! ```
//!
//! | Feature                 | How to exercise it                                               |
//! |-------------------------|------------------------------------------------------------------|
//! | Compiled defaults       | run with no arguments                                            |
//! | Config file skeleton    | first run writes `config.yaml` in the platform config directory  |
//! | Config file values      | uncomment a line in that file, then run again                    |
//! | Command line wins       | set `threads` in the file, then pass `-t 5`                      |
//! | File-or-comma lists     | `-u targets.txt` or `-u a.com,b.com`                             |
//! | Repeated headers        | `-H "X-A: 1" -H "X-B: 2"`                                        |
//! | Enumerations            | `-severity high`                                                 |
//! | Alternate config file   | `-config ./scan.toml`                                            |
//! | Usage text              | `-h`                                                             |

use std::process::ExitCode;
use std::time::Duration;

use flagfig::{Choice, Flag, FlagError, FlagSet, ListMode};

fn build() -> FlagSet {
    let mut flags = FlagSet::new("flagfig-demo");
    flags.set_description("flagfig-demo pretends to scan targets and prints what it resolved.");

    flags.set_group("input", "Input");
    flags.declare(
        Flag::string_list("target", &[], ListMode::FileCommaSeparated)
            .short("u")
            .description("Targets to scan (file or comma separated)")
            .group("input"),
    );

    flags.set_group("request", "Request");
    flags.declare(
        Flag::string_list("header", &[], ListMode::Verbatim)
            .short("H")
            .description("Custom header to send with each request")
            .group("request"),
    );
    flags.declare(
        Flag::duration("timeout", Duration::from_secs(10))
            .description("Time to wait for a response")
            .group("request"),
    );
    flags.declare(
        Flag::enumeration(
            "severity",
            0,
            vec![
                Choice::new("low", 0),
                Choice::new("medium", 1),
                Choice::new("high", 2),
            ],
        )
        .description("Lowest severity to report (low/medium/high)")
        .group("request"),
    );

    flags.set_group("optimization", "Optimization");
    flags.declare(
        Flag::int("threads", 25)
            .short("t")
            .description("Number of concurrent workers")
            .group("optimization"),
    );

    flags.set_group("output", "Output");
    flags.declare(
        Flag::bool("silent", false)
            .description("Show only results")
            .group("output"),
    );
    flags.declare(
        Flag::string("config", "")
            .description("Path to an alternate config file")
            .group("output"),
    );
    flags.declare(Flag::string("api-key", "").config_only());

    flags.set_config_flag("config");
    flags
}

fn main() -> ExitCode {
    let mut flags = build();

    match flags.parse() {
        Ok(()) => {}
        Err(FlagError::HelpRequested) => {
            print!("{}", flags.usage());
            return ExitCode::SUCCESS;
        }
        Err(FlagError::Resolve(errors)) => {
            for e in &errors {
                eprintln!("warning: {e}");
            }
        }
        Err(e) => {
            eprintln!("{e}\n\n{}", flags.usage());
            return ExitCode::FAILURE;
        }
    }

    let reg = flags.registry();
    let targets = reg.get_list("target").unwrap_or_default();
    let headers = reg.get_list("header").unwrap_or_default();
    let timeout = reg.get_duration("timeout").unwrap_or_default();

    println!("targets   {targets:?}");
    println!("headers   {headers:?}");
    println!("timeout   {}", humantime::format_duration(timeout));
    println!("severity  {}", reg.get_enum("severity").unwrap_or_default());
    println!("threads   {}", reg.get_int("threads").unwrap_or_default());
    println!("silent    {}", reg.get_bool("silent").unwrap_or_default());
    println!(
        "api key   {}",
        if reg.get_str("api-key").is_some_and(|k| !k.is_empty()) { "set" } else { "unset" }
    );
    if !flags.positional().is_empty() {
        println!("extra     {:?}", flags.positional());
    }
    ExitCode::SUCCESS
}
