/*!
guestnet renders a VM guest's static network configuration and prints it as JSON.

* `render`: given the box name, the guest's target IP, and a TOML network spec, print the config
  file path, config file content, and apply command
* `resolve`: print the OS identity a box name maps to
* `list`: print the ordered box pattern table

The network spec file has the following shape:

```toml
[vnic]
ip = "10.0.0.1"
prefix_length = 24

[dns]
dns1 = "8.8.8.8"
dns2 = "8.8.4.4"
```
*/

#![deny(rust_2018_idioms)]

#[macro_use]
extern crate log;

use argh::FromArgs;
use guestnet::{os_id, GuestConfig, NetworkSpec, OsId};
use serde::Serialize;
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use snafu::ResultExt;
use std::path::PathBuf;
use std::process;

/// Stores user-supplied arguments.
#[derive(FromArgs, PartialEq, Debug)]
struct Args {
    /// log-level trace|debug|info|warn|error
    #[argh(option, default = "LevelFilter::Info")]
    log_level: LevelFilter,

    #[argh(subcommand)]
    subcommand: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommand {
    Render(RenderArgs),
    Resolve(ResolveArgs),
    List(ListArgs),
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "render")]
/// Render the network configuration for a guest
struct RenderArgs {
    #[argh(option, short = 'b', long = "box")]
    /// name of the box image the guest was built from
    box_name: String,

    #[argh(option, short = 'i')]
    /// IP address to assign to the guest
    target_ip: String,

    #[argh(option, short = 'n')]
    /// path to the TOML network spec
    network_spec: PathBuf,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "resolve")]
/// Print the OS identity for a box name
struct ResolveArgs {
    #[argh(option, short = 'b', long = "box")]
    /// name of the box image
    box_name: String,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "list")]
/// Print the box patterns used to identify guest OSes, in match order
struct ListArgs {}

#[derive(Debug, Serialize)]
struct BoxPattern {
    pattern: &'static str,
    os: OsId,
}

/// Helper function that serializes the input to JSON and prints it
fn print_json<S>(val: &S) -> Result<()>
where
    S: Serialize,
{
    let output = serde_json::to_string_pretty(val).context(error::JsonSerializeSnafu)?;
    println!("{}", output);
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let network_spec =
        NetworkSpec::from_path(&args.network_spec).context(error::GuestnetSnafu)?;
    debug!(
        "Loaded network spec from '{}'",
        args.network_spec.display()
    );
    let guest_config = GuestConfig::default();
    let rendered = guest_config
        .get_network_config(args.target_ip, &network_spec, &args.box_name)
        .context(error::GuestnetSnafu)?;
    print_json(&rendered)
}

fn resolve(args: ResolveArgs) -> Result<()> {
    let os = os_id::resolve(&args.box_name).context(error::GuestnetSnafu)?;
    info!("Box '{}' is a {} guest", args.box_name, os);
    print_json(&os)
}

fn list() -> Result<()> {
    let patterns: Vec<BoxPattern> = os_id::box_patterns()
        .iter()
        .map(|(pattern, os)| BoxPattern {
            pattern: *pattern,
            os: *os,
        })
        .collect();
    print_json(&patterns)
}

fn run() -> Result<()> {
    let args: Args = argh::from_env();

    // Logs go to stderr; stdout is reserved for JSON output.
    TermLogger::init(
        args.log_level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context(error::LoggerSnafu)?;

    match args.subcommand {
        SubCommand::Render(render_args) => render(render_args),
        SubCommand::Resolve(resolve_args) => resolve(resolve_args),
        SubCommand::List(_) => list(),
    }
}

// Returning a Result from main makes it print a Debug representation of the error, but with Snafu
// we have nice Display representations of the error, so we wrap "main" (run) and print any error.
// https://github.com/shepmaster/snafu/issues/110
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Potential errors during `guestnet` execution.
mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(super)))]
    pub(super) enum Error {
        #[snafu(display("{}", source))]
        Guestnet { source: guestnet::Error },

        #[snafu(display("Error serializing output to JSON: {}", source))]
        JsonSerialize { source: serde_json::error::Error },

        #[snafu(display("Logger setup error: {}", source))]
        Logger { source: log::SetLoggerError },
    }
}

type Result<T> = std::result::Result<T, error::Error>;
