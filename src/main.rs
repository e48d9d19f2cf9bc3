#![cfg_attr(not(windows), allow(dead_code))]

use anyhow::{bail, Result};
use clap::{crate_name, Args, Parser, Subcommand};
use registry_wrapper::{Payload, RootPolicy, ValueType};
use tracing::{metadata::LevelFilter, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run(cli)
}

fn setup_logging(verbose: bool) {
    let crate_level = if verbose { Level::TRACE } else { Level::INFO };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(cfg!(debug_assertions))
                .without_time(),
        )
        .with(
            filter::Targets::new()
                .with_default(LevelFilter::INFO)
                .with_target(crate_name!().replace('-', "_"), crate_level),
        )
        .init();
}

/// Write and delete Windows Registry keys and values
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reject paths without an HKCU\, HKLM\ or HKCR\ prefix instead of
    /// defaulting to HKCU
    #[arg(long, global = true)]
    strict: bool,

    /// Also show failures in a modal error dialog
    #[arg(long, global = true)]
    dialog: bool,

    /// Trace-level logging for registry calls
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn policy(&self) -> RootPolicy {
        if self.strict {
            RootPolicy::RequirePrefix
        } else {
            RootPolicy::DefaultToCurrentUser
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the key if needed and write one value
    Write(WriteValue),
    /// Delete a key that has no subkeys
    DeleteKey(DeleteKey),
    /// Delete one value from a key
    DeleteValue(DeleteValue),
    /// Print a value's type and data
    Query(QueryValue),
}

#[derive(Args)]
struct WriteValue {
    /// Key path, e.g. HKCU\Software\Test
    path: String,

    /// Value name; an empty string addresses the default value
    name: String,

    #[command(flatten)]
    data: WriteData,

    /// Type tag: REG_SZ, REG_DWORD, ... or a number. Defaults to the
    /// natural type of the data
    #[arg(long = "type", value_name = "TAG")]
    vtype: Option<ValueType>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct WriteData {
    /// String data, stored as UTF-16 with a terminator
    #[arg(long)]
    text: Option<String>,

    /// 32-bit integer data
    #[arg(long)]
    dword: Option<u32>,
}

enum Data<'a> {
    Text(&'a str),
    Dword(u32),
}

impl WriteData {
    fn data(&self) -> Result<Data<'_>> {
        match (self.text.as_deref(), self.dword) {
            (Some(text), None) => Ok(Data::Text(text)),
            (None, Some(dword)) => Ok(Data::Dword(dword)),
            _ => bail!("exactly one of --text or --dword is required"),
        }
    }
}

impl WriteValue {
    fn value_type(&self, data: &Data<'_>) -> ValueType {
        self.vtype.unwrap_or_else(|| match data {
            Data::Text(text) => text.default_type(),
            Data::Dword(dword) => dword.default_type(),
        })
    }
}

#[derive(Args)]
struct DeleteKey {
    path: String,
}

#[derive(Args)]
struct DeleteValue {
    path: String,
    name: String,
}

#[derive(Args)]
struct QueryValue {
    path: String,
    name: String,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[cfg(windows)]
fn run(cli: Cli) -> Result<()> {
    use registry_wrapper::{Registry, Reporter};
    use serde::Serialize;
    use tracing::info;

    let policy = cli.policy();
    let registry = Registry::with_policy(policy);

    // Dialog first, then the error still reaches the exit status.
    let surface = |result: registry_wrapper::Result| -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                if cli.dialog {
                    Reporter::Dialog.report(&e);
                }
                Err(e.into())
            }
        }
    };

    match cli.command {
        Commands::Write(args) => {
            let data = args.data.data()?;
            let vtype = args.value_type(&data);
            let result = match data {
                Data::Text(text) => registry.write_text(&args.path, &args.name, text, vtype),
                Data::Dword(dword) => registry.write_dword(&args.path, &args.name, dword, vtype),
            };
            surface(result)?;
            info!("Wrote {}", args.name);
        }
        Commands::DeleteKey(args) => {
            surface(registry.delete_key(&args.path))?;
            info!("Deleted key {}", args.path);
        }
        Commands::DeleteValue(args) => {
            surface(registry.delete_value(&args.path, &args.name))?;
            info!("Deleted value {}", args.name);
        }
        Commands::Query(args) => {
            let value = match registry.query_value(&args.path, &args.name) {
                Ok(value) => value,
                Err(e) => return surface(Err(e)),
            };

            if args.json {
                #[derive(Serialize)]
                struct Output<'a> {
                    root: registry_wrapper::Root,
                    subkey: &'a str,
                    name: &'a str,
                    vtype: ValueType,
                    raw_type: u32,
                    text: Option<String>,
                    dword: Option<u32>,
                    bytes: &'a [u8],
                }

                let target = policy.resolve(&args.path)?;
                let output = Output {
                    root: target.root,
                    subkey: target.subkey,
                    name: &args.name,
                    vtype: value.vtype,
                    raw_type: value.vtype.as_raw(),
                    text: value.as_text(),
                    dword: value.as_dword(),
                    bytes: &value.bytes,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let data = match value.vtype {
                    ValueType::Dword => value.as_dword().map(|d| format!("{d:#x}")),
                    ValueType::String | ValueType::ExpandString => value.as_text(),
                    _ => None,
                }
                .unwrap_or_else(|| {
                    value
                        .bytes
                        .iter()
                        .map(|b| format!("{b:02X}"))
                        .collect::<String>()
                });
                println!("{}    {}    {data}", args.name, value.vtype);
            }
        }
    }

    Ok(())
}

#[cfg(not(windows))]
fn run(_cli: Cli) -> Result<()> {
    anyhow::bail!("the Windows registry is not available on this platform")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse_write(args: &[&str]) -> WriteValue {
        let cli = Cli::try_parse_from(["regwrap", "write"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Write(write) => write,
            _ => panic!("expected the write subcommand"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_write_text_defaults_to_string_type() {
        let write = parse_write(&[r"HKCU\Software\Test", "Sample", "--text", "hello"]);
        assert_eq!(write.path, r"HKCU\Software\Test");
        assert_eq!(write.name, "Sample");

        let data = write.data.data().unwrap();
        assert!(matches!(data, Data::Text("hello")));
        assert_eq!(write.value_type(&data), ValueType::String);
    }

    #[test]
    fn test_write_dword_defaults_to_dword_type() {
        let write = parse_write(&[r"HKLM\System\Test", "Flag", "--dword", "1"]);
        let data = write.data.data().unwrap();
        assert!(matches!(data, Data::Dword(1)));
        assert_eq!(write.value_type(&data), ValueType::Dword);
    }

    #[test]
    fn test_explicit_type_overrides_default() {
        let write = parse_write(&["P", "N", "--dword", "1", "--type", "REG_BINARY"]);
        let data = write.data.data().unwrap();
        assert_eq!(write.value_type(&data), ValueType::Binary);

        let write = parse_write(&["P", "N", "--text", "x", "--type", "0x2"]);
        let data = write.data.data().unwrap();
        assert_eq!(write.value_type(&data), ValueType::ExpandString);
    }

    #[test]
    fn test_write_requires_exactly_one_data_arg() {
        let both = ["regwrap", "write", "P", "N", "--text", "x", "--dword", "1"];
        assert!(Cli::try_parse_from(both).is_err());

        let neither = ["regwrap", "write", "P", "N"];
        assert!(Cli::try_parse_from(neither).is_err());
    }

    #[test]
    fn test_invalid_type_tag_rejected() {
        let args = ["regwrap", "write", "P", "N", "--text", "x", "--type", "REG_NOPE"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_strict_selects_require_prefix() {
        let cli = Cli::try_parse_from(["regwrap", "delete-key", "P", "--strict"]).unwrap();
        assert_eq!(cli.policy(), RootPolicy::RequirePrefix);

        let cli = Cli::try_parse_from(["regwrap", "delete-key", "P"]).unwrap();
        assert_eq!(cli.policy(), RootPolicy::DefaultToCurrentUser);
    }

    #[test]
    fn test_delete_and_query_subcommands_parse() {
        let cli = Cli::try_parse_from(["regwrap", "delete-value", "P", "N"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteValue(_)));

        let cli = Cli::try_parse_from(["regwrap", "query", "P", "N", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Query(QueryValue { json: true, .. })));
    }
}
