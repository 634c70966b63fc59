use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the built-in formats from quire-babel's registry
// We need to duplicate this here since build scripts can't access the library
const AVAILABLE_FORMATS: &[&str] = &["html", "json", "markdown", "text", "treeviz"];

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("quire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and inspect quire documents")
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a quire.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats")
                .arg(path_arg("input", "Input file path"))
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the node tree of a document")
                .arg(path_arg("path", "Path to the document"))
                .arg(format_arg("from", "Source format")),
        )
        .subcommand(Command::new("languages").about("List the registered code-block languages"))
        .subcommand(
            Command::new("key")
                .about("Run the editor keymap on a JSON document")
                .arg(path_arg("input", "Document JSON file"))
                .arg(
                    Arg::new("key")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new([
                            "backspace",
                            "delete",
                            "enter",
                            "tab",
                        ])),
                )
                .arg(Arg::new("anchor").long("anchor"))
                .arg(Arg::new("head").long("head")),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "quire", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "quire", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "quire", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
