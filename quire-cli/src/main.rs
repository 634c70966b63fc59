// Command-line interface for quire documents
//
// The quire program converts documents between the editor's interchange formats and gives
// developers a window into the node tree. The core capabilities live in the quire-babel crate;
// this binary only wires files, configuration and flags to it.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  quire <input> --to <format> [--from <format>] [--output <file>]          - Convert between formats (default)
//  quire convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  quire inspect <path>                     - Tree visualization of any parsable document
//  quire languages                          - Registered code-block languages
//  quire key <doc.json> <key> --anchor N    - Run the editor keymap on a JSON document
//  quire --list-formats                     - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format.
// Example:
//  quire doc.html --to markdown --extra-fence "~~~" --extra-heading-style setext
//
// Logging goes to stderr through tracing; set RUST_LOG (e.g. RUST_LOG=quire_babel=debug) to see
// parser fallbacks and command decisions. Stdout only ever carries converted output.

use clap::{Arg, ArgAction, Command, ValueHint};
use quire_babel::formats::json::{parse_from_json, serialize_to_json};
use quire_babel::{EditorState, FormatRegistry, Key, Keymap, Outcome, TextSelection};
use quire_config::{Loader, QuireConfig};
use std::collections::HashMap;
use std::fs;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "languages", "key", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // a following non-flag argument is the value
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with("--"));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("quire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and inspect quire documents")
        .long_about(
            "quire is a command-line tool for the editor's document formats.\n\n\
            Commands:\n  \
            - convert:   Transform between formats (json, html, markdown, text, treeviz)\n  \
            - inspect:   View the node tree of a document\n  \
            - languages: List registered code-block languages\n  \
            - key:       Run the editor keymap on a JSON document\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            quire page.html --to markdown                  # Convert to markdown (stdout)\n  \
            quire page.md --to json -o page.json           # Markdown to document JSON\n  \
            quire inspect page.json --extra-show-pos       # Tree with positions\n  \
            quire key page.json backspace --anchor 12      # Apply Backspace at position 12"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a quire.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the node tree of a document")
                .long_about(
                    "Parse a document and print its node tree, one node per line.\n\n\
                    Extra Parameters:\n  \
                    --extra-ast-full    List inline nodes and every attribute\n  \
                    --extra-show-pos    Prefix each node with its document position"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - json:     Document JSON, lossless (.json)\n  \
                    - html:     Editor HTML (.html)\n  \
                    - markdown: Extended Markdown (.md)\n  \
                    - text:     Plain text, output only (.txt)\n  \
                    - treeviz:  Tree visualization, output only\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    quire convert page.html --to markdown         # Convert to markdown (stdout)\n  \
                    quire convert page.md --to html -o page.html  # Markdown to HTML file\n  \
                    quire page.json --to text                     # 'convert' is optional"
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("languages").about("List the registered code-block languages"),
        )
        .subcommand(
            Command::new("key")
                .about("Run the editor keymap on a JSON document")
                .long_about(
                    "Load a document JSON file, place the selection, press a key and print\n\
                    the resulting document JSON. Prints 'declined' when no command handles\n\
                    the key at that selection.\n\n\
                    Examples:\n  \
                    quire key page.json backspace --anchor 12\n  \
                    quire key page.json tab --anchor 3 --head 7"
                )
                .arg(
                    Arg::new("input")
                        .help("Document JSON file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("key")
                        .help("Key to press")
                        .required(true)
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new([
                            "backspace",
                            "delete",
                            "enter",
                            "tab",
                        ])),
                )
                .arg(
                    Arg::new("anchor")
                        .long("anchor")
                        .help("Selection anchor position")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("head")
                        .long("head")
                        .help("Selection head position (defaults to the anchor)")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&config);
        return;
    }

    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let from = resolve_from(&config, path, sub_matches.get_one::<String>("from"));
            handle_inspect_command(path, &from, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from = resolve_from(&config, input, sub_matches.get_one::<String>("from"));
            let to = sub_matches.get_one::<String>("to").expect("to is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("languages", _)) => {
            handle_languages_command(&config);
        }
        Some(("key", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let key = sub_matches.get_one::<String>("key").expect("key is required");
            let anchor = *sub_matches
                .get_one::<usize>("anchor")
                .expect("anchor is required");
            let head = sub_matches.get_one::<usize>("head").copied().unwrap_or(anchor);
            handle_key_command(input, key, TextSelection::new(anchor, head));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Registry whose formats carry the configured options.
fn registry_from_config(config: &QuireConfig) -> FormatRegistry {
    FormatRegistry::new(&config.format_options())
}

/// Explicit --from, or the format detected from the file extension.
fn resolve_from(config: &QuireConfig, input: &str, explicit: Option<&String>) -> String {
    if let Some(from) = explicit {
        return from.to_string();
    }
    match registry_from_config(config).detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    from: &str,
    extra_params: &HashMap<String, String>,
    config: &QuireConfig,
) {
    let registry = registry_from_config(config);
    let source = read_input(path);
    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let params = build_inspect_params(config, extra_params);
    let output = registry
        .serialize_with_options(&doc, "treeviz", &params)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &QuireConfig,
) {
    let registry = registry_from_config(config);

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_input(input);

    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let result = registry
        .serialize_with_options(&doc, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
            tracing::info!(input, output = path, from, to, "converted");
        }
        None => print!("{result}"),
    }
}

/// Handle the languages command
fn handle_languages_command(config: &QuireConfig) {
    for language in config.languages().list() {
        println!("{language}");
    }
}

/// Handle the key command
fn handle_key_command(input: &str, key: &str, selection: TextSelection) {
    let source = read_input(input);
    let doc = parse_from_json(&source).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    let key: Key = key.parse().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let state = EditorState::new(doc, selection);
    let transaction = match Keymap::with_defaults().handle(&state, key) {
        Outcome::Apply(transaction) => transaction,
        Outcome::Decline => {
            println!("declined");
            return;
        }
    };
    let next = state.apply(&transaction).unwrap_or_else(|e| {
        eprintln!("Edit error: {e}");
        std::process::exit(1);
    });
    tracing::info!(
        anchor = next.selection.anchor,
        head = next.selection.head,
        "selection after edit"
    );

    let json = serialize_to_json(&next.doc, true).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    println!("{json}");
}

/// Handle the list-formats command
fn handle_list_formats_command(config: &QuireConfig) {
    let registry = registry_from_config(config);
    println!("Available formats:\n");
    for format_name in registry.list_formats() {
        let Ok(format) = registry.get(&format_name) else {
            continue;
        };
        println!(
            "  {format_name:<10} {:<7} {}",
            format.direction().to_string(),
            format.description()
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> QuireConfig {
    let loader = Loader::new().with_optional_file("quire.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Move inspect flags from the extras into the config; format options stay.
fn apply_config_overrides(config: &mut QuireConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("ast-full") {
        config.inspect.include_all = parse_bool_arg("ast-full", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["show-pos", "show-positions"]) {
        config.inspect.show_positions = parse_bool_arg("show-pos", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["default-language"]) {
        config.html.default_language = raw;
    }
}

fn build_inspect_params(
    config: &QuireConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert(
        "ast-full".to_string(),
        config.inspect.include_all.to_string(),
    );
    params.insert(
        "show-pos".to_string(),
        config.inspect.show_positions.to_string(),
    );

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
