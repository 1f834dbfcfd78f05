// Command-line interface for sdoc
//
// A thin shell over the sdoc-babel conversion engine. Every conversion pivots
// through the canonical sdoc tree; the CLI only reads files, picks formats and
// writes the result.
//
// Usage:
//  sdoc <input> --to <format> [--from <format>] [--output <file>]          - Convert (default command)
//  sdoc convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  sdoc formats                                                            - List registered formats
//
// Images referenced by converted documents live in a local asset store rooted
// at --assets (or `assets.root` from the configuration).
//
// Extra Parameters:
//
// Converter settings can be overridden per run with --extra-<setting> <value>.
// The CLI strips the "extra-" prefix and layers the value over the `convert`
// section of the configuration, e.g. `--extra-table-width 900`.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{debug, info};
use sdoc_babel::{write_artifact, Artifact, Converter, Format, FormatRegistry, LocalAssetStore};
use sdoc_config::{Loader, SdocConfig};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Converter settings that may be overridden with --extra-*.
const CONVERT_OVERRIDES: &[&str] = &[
    "table-width",
    "row-min-height",
    "image-width-inches",
    "callout-color",
];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extras-<key> <value>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let value = args.get(i + 1).filter(|next| !next.starts_with('-'));
            match value {
                Some(value) => {
                    extra_params.insert(key.to_string(), value.clone());
                    i += 2;
                }
                None => {
                    extra_params.insert(key.to_string(), String::new());
                    i += 1;
                }
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("sdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert documents between sdoc, Markdown and DOCX")
        .long_about(
            "sdoc converts documents between the sdoc JSON tree, Markdown and Word (.docx).\n\n\
            Commands:\n  \
            - convert: Transform between document formats\n  \
            - formats: List the registered formats\n\n\
            Extra Parameters:\n  \
            Use --extra-<setting> <value> to override a converter setting\n  \
            (table-width, row-min-height, image-width-inches, callout-color).\n\n\
            Examples:\n  \
            sdoc notes.md --to sdoc                     # Markdown to sdoc JSON (stdout)\n  \
            sdoc doc.sdoc --to docx -o doc.docx         # Write a Word document\n  \
            sdoc report.docx --to markdown --assets img # Import images into ./img",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an sdoc.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - sdoc:     sdoc JSON tree (.sdoc, .json)\n  \
                    - markdown: Markdown (.md, .markdown)\n  \
                    - docx:     Word document (.docx)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Text output goes to stdout by default; docx needs -o.",
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
                )
                .arg(
                    Arg::new("doc-id")
                        .long("doc-id")
                        .value_name("ID")
                        .help("Document id used for image paths (defaults to the input file stem)"),
                )
                .arg(
                    Arg::new("user")
                        .long("user")
                        .value_name("USER")
                        .help("User recorded as last_modify_user on imported documents"),
                )
                .arg(
                    Arg::new("assets")
                        .long("assets")
                        .value_name("DIR")
                        .help("Root directory of the local image store")
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("formats")
                .about("List the registered formats")
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .help("Show descriptions and file extensions")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    // A bare `sdoc <input> ...` means `sdoc convert <input> ...`.
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "formats"
                && cleaned_args[1] != "help"
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

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
    );
    init_logging(&config);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => handle_convert_command(sub_matches, &config),
        Some(("formats", sub_matches)) => {
            handle_formats_command(sub_matches.get_flag("verbose"));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Install env_logger; RUST_LOG wins over the configured level.
fn init_logging(config: &SdocConfig) {
    let env = env_logger::Env::default().default_filter_or(config.logging.level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: &SdocConfig) {
    let Some(input) = matches.get_one::<String>("input") else {
        eprintln!("Error: an input file is required");
        std::process::exit(1);
    };
    let Some(to) = matches.get_one::<String>("to") else {
        eprintln!("Error: --to is required");
        std::process::exit(1);
    };

    let registry = FormatRegistry::default();
    let from = match matches.get_one::<String>("from") {
        Some(f) => f.to_string(),
        None => match registry.detect_format_from_filename(input) {
            Some(detected) => detected,
            None => {
                eprintln!("Error: Could not detect format from filename '{input}'");
                eprintln!("Please specify --from explicitly");
                std::process::exit(1);
            }
        },
    };

    for name in [from.as_str(), to.as_str()] {
        if let Err(e) = registry.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = fs::read(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let document_id = matches
        .get_one::<String>("doc-id")
        .cloned()
        .unwrap_or_else(|| document_id_from_path(Path::new(input)));
    let user = matches
        .get_one::<String>("user")
        .cloned()
        .unwrap_or_else(|| config.convert.last_modify_user.clone());
    let assets_root = matches
        .get_one::<String>("assets")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.assets.root.clone());

    debug!("converting {input} from {from} to {to} (document '{document_id}')");
    let store = LocalAssetStore::new(assets_root, config.assets.service_url.clone());
    let converter = Converter::new(Arc::new(store)).with_options(config.to_convert_options());

    let result = converter
        .convert(&source, &from, to, &document_id, &user)
        .unwrap_or_else(|e| {
            eprintln!("Conversion error: {e}");
            std::process::exit(1);
        });

    let output = matches.get_one::<String>("output").map(PathBuf::from);
    match write_artifact(result, output) {
        Ok(Artifact::InMemory(text)) => print!("{text}"),
        Ok(Artifact::File(path)) => info!("wrote {}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}. Use -o <path>.");
            std::process::exit(1);
        }
    }
}

/// Handle the formats command
fn handle_formats_command(verbose: bool) {
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        match registry.get(&name) {
            Ok(format) if verbose => {
                let extensions = format.file_extensions().join(", ");
                println!("  {name:<10} {} [{extensions}]", format.description());
            }
            _ => println!("  {name}"),
        }
    }
}

fn document_id_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document")
        .to_string()
}

fn load_cli_config(explicit_path: Option<&str>, extra_params: &HashMap<String, String>) -> SdocConfig {
    let loader = Loader::new().with_optional_file("sdoc.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let loader = apply_config_overrides(loader, extra_params);

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(mut loader: Loader, extra_params: &HashMap<String, String>) -> Loader {
    for (key, raw) in extra_params {
        if !CONVERT_OVERRIDES.contains(&key.as_str()) {
            eprintln!("Unknown parameter --extra-{key}");
            std::process::exit(1);
        }
        if raw.is_empty() {
            eprintln!("Missing value for --extra-{key}");
            std::process::exit(1);
        }
        let config_key = format!("convert.{}", key.replace('-', "_"));
        loader = loader
            .set_override(&config_key, raw.as_str())
            .unwrap_or_else(|err| {
                eprintln!("Invalid value for --extra-{key}: {err}");
                std::process::exit(1);
            });
    }
    loader
}
