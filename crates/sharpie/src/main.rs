mod outline;

use std::process::ExitCode;

use anyhow::Context as _;
use camino::Utf8PathBuf;
use clap::Parser;
use sharpie_db::{RootDatabase, parse_file};
use sharpie_errors::Renderer;
use sharpie_inputs::File;
use sharpie_parse::{LanguageVersion, ParseOptions, SourceKind};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "sharpie", version, about = "Parses C# sources and reports syntax diagnostics")]
enum Options {
    /// Parse one file and print its diagnostics.
    Parse(ParseArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    path: Utf8PathBuf,
    /// Language version such as `7.3`, `8` or `latest`.
    #[arg(long, default_value = "latest")]
    lang_version: LanguageVersion,
    /// Production the text is parsed as: `compilation-unit`, `expression` or `statement`.
    #[arg(long, default_value = "compilation-unit")]
    kind: SourceKind,
    /// Preprocessor symbol defined before the first line. May be repeated.
    #[arg(long = "define", short = 'D', value_name = "SYMBOL")]
    defines: Vec<String>,
    /// Print the syntax tree.
    #[arg(long)]
    tree: bool,
    /// Print the declarations of a compilation unit.
    #[arg(long)]
    outline: bool,
    /// Print no diagnostics and exit successfully regardless of errors.
    #[arg(long, short)]
    quiet: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHARPIE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    match Options::parse() {
        Options::Parse(args) => run_parse(args),
    }
}

fn run_parse(args: ParseArgs) -> anyhow::Result<ExitCode> {
    let db = RootDatabase::default();
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read `{}`", args.path))?;

    let options = ParseOptions::default()
        .with_language_version(args.lang_version)
        .with_kind(args.kind)
        .with_preprocessor_symbols(args.defines);
    let file = File::new(&db, args.path, text, options);
    let parse = parse_file(&db, file);

    if args.tree {
        print!("{}", parse.debug_dump());
    }
    if args.outline {
        print!("{}", outline::outline(parse.syntax()));
    }
    if args.quiet {
        return Ok(ExitCode::SUCCESS);
    }

    let renderer = Renderer::styled();
    let path = file.path(&db).as_str();
    for diagnostic in parse.diagnostics() {
        eprintln!("{}", diagnostic.render(&renderer, path, file.text(&db)));
    }

    let errors = parse.errors().count();
    tracing::debug!(errors, diagnostics = parse.diagnostics().len(), "checked {path}");
    Ok(if errors == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
