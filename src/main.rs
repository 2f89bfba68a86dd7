use booktex::assemble::Book;
use booktex::types::join_lines;
use booktex::{chars, config, output, toc, transform};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "booktex")]
#[command(about = "Turn a multi-page lesson site into one LaTeX book")]
#[command(long_about = "\
Turn a multi-page lesson site into one LaTeX book

The book is built in three steps around an external Markdown-to-LaTeX
converter such as pandoc:

  booktex toc _config.yml . > crossref.json
  booktex transform --pre _config.yml _site crossref.json tex > book.html
  pandoc -f html -t latex book.html > book.raw.tex
  booktex transform --post _config.yml _site crossref.json tex < book.raw.tex > book.tex

Source layout:

  _config.yml                      # toc: { lessons: [...], extras: [...] }
  intro.md                         # chapter source; '## Title {#s:key}' anchors
  _site/
  ├── index.html                   # front matter
  └── intro/index.html             # rendered chapter
  tex/                             # hand-written LaTeX for replacement regions

Only the region between '<!-- begin: main -->' and '<!-- end: main -->' of
each page is used.")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Which half of the chain `transform` runs.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct PhaseArgs {
    /// Assemble the pages and prepare them for the converter
    #[arg(long)]
    pre: bool,
    /// Read converter output from stdin and finish the LaTeX
    #[arg(long)]
    post: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the cross-reference map as JSON
    Toc {
        /// Book configuration (_config.yml or .toml)
        config: PathBuf,
        /// Directory holding the {slug}.md sources
        source_dir: PathBuf,
    },
    /// Run the pre or post phase of the handler chain
    Transform {
        #[command(flatten)]
        phase: PhaseArgs,
        /// Book configuration (_config.yml or .toml)
        config: PathBuf,
        /// Directory holding the rendered {slug}/index.html pages
        source_dir: PathBuf,
        /// Cross-reference map written by `toc`
        crossref: PathBuf,
        /// Directory of LaTeX files named by replacement regions
        include_dir: PathBuf,
    },
    /// Validate the book's structure without transforming it
    Check {
        /// Book configuration (_config.yml or .toml)
        config: PathBuf,
        /// Directory holding both the Markdown sources and rendered pages
        source_dir: PathBuf,
    },
    /// Report lines containing characters outside 7-bit ASCII
    CheckChars {
        /// Files or directories to scan (stdin when omitted)
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Toc { config, source_dir } => {
            let book = config::load_config(&config)?;
            let map = toc::build(&book.toc, &source_dir)?;
            println!("{}", map.to_json()?);
        }
        Command::Transform {
            phase,
            config,
            source_dir,
            crossref,
            include_dir,
        } => {
            let inv = transform::Invocation {
                config,
                source_dir,
                crossref,
                include_dir,
            };
            let lines = if phase.pre {
                transform::run_pre(&inv)?
            } else {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                transform::run_post(&inv, &input)?
            };
            let mut stdout = io::stdout().lock();
            stdout.write_all(join_lines(&lines).as_bytes())?;
            stdout.flush()?;
        }
        Command::Check { config, source_dir } => {
            println!("==> Checking {}", source_dir.display());
            let book_config = config::load_config(&config)?;
            let outline = toc::resolve(&book_config.toc, &source_dir)?;
            outline.to_crossref()?;
            let book = Book::load(&source_dir, &book_config.toc)?;
            output::print_check_output(&outline, &book);
            println!("==> Book is valid");
        }
        Command::CheckChars { paths } => {
            let hits = if paths.is_empty() {
                chars::check_reader(io::stdin().lock())?
            } else {
                chars::check_paths(&paths)?
            };
            output::print_char_hits(&hits);
        }
    }

    Ok(())
}

/// Log to stderr; stdout carries the pipeline's data.
///
/// `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "booktex=warn",
        1 => "booktex=debug",
        _ => "booktex=trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
