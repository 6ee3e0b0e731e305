use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use report_composer::clipboard::SystemClipboard;
use report_composer::composer::SUBMIT_SUCCESS_ALERT;
use report_composer::config::ComposerConfig;
use report_composer::submit::SubmissionClient;
use report_composer::{Command, Composer, FormState, Notice};
use tracing_subscriber::EnvFilter;

/// Composes report documents from form snapshots.
///
/// Form snapshots are JSON files keyed by the form input names (`titulo`,
/// `tipo`, `ano`, `status`, `data_envio`, `nome_responsavel`, ...). Set
/// `RUST_LOG` to adjust logging, e.g. `RUST_LOG=report_composer=debug`.
#[derive(Parser)]
#[command(author, version, about = "Compose, preview, render and submit reports")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extended-JSON preview of a form snapshot.
    Preview {
        #[arg(long)]
        form: PathBuf,
    },

    /// Render a form snapshot to `<title>.pdf`.
    #[command(name = "pdf")]
    Pdf {
        #[arg(long)]
        form: PathBuf,
        /// Directory receiving the PDF.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview and submit a form snapshot to the document service.
    Submit {
        #[arg(long)]
        form: PathBuf,
        /// Endpoint overriding the configuration.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Copy the preview of a form snapshot to the system clipboard.
    Copy {
        #[arg(long)]
        form: PathBuf,
    },

    /// Read commands from stdin (`set titulo ...`, `keyword ...`, `submit`, `pdf`, ...).
    Session {
        /// Snapshot to start from.
        #[arg(long)]
        form: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("report_composer=info"));
    // The fmt subscriber also forwards records emitted through the `log` facade.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_form(path: &Path) -> Result<FormState, Box<dyn Error>> {
    let source = fs::read_to_string(path)
        .map_err(|err| format!("failed to read form {}: {}", path.display(), err))?;
    let form = serde_json::from_str(&source)
        .map_err(|err| format!("invalid form {}: {}", path.display(), err))?;
    Ok(form)
}

fn composer(config: &ComposerConfig, form: FormState) -> Result<Composer, Box<dyn Error>> {
    let client = SubmissionClient::new(config.endpoint.clone())?;
    Ok(Composer::new(config, Box::new(client), Box::new(SystemClipboard::new())).with_form(form))
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("{}", notice);
    }
}

fn run_once(
    config: &ComposerConfig,
    form: &Path,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    let mut composer = composer(config, load_form(form)?)?;
    let notices = composer.dispatch(command);
    print_notices(&notices);
    check_notices(&notices)
}

fn check_notices(notices: &[Notice]) -> Result<(), Box<dyn Error>> {
    let failed = notices.iter().any(|notice| {
        matches!(notice, Notice::Alert(message) if message != SUBMIT_SUCCESS_ALERT)
    });
    if failed {
        return Err("command did not complete".into());
    }
    Ok(())
}

fn run_session(config: &ComposerConfig, form: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let form = match form {
        Some(path) => load_form(path)?,
        None => FormState::new(),
    };
    let mut composer = composer(config, form)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if matches!(trimmed, "quit" | "exit") {
            break;
        }

        match line.parse::<Command>() {
            Ok(command) => print_notices(&composer.dispatch(command)),
            Err(err) => eprintln!("{}", err),
        }
        stdout.flush()?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = ComposerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Preview { form } => {
            let document = load_form(&form)?.build_document();
            println!("{}", report_composer::preview::render_preview(&document)?);
            Ok(())
        }
        Commands::Pdf { form, output } => {
            if let Some(output) = output {
                config.output_dir = output;
            }
            run_once(&config, &form, Command::GeneratePdf)
        }
        Commands::Submit { form, endpoint } => {
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            run_once(&config, &form, Command::Submit)
        }
        Commands::Copy { form } => {
            let mut composer = composer(&config, load_form(&form)?)?;
            composer.refresh_preview()?;
            let notices = composer.dispatch(Command::CopyJson);
            print_notices(&notices);
            check_notices(&notices)
        }
        Commands::Session { form } => run_session(&config, form.as_deref()),
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
