use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tower_lsp::{LspService, Server};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stubgen::{ClangParser, Generator, Settings, StubError, StubServer, Workspace, stub::RangeReport};

#[derive(Parser, Debug)]
#[command(name = "stubgen", version, about)]
struct Args {
    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Settings file used instead of the nearest `stubgen.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the language server over stdio (the default).
    Serve,
    /// Generate the definition of the declaration at a position and save it.
    Generate {
        #[arg(long)]
        file: PathBuf,
        /// 1-based line.
        #[arg(long)]
        line: u32,
        /// 1-based column.
        #[arg(long, default_value_t = 1)]
        col: u32,
        /// Define in the header even when a source file exists.
        #[arg(long)]
        inline: bool,
        /// Generate even if a definition already exists.
        #[arg(long)]
        force: bool,
        /// Generate for every declaration from `--line` through this line.
        #[arg(long)]
        to_line: Option<u32>,
    },
    /// Declare getter/setter for the data member at a position and save it.
    Accessors {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        line: u32,
        #[arg(long, default_value_t = 1)]
        col: u32,
    },
}

fn default_log_path() -> PathBuf {
    dirs_or_tmp().join("stubgen.log")
}

fn dirs_or_tmp() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = PathBuf::from(home).join(".stubgen");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

fn init_logging(
    args: &Args,
    settings: &Settings,
) -> PathBuf {
    let level = if args.verbose { "debug" } else { settings.logging.level.as_filter() };
    let stderr_filter = EnvFilter::new(format!("stubgen={level},tower_lsp=warn"));
    let file_filter = EnvFilter::new(format!("stubgen={level},tower_lsp=info"));

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(std::ffi::OsStr::new("stubgen.log")),
    );

    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false).with_target(false).with_filter(file_filter);

    let stderr_layer =
        fmt::layer().with_writer(std::io::stderr).with_ansi(false).with_target(false).with_filter(stderr_filter);

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();
    log_path
}

fn load_settings(
    config: Option<&Path>,
    near: Option<&Path>,
) -> Settings {
    match (config, near) {
        (Some(path), _) => Settings::default().merged_with_file(path).unwrap_or_else(|err| {
            eprintln!("stubgen: {err}");
            Settings::default()
        }),
        (None, Some(file)) => Settings::discover(file),
        (None, None) => std::env::current_dir().map(|dir| Settings::discover(&dir)).unwrap_or_default(),
    }
}

fn run_generate(
    settings: &Settings,
    command: Command,
) -> Result<Vec<PathBuf>, StubError> {
    let generator = Generator::new(ClangParser::new(settings.compiler.clone()), settings.generation.clone());
    match command {
        Command::Generate {
            file,
            line,
            col,
            inline,
            force,
            to_line,
        } => {
            let mut workspace = Workspace::new(&file, (line, col));
            workspace.open_from_disk(&file)?;
            match to_line {
                Some(end) => {
                    let report = generator.generate_for_line_range(&mut workspace, line, end, inline, force)?;
                    print_report(&report);
                },
                None => {
                    let insertion = generator.generate_at_cursor(&mut workspace, inline, force)?;
                    println!("{}:{}", insertion.file.display(), insertion.cursor_line);
                },
            }
            workspace.save_modified()
        },
        Command::Accessors {
            file,
            line,
            col,
        } => {
            let mut workspace = Workspace::new(&file, (line, col));
            workspace.open_from_disk(&file)?;
            let insertion = generator.generate_accessors_at_cursor(&mut workspace)?;
            for text in &insertion.lines {
                println!("{}", text.trim());
            }
            workspace.save_modified()
        },
        Command::Serve => Ok(Vec::new()),
    }
}

fn print_report(report: &RangeReport) {
    for insertion in &report.insertions {
        println!("{}:{}", insertion.file.display(), insertion.cursor_line);
    }
    for failure in &report.failures {
        eprintln!("line {}: {}", failure.line, failure.error);
    }
}

async fn serve(settings: Settings) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| StubServer::with_settings(client, settings));

    Server::new(stdin, stdout, socket).serve(service).await;

    info!("stubgen server stopped");
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let target = match &args.command {
        Some(Command::Generate {
            file, ..
        })
        | Some(Command::Accessors {
            file, ..
        }) => Some(file.clone()),
        _ => None,
    };
    let settings = load_settings(args.config.as_deref(), target.as_deref());
    let log_path = init_logging(&args, &settings);

    info!("Starting stubgen v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    match args.command {
        None | Some(Command::Serve) => serve(settings).await,
        Some(command) => match run_generate(&settings, command) {
            Ok(saved) => {
                for path in saved {
                    info!("Wrote {}", path.display());
                }
            },
            Err(err) => {
                error!("{err}");
                eprintln!("stubgen: {err}");
                std::process::exit(1);
            },
        },
    }
}
