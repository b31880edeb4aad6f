//! PageCraft command line.
//!
//! Creates, checks and edits layout documents without a window: builder
//! sessions are replayed from JSON action scripts.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kurbo::Size;
use pagecraft_app::{App, AppConfig, AppError, AppResult, ShortcutRegistry, parse_script, validation_report};
use pagecraft_core::canvas::{CanvasConfig, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use pagecraft_core::snap::{DEFAULT_GRID_SIZE, GridConfig};

#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(about = "Visual page layout builder")]
struct Cli {
    /// Canvas width in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_CANVAS_WIDTH)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    height: f64,

    /// Grid cell size in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: u32,

    /// Place elements without snapping to the grid
    #[arg(long, global = true)]
    no_snap: bool,

    /// Directory for named documents
    #[arg(long, global = true)]
    documents_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new layout
    New {
        /// Start from a blank page instead of the starter layout
        #[arg(long)]
        empty: bool,
        /// Output file (prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a layout for duplicate ids, bad ids, unknown types and z-index gaps
    Validate { file: PathBuf },
    /// Load a layout and write it back in the current export format
    Import {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Renumber z-indices to 1..=n
        #[arg(long)]
        normalize_z: bool,
    },
    /// Copy a layout's JSON to the clipboard
    Copy { file: PathBuf },
    /// Apply a script of builder actions
    Replay {
        script: PathBuf,
        /// Layout to start from (starter layout if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Save a layout file to the documents directory
    Save {
        file: PathBuf,
        /// Document name (file stem if not provided)
        #[arg(long)]
        name: Option<String>,
    },
    /// Write a named document from the documents directory
    Load {
        name: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List named documents
    List,
    /// Show keyboard shortcuts
    Shortcuts,
}

impl Cli {
    fn config(&self, starter_layout: bool) -> AppConfig {
        AppConfig {
            canvas: CanvasConfig {
                size: Size::new(self.width, self.height),
                grid: GridConfig::new(true, self.grid_size, !self.no_snap),
                ..CanvasConfig::default()
            },
            documents_dir: self.documents_dir.clone(),
            starter_layout,
        }
    }
}

fn main() -> ExitCode {
    #[cfg(feature = "native")]
    env_logger::init();

    let cli = Cli::parse();
    log::info!("Starting PageCraft");

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// App holding only the given file.
fn open(cli: &Cli, file: &Path) -> AppResult<App> {
    let mut app = App::new(cli.config(false));
    if !app.open_file(file)? {
        eprintln!("Warning: {} has no elements", file.display());
    }
    Ok(app)
}

fn write_out(app: &App, output: Option<&Path>) -> AppResult<()> {
    match output {
        Some(path) => app.save_file(path),
        None => {
            println!("{}", app.canvas().to_json()?);
            Ok(())
        }
    }
}

fn run(cli: &Cli) -> AppResult<ExitCode> {
    match &cli.command {
        Command::New { empty, output } => {
            let app = App::new(cli.config(!empty));
            write_out(&app, output.as_deref())?;
        }
        Command::Validate { file } => {
            let errors = App::validate_file(file)?;
            println!("{}", validation_report(&errors));
            if !errors.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Import {
            file,
            output,
            normalize_z,
        } => {
            let mut app = open(cli, file)?;
            if *normalize_z {
                app.canvas_mut().normalize_z_order();
            }
            write_out(&app, output.as_deref())?;
        }
        Command::Copy { file } => {
            let app = open(cli, file)?;
            if !app.copy_json_to_clipboard()? {
                return Ok(ExitCode::FAILURE);
            }
            println!("Layout JSON copied to clipboard");
        }
        Command::Replay { script, input, output } => {
            let json = fs::read_to_string(script).map_err(|source| AppError::Io {
                path: script.clone(),
                source,
            })?;
            let actions = parse_script(&json)?;
            let mut app = match input {
                Some(file) => open(cli, file)?,
                None => App::new(cli.config(true)),
            };
            let report = app.replay(actions);
            eprintln!(
                "Applied {}, ignored {}, failed {}",
                report.applied, report.ignored, report.failed
            );
            write_out(&app, output.as_deref())?;
        }
        Command::Save { file, name } => {
            let app = open(cli, file)?;
            let name = match name {
                Some(name) => name.clone(),
                None => file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "untitled".to_string()),
            };
            app.save_named(&name)?;
            println!("Saved as {}", name);
        }
        Command::Load { name, output } => {
            let mut app = App::new(cli.config(false));
            app.load_named(name)?;
            write_out(&app, output.as_deref())?;
        }
        Command::List => {
            let app = App::new(cli.config(false));
            for name in app.list_named()? {
                println!("{}", name);
            }
        }
        Command::Shortcuts => ShortcutRegistry::print_all(),
    }
    Ok(ExitCode::SUCCESS)
}
