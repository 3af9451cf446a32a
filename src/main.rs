use clap::{ArgAction, Parser, Subcommand};
use pdf_assembler::render::CommandRenderer;
use pdf_assembler::{assemble, config, output, scan, staging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pdf-assembler")]
#[command(about = "Render a multi-chapter AsciiDoc tutorial to PDF")]
#[command(long_about = "\
Render a multi-chapter AsciiDoc tutorial to PDF

Collects every chapter's images into one staging directory, runs the PDF
renderer on the tutorial's source document, and removes the staging
directory again, whether the run succeeds or not.

Tutorial structure:

  java-web-app/
  ├── pdf-assembler.toml     # Optional config (see gen-config)
  ├── pdf.adoc               # Source document, uses :imagesdir: pdf-images
  ├── 01-intro/              # Chapter: name contains two digits + more
  │   ├── intro.adoc
  │   └── images/            # Every file here is staged
  │       ├── a.png
  │       └── b.png
  ├── 02-setup/
  │   └── images/
  │       └── c.png
  └── 03-summary/            # Chapter without images: fine

Default renderer command:

  asciidoctor-pdf -a pdf-theme=../00-print-assets/themes/vaadin-theme.yml \\
                  -a pdf-fontsdir=../00-print-assets/fonts pdf.adoc

Images with the same file name in different chapters overwrite each other;
'pdf-assembler check' lists such collisions.")]
#[command(version)]
struct Cli {
    /// Tutorial directory (holds the chapters and the source document)
    #[arg(short = 'C', long, default_value = ".", global = true)]
    dir: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Stage images, render the PDF, clean up (default)
    Build,
    /// Show which chapters and images a build would stage
    Check {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a staging directory left behind by an interrupted run
    Clean,
    /// Print a stock pdf-assembler.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_failure(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let config = config::load_config(&cli.dir)?;
            let program = config.renderer.command.clone();
            assemble::run(&cli.dir, &config, &CommandRenderer, &mut |event| {
                output::print_event(&event, &program)
            })?;
        }
        Command::Check { json } => {
            let config = config::load_config(&cli.dir)?;
            let plan = scan::scan(&cli.dir, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan, &cli.dir);
            }
        }
        Command::Clean => {
            let config = config::load_config(&cli.dir)?;
            let path = cli.dir.join(&config.staging_dir);
            if path.exists() {
                staging::cleanup(&path)?;
                println!("Removed {}", path.display());
            } else {
                println!("Nothing to clean");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Warnings only by default; each `-v` raises the level one step.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
