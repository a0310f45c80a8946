//! Command line front end for importing SBML reactions into Escher maps
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use escher_sbml_core::configuration::CONFIGURATION;
use escher_sbml_core::escher_map::genome::BaseGenome;
use escher_sbml_core::escher_map::map::EscherMap;
use escher_sbml_core::sbml::model::SbmlModel;

#[derive(Parser)]
#[command(name = "escher-sbml")]
#[command(about = "Utilities for enriching Escher maps with SBML models")]
#[command(version, author)]
struct Cli {
    /// Display more detailed log messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Import the reactions of an SBML model into an Escher map")]
    Import(ImportArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// Escher map input file
    #[arg(value_name = "input.json")]
    in_file: PathBuf,

    /// Base genome GTO file
    #[arg(value_name = "input.gto")]
    genome_file: PathBuf,

    /// SBML file containing additional reactions
    #[arg(value_name = "input.sbml.xml")]
    sbml_file: PathBuf,

    /// Escher map output file
    #[arg(value_name = "output.json")]
    out_file: PathBuf,

    /// Prefix of reaction ids in the SBML model
    #[arg(long)]
    reaction_prefix: Option<String>,

    /// Prefix of species ids in the SBML model
    #[arg(long)]
    metabolite_prefix: Option<String>,

    /// Prefix of gene product ids in the SBML model
    #[arg(long)]
    gene_prefix: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Import(args) => run_import(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::from(1)
        }
    }
}

fn run_import(args: ImportArgs) -> anyhow::Result<()> {
    validate_parms(&args)?;
    {
        let mut config = match CONFIGURATION.write() {
            Ok(config) => config,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(prefix) = args.reaction_prefix {
            config.prefixes.reaction = prefix;
        }
        if let Some(prefix) = args.metabolite_prefix {
            config.prefixes.metabolite = prefix;
        }
        if let Some(prefix) = args.gene_prefix {
            config.prefixes.gene = prefix;
        }
    }
    let genome = BaseGenome::read_json(&args.genome_file)
        .with_context(|| format!("loading base genome {}", args.genome_file.display()))?;
    let mut escher_map = EscherMap::read_json(&args.in_file, genome)
        .with_context(|| format!("loading Escher map {}", args.in_file.display()))?;
    info!("Reading SBML model from {}.", args.sbml_file.display());
    let model = SbmlModel::read_sbml(&args.sbml_file)
        .with_context(|| format!("reading SBML model {}", args.sbml_file.display()))?;
    escher_map
        .import_sbml(&model)
        .with_context(|| format!("importing {}", args.sbml_file.display()))?;
    escher_map
        .write_json(&args.out_file)
        .with_context(|| format!("writing Escher map {}", args.out_file.display()))?;
    info!("Map written to {}.", args.out_file.display());
    Ok(())
}

fn validate_parms(args: &ImportArgs) -> anyhow::Result<()> {
    if !args.in_file.is_file() {
        bail!("Input JSON file {} is not found or unreadable.", args.in_file.display());
    }
    if !args.sbml_file.is_file() {
        bail!("Input SBML file {} is not found or unreadable.", args.sbml_file.display());
    }
    if !args.genome_file.is_file() {
        bail!(
            "Input base-genome file {} is not found or unreadable.",
            args.genome_file.display()
        );
    }
    let out_dir = match args.out_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !out_dir.is_dir() {
        bail!(
            "Invalid or missing directory for output file {}.",
            args.out_file.display()
        );
    }
    if args.out_file.exists() && args.out_file.is_dir() {
        bail!("Output file {} is not writable.", args.out_file.display());
    }
    Ok(())
}
