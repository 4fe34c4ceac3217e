//! Apigen CLI
//!
//! Command-line interface for building API models and generating artifacts
//! from protocol descriptions.

use anyhow::{Context, Result};
use apigen_analyzer::create_model;
use apigen_common::config::GeneratorConfig;
use apigen_common::Api;
use apigen_generator::ModelGenerator;
use apigen_parser::parser_for;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apigen")]
#[command(version, about = "Build cross-referenced API models and generate client bindings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model and display a summary
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize the model described by a configuration file\n  \
        apigen parse --config secretmanager.yaml\n\n  \
        # Use another descriptor set\n  \
        apigen parse --config secretmanager.yaml --spec secretmanager-v1beta.pb")]
    Parse {
        /// Generator configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Specification source, replacing `specification_source`
        #[arg(short, long)]
        spec: Option<PathBuf>,
    },

    /// Build the model and write generated artifacts
    #[command(after_help = "EXAMPLES:\n  \
        apigen generate \\\n    \
        --config secretmanager.yaml \\\n    \
        --output ./generated/secretmanager")]
    Generate {
        /// Generator configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Specification source, replacing `specification_source`
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { config, spec } => {
            parse_command(&config, spec.as_deref(), cli.verbose)?;
        }
        Commands::Generate {
            config,
            spec,
            output,
        } => {
            generate_command(&config, spec.as_deref(), &output, cli.verbose)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the configuration; relative sources resolve against its directory
fn load_config(config_path: &Path, spec: Option<&Path>) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    if let Some(spec) = spec {
        config.specification_source = spec.display().to_string();
    } else {
        config.specification_source = relative_to(config_path, &config.specification_source);
    }
    if let Some(service_config) = &config.service_config {
        config.service_config = Some(relative_to(config_path, service_config));
    }
    Ok(config)
}

fn relative_to(config_path: &Path, source: &str) -> String {
    let source_path = Path::new(source);
    match config_path.parent() {
        Some(dir) if source_path.is_relative() => dir.join(source_path).display().to_string(),
        _ => source.to_string(),
    }
}

fn build_model(config: &GeneratorConfig) -> Result<Api> {
    println!(
        "{} Parsing {} ({})",
        "→".cyan(),
        config.specification_source,
        config.specification_format.yellow()
    );
    let parser = parser_for(config).context("Failed to load specification")?;
    let api = create_model(config, parser.as_ref()).context("Failed to build model")?;
    Ok(api)
}

fn parse_command(config_path: &Path, spec: Option<&Path>, verbose: bool) -> Result<()> {
    let config = load_config(config_path, spec)?;
    let api = build_model(&config)?;

    println!("\n{}", "✓ Model built!".green().bold());
    println!("\n{}", "API:".bold());
    println!("  Name: {}", api.name.yellow());
    println!("  Title: {}", api.title);
    println!("  Package: {}", api.package_name);
    println!("  Services: {}", api.services.len());
    println!("  Messages: {}", api.messages.len());
    println!("  Enums: {}", api.enums.len());

    for service in api.services.iter().filter_map(|id| api.service(id)) {
        println!(
            "\n  • {} ({} methods)",
            service.name.cyan(),
            service.methods.len()
        );
        if !verbose {
            continue;
        }
        for method in api.service_methods(service) {
            let mut traits = Vec::new();
            if method.is_aip_standard {
                traits.push("standard");
            }
            if method.is_list {
                traits.push("list");
            }
            if method.is_lro {
                traits.push("lro");
            }
            if method.is_streaming {
                traits.push("streaming");
            }
            println!("    {} [{}]", method.name, traits.join(", "));
            for binding in &method.path_info.bindings {
                println!("      {} {}", binding.verb, binding.path_template);
                if let Some(target) = &binding.target_resource {
                    println!("        resource: {}", target.template.dimmed());
                }
            }
        }
    }

    Ok(())
}

fn generate_command(
    config_path: &Path,
    spec: Option<&Path>,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let config = load_config(config_path, spec)?;

    if verbose {
        println!("  Format: {}", config.specification_format);
        println!("  Source: {}", config.specification_source);
        println!("  Output: {}", output.display());
    }

    let api = build_model(&config)?;
    println!(
        "{} Built model {} with {} services",
        "✓".green(),
        api.name,
        api.services.len()
    );

    println!("{} Generating files...", "→".cyan());
    let generator = ModelGenerator::new(&api).context("Failed to create generator")?;
    let written = generator
        .generate_to_directory(output)
        .context("Failed to generate artifacts")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in written {
        println!("  📄 {}/{}", output.display(), path);
    }

    Ok(())
}
