use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use dep_conflicts::config::{AppConfig, log_path};
use dep_conflicts::maven::MavenRunner;
use dep_conflicts::parser::{ConflictReport, MavenTreeParser};
use dep_conflicts::pipeline;
use dep_conflicts::version::semver::try_classify;
use dep_conflicts::version::stats::{category_statistics, render_table};
use dep_conflicts::version::store::{CsvLog, SemanticStore};

#[derive(Parser)]
#[command(name = "dep-conflicts")]
#[command(version, about = "Extract and classify Maven dependency version conflicts")]
struct Cli {
    /// JSON config file (defaults to $XDG_DATA_HOME/dep-conflicts/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run `mvn dependency:tree -Dverbose` for a project and save the output
    Tree {
        project: PathBuf,
        #[arg(short, long, default_value = "dep_tree.txt")]
        output: PathBuf,
    },
    /// Extract conflicts from a dependency-tree dump into a JSON report
    Extract {
        dump: PathBuf,
        #[arg(long)]
        pr_url: String,
        #[arg(short, long, default_value = "conflicts.json")]
        output: PathBuf,
    },
    /// Run the dependency tree for a project and extract its conflicts in one step
    Analyze {
        project: PathBuf,
        #[arg(long)]
        pr_url: String,
        #[arg(long, default_value = "dep_tree.txt")]
        dump: PathBuf,
        #[arg(short, long, default_value = "conflicts.json")]
        output: PathBuf,
    },
    /// Classify the semantic difference between two versions
    Classify { resolved: String, omitted: String },
    /// Summarize conflict reports into the CSV log and the JSON store
    Summarize {
        #[arg(required = true)]
        reports: Vec<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print per-category statistics of the JSON store
    Stats {
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = dep_conflicts::logging::init_logging(&log_path());
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Tree { project, output } => {
            let runner = MavenRunner::new(config.maven);
            let run = pipeline::run_tree(&runner, &project, &output)?;
            println!(
                "Dependency tree written to {} ({})",
                output.display(),
                if run.success { "build succeeded" } else { "build failed" }
            );
        }
        Command::Extract {
            dump,
            pr_url,
            output,
        } => {
            let report = pipeline::extract_report(&MavenTreeParser::new(), &dump, &pr_url)
                .with_context(|| format!("Failed to extract conflicts from {}", dump.display()))?;
            pipeline::write_report(&report, &output)?;
            print_report_outcome(&report, &output);
        }
        Command::Analyze {
            project,
            pr_url,
            dump,
            output,
        } => {
            let runner = MavenRunner::new(config.maven);
            let report =
                pipeline::analyze_project(&runner, &MavenTreeParser::new(), &project, &dump, &pr_url)
                    .with_context(|| format!("Failed to analyze {}", project.display()))?;
            pipeline::write_report(&report, &output)?;
            print_report_outcome(&report, &output);
        }
        Command::Classify { resolved, omitted } => match try_classify(&resolved, &omitted) {
            Ok(class) => println!("{class}"),
            Err(e) => println!("INVALID_SEMVER ({e})"),
        },
        Command::Summarize {
            reports,
            csv,
            store,
        } => {
            let csv = CsvLog::new(csv.unwrap_or(config.output.csv_path));
            let mut store = SemanticStore::load(store.unwrap_or(config.output.store_path))?;
            let recorded = pipeline::process_reports(&reports, &csv, &mut store)?;
            println!("Recorded {recorded} of {} reports", reports.len());
        }
        Command::Stats { store } => {
            let store = SemanticStore::load(store.unwrap_or(config.output.store_path))?;
            println!("{} pull requests", store.len());
            print!("{}", render_table(&category_statistics(&store)));
        }
    }

    Ok(())
}

fn print_report_outcome(report: &ConflictReport, output: &Path) {
    if report.conflicts.is_empty() {
        println!("No conflicting versions found.");
    } else {
        println!(
            "{} conflicts in {} modules saved to {}",
            report.total_conflicts,
            report.affected_modules,
            output.display()
        );
    }
}
