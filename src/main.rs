use clap::{Parser, Subcommand};
use coverbox::catalog::{GroupBy, JsonCatalog, RecordEdit, group_records};
use coverbox::{config, logging, naming, output, process, scan};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "coverbox")]
#[command(about = "Bulk-ingest comic cover scans into a catalog")]
#[command(long_about = "\
Bulk-ingest comic cover scans into a catalog

Metadata comes from the filename. Separators (_ and -) become spaces, then:

  <Series> <Issue> [<Title>] [(<Year>)] [$<Price>]

  Amazing-Spider-Man_129_(1973)_$0.20.jpg
    → series \"Amazing Spider Man\", issue 129, 1973-01-01, $0.20

Each scan is stored twice as an inline JPEG: a preview (longer side 200px)
and a full cover (at most 1200x1800). Names without an issue number are still
ingested, filed under \"Unknown Series\".

Run 'coverbox gen-config' to generate a documented coverbox.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "coverbox.toml", global = true)]
    config: PathBuf,

    /// Catalog file (defaults to catalog.path from the config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest cover scans; directories are walked recursively
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show the metadata that would be extracted from filenames
    Extract {
        #[arg(required = true)]
        names: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List catalog records, grouped
    List {
        /// Grouping: series, publisher, year or none
        #[arg(long, default_value_t = GroupBy::Series)]
        group_by: GroupBy,
    },
    /// Change fields of a catalog record
    Edit {
        id: String,
        /// New condition grade
        #[arg(long)]
        condition: Option<String>,
        /// New notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,
        /// Tag to add (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a record from the catalog
    Remove { id: String },
    /// Write the catalog to a JSON file
    Export { file: PathBuf },
    /// Replace the catalog with the contents of a JSON export
    Import { file: PathBuf },
    /// Print a stock coverbox.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        config: config_path,
        catalog: catalog_override,
        command,
    } = cli;

    // Load config and start logging; gen-config needs neither.
    let setup = || -> Result<(config::IngestConfig, PathBuf), config::ConfigError> {
        let config = config::load_config(&config_path)?;
        logging::init_logging(&config.logging);
        let catalog_path = config.catalog.resolve_path(catalog_override.as_deref());
        Ok((config, catalog_path))
    };

    match command {
        Command::Ingest { paths } => {
            let (config, catalog_path) = setup()?;
            let items = scan::collect_items(&paths);
            let mut catalog = JsonCatalog::open(&catalog_path)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_ingest_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::ingest(&items, &config, &mut catalog, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = result?;

            println!();
            output::print_batch_summary(&report);
            if report.succeeded() > 0 {
                catalog.save()?;
                println!("Catalog: {}", catalog.path().display());
            }
        }
        Command::Extract { names, json } => {
            setup()?;
            for name in &names {
                let metadata = naming::extract_metadata(name);
                if json {
                    println!("{}", serde_json::to_string_pretty(&metadata)?);
                } else {
                    output::print_extracted(name, &metadata);
                }
            }
        }
        Command::List { group_by } => {
            let (_, catalog_path) = setup()?;
            let catalog = JsonCatalog::open(&catalog_path)?;
            output::print_catalog_list(&group_records(catalog.records(), group_by));
        }
        Command::Edit {
            id,
            condition,
            notes,
            tags,
        } => {
            let (_, catalog_path) = setup()?;
            let edit = RecordEdit {
                condition,
                notes,
                add_tags: tags,
            };
            if edit.is_empty() {
                return Err("nothing to change: pass --condition, --notes or --tag".into());
            }
            let mut catalog = JsonCatalog::open(&catalog_path)?;
            let line = output::format_record_change("Updated", catalog.edit(&id, &edit)?);
            catalog.save()?;
            println!("{}", line);
        }
        Command::Remove { id } => {
            let (_, catalog_path) = setup()?;
            let mut catalog = JsonCatalog::open(&catalog_path)?;
            let removed = catalog.remove(&id)?;
            catalog.save()?;
            println!("{}", output::format_record_change("Removed", &removed));
        }
        Command::Export { file } => {
            let (_, catalog_path) = setup()?;
            let catalog = JsonCatalog::open(&catalog_path)?;
            catalog.export(&file)?;
            println!(
                "Exported {} comics \u{2192} {}",
                catalog.records().len(),
                file.display()
            );
        }
        Command::Import { file } => {
            let (_, catalog_path) = setup()?;
            let mut catalog = JsonCatalog::open(&catalog_path)?;
            let count = catalog.import(&file)?;
            catalog.save()?;
            println!(
                "Imported {} comics \u{2192} {}",
                count,
                catalog.path().display()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
