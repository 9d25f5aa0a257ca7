// Canon CLI - headless standards-library operations

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use canon_config::Settings;
use canon_engine::filter::{self, CategoryFilter};
use canon_engine::merge::{self, ImportPayload};
use canon_engine::store::EntityStore;
use canon_engine::{audit, export};
use canon_io::{json, LibraryDir};

#[derive(Parser)]
#[command(name = "canon")]
#[command(about = "Curated moral-standards library: list, filter, merge, export")]
#[command(version)]
struct Cli {
    /// Library directory (overrides settings and the platform default)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List standards, optionally searched and filtered
    List {
        /// Case-insensitive substring over name and id
        #[arg(long, default_value = "")]
        search: String,

        /// Keep standards in any of these clusters
        #[arg(long, value_delimiter = ',')]
        clusters: Vec<String>,

        /// Keep standards whose primary or secondary focus matches
        #[arg(long)]
        focus: Option<String>,

        /// Keep standards impacting any of these appraisal dimensions
        #[arg(long, value_delimiter = ',')]
        dimensions: Vec<String>,
    },

    /// Print one standard as JSON
    Show { id: String },

    /// List clusters in display order
    Clusters,

    /// Merge an external dataset into the library
    Import { file: PathBuf },

    /// Write a filtered export document
    Export {
        file: PathBuf,

        /// Export these clusters and their standards
        #[arg(long, value_delimiter = ',')]
        clusters: Vec<String>,

        /// Export exactly these standards and their clusters
        #[arg(long, value_delimiter = ',')]
        standards: Vec<String>,

        /// Omit rationale text from the document
        #[arg(long)]
        no_rationales: bool,
    },

    /// Report consistency findings for the whole library
    Audit,

    /// Delete a standard (or, with --cluster, an unreferenced cluster)
    Delete {
        id: String,

        #[arg(long)]
        cluster: bool,
    },

    /// Manage rotated backups of the library file
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Replace the library wholesale from a snapshot file
    Restore { file: PathBuf },
}

#[derive(Subcommand)]
enum BackupAction {
    Create,
    List,
    Restore { name: String },
    Delete { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let settings = Settings::load();
    let dir = LibraryDir::resolve(cli.dir.or_else(|| settings.library_dir.clone()));

    match cli.command {
        Commands::List {
            search,
            clusters,
            focus,
            dimensions,
        } => {
            let store = load_store(&dir)?;
            let criteria = category_filter(clusters, focus, dimensions)?;
            let snapshot = store.snapshot();
            let result = filter::apply(&snapshot.standards, &search, &criteria);
            for standard in &result {
                println!("{:<16} {:<40} {}", standard.id, standard.name, standard.cluster);
            }
            println!("{} standard(s)", result.len());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Show { id } => {
            let store = load_store(&dir)?;
            let standard = store
                .get_standard(&id)
                .ok_or_else(|| format!("standard '{id}' not found"))?;
            println!(
                "{}",
                serde_json::to_string_pretty(standard).map_err(|e| e.to_string())?
            );
            Ok(ExitCode::SUCCESS)
        }

        Commands::Clusters => {
            let store = load_store(&dir)?;
            for cluster in store.clusters_ordered() {
                println!("{:>4}  {:<8} {}", cluster.order, cluster.id, cluster.name);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file).map_err(|e| e.to_string())?;
            let payload: ImportPayload = serde_json::from_str(&text)
                .map_err(|e| format!("invalid import document: {e}"))?;

            let mut store = load_store(&dir)?;
            if settings.backup_on_import && dir.library_file().is_file() {
                dir.create_backup(settings.max_backups)?;
            }
            let report = merge::merge(&mut store, &payload);
            save_store(&dir, &store)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?
            );
            Ok(ExitCode::SUCCESS)
        }

        Commands::Export {
            file,
            clusters,
            standards,
            no_rationales,
        } => {
            let store = load_store(&dir)?;
            let include_rationale = !no_rationales;
            let payload = match (clusters.is_empty(), standards.is_empty()) {
                (false, true) => export::select_by_clusters(&store, &clusters, include_rationale),
                (true, false) => export::select_by_standards(&store, &standards, include_rationale),
                _ => {
                    return Err("pass exactly one of --clusters or --standards".into());
                }
            }
            .map_err(|e| e.to_string())?;

            json::write_export(&payload, &file)?;
            println!(
                "exported {} standard(s) in {} cluster(s) to {}",
                payload.standards.len(),
                payload.clusters.len(),
                file.display()
            );
            Ok(ExitCode::SUCCESS)
        }

        Commands::Audit => {
            let store = load_store(&dir)?;
            let findings = audit::audit(store.clusters(), store.standards());
            if findings.is_empty() {
                println!("no findings");
                return Ok(ExitCode::SUCCESS);
            }
            for finding in &findings {
                println!("{finding}");
            }
            if audit::has_errors(&findings) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        Commands::Delete { id, cluster } => {
            let mut store = load_store(&dir)?;
            if cluster {
                store.delete_cluster(&id).map_err(|e| e.to_string())?;
            } else {
                store.delete_standard(&id).map_err(|e| e.to_string())?;
            }
            save_store(&dir, &store)?;
            println!("deleted '{id}'");
            Ok(ExitCode::SUCCESS)
        }

        Commands::Backup { action } => match action {
            BackupAction::Create => {
                let filename = dir.create_backup(settings.max_backups)?;
                println!("{filename}");
                Ok(ExitCode::SUCCESS)
            }
            BackupAction::List => {
                for backup in dir.list_backups()? {
                    println!(
                        "{:<44} {:>10}  {}",
                        backup.filename, backup.size, backup.modified
                    );
                }
                Ok(ExitCode::SUCCESS)
            }
            BackupAction::Restore { name } => {
                dir.restore_backup(&name)?;
                println!("restored from {name}");
                Ok(ExitCode::SUCCESS)
            }
            BackupAction::Delete { name } => {
                dir.delete_backup(&name)?;
                println!("deleted {name}");
                Ok(ExitCode::SUCCESS)
            }
        },

        Commands::Restore { file } => {
            dir.restore_from(&file)?;
            let store = load_store(&dir)?;
            println!(
                "restored {} standard(s) in {} cluster(s)",
                store.standards().len(),
                store.clusters().len()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the library, or start empty when none exists yet.
fn load_store(dir: &LibraryDir) -> Result<EntityStore, String> {
    let path = dir.library_file();
    if path.is_file() {
        Ok(EntityStore::from_library(json::load(&path)?))
    } else {
        Ok(EntityStore::new())
    }
}

fn save_store(dir: &LibraryDir, store: &EntityStore) -> Result<(), String> {
    dir.ensure_dirs()?;
    let mut library = store.to_library();
    json::save(&mut library, &dir.library_file())
}

/// At most one categorical criterion; empty flags mean no filtering.
fn category_filter(
    clusters: Vec<String>,
    focus: Option<String>,
    dimensions: Vec<String>,
) -> Result<CategoryFilter, String> {
    let active = usize::from(!clusters.is_empty())
        + usize::from(focus.is_some())
        + usize::from(!dimensions.is_empty());
    if active > 1 {
        return Err("pass at most one of --clusters, --focus, --dimensions".into());
    }
    if !clusters.is_empty() {
        Ok(CategoryFilter::Cluster(clusters))
    } else if let Some(value) = focus {
        Ok(CategoryFilter::Focus(vec![value]))
    } else if !dimensions.is_empty() {
        Ok(CategoryFilter::Dimension(dimensions))
    } else {
        Ok(CategoryFilter::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_picks_the_single_active_flag() {
        let filter = category_filter(vec!["ENH".into()], None, Vec::new()).unwrap();
        assert_eq!(filter, CategoryFilter::Cluster(vec!["ENH".into()]));

        let filter = category_filter(Vec::new(), Some("Action".into()), Vec::new()).unwrap();
        assert_eq!(filter, CategoryFilter::Focus(vec!["Action".into()]));

        let filter = category_filter(Vec::new(), None, vec!["Valence".into()]).unwrap();
        assert_eq!(filter, CategoryFilter::Dimension(vec!["Valence".into()]));

        let filter = category_filter(Vec::new(), None, Vec::new()).unwrap();
        assert_eq!(filter, CategoryFilter::None);
    }

    #[test]
    fn category_filter_rejects_combined_flags() {
        let err = category_filter(vec!["ENH".into()], Some("Action".into()), Vec::new());
        assert!(err.is_err());
    }

    #[test]
    fn cli_parses_list_flags() {
        let cli = Cli::try_parse_from([
            "canon", "list", "--search", "harm", "--clusters", "ENH,JE",
        ])
        .unwrap();
        match cli.command {
            Commands::List { search, clusters, .. } => {
                assert_eq!(search, "harm");
                assert_eq!(clusters, vec!["ENH", "JE"]);
            }
            _ => panic!("expected list"),
        }
    }
}
