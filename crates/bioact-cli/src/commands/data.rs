use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::Result;
use std::path::PathBuf;
use tracing::info;

pub async fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => {
            handle_path()?;
        }
        DataCommands::SetPath { path } => {
            handle_set_path(path)?;
        }
        DataCommands::ResetPath => {
            handle_reset_path()?;
        }
        DataCommands::Targets => {
            handle_targets()?;
        }
    }
    Ok(())
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    info!("Setting custom data path to {:?}", &path);
    DataManager::set_custom_path(&path)?;
    println!("✓ Data path set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    info!("Resetting data path to default.");
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "✓ Data path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}

fn handle_targets() -> Result<()> {
    let manager = DataManager::new()?;
    let targets = manager.list_targets()?;
    if targets.is_empty() {
        println!(
            "No targets installed under {}",
            manager.get_data_path().join(crate::data::TARGETS_DIR).display()
        );
        return Ok(());
    }

    println!("Installed targets in {}:", manager.get_data_path().display());
    for target in targets {
        if target.is_complete() {
            println!("  {}", target.name);
        } else {
            let mut missing = Vec::new();
            if !target.has_model {
                missing.push(crate::data::MODEL_FILE);
            }
            if !target.has_schema {
                missing.push(crate::data::SCHEMA_FILE);
            }
            println!("  {} (incomplete, missing {})", target.name, missing.join(", "));
        }
    }
    Ok(())
}
