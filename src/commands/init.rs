use anyhow::{Context, Result};
use pageqa::config::Config;
use std::path::PathBuf;

/// Write a default `pageqa.toml` into `path`
pub async fn init_config(path: PathBuf) -> Result<()> {
    let config_path = path.join("pageqa.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    let config = Config::default();
    let toml_content = format!("# pageqa configuration\n\n{}", config.to_toml()?);

    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    std::fs::write(&config_path, toml_content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created configuration file: {}", config_path.display());

    let model_dir = path.join(&config.model.model_dir).join(&config.model.model_name);
    println!(
        "Place model.onnx and tokenizer.json for '{}' in {}",
        config.model.model_name,
        model_dir.display()
    );

    Ok(())
}
