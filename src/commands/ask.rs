use anyhow::{Context, Result};
use pageqa::{config::Config, qa::QaEngine, session::QaSession};

/// Process the given URLs, then answer one question
pub async fn ask_once(config: Config, urls: Vec<String>, question: String) -> Result<()> {
    let engine = QaEngine::from_config(&config.model, &config.answering)
        .context("Failed to load question answering model")?;
    let session = QaSession::new(&config, Some(engine))?;

    let report = session.process_urls(&urls).await;
    for outcome in &report.outcomes {
        eprintln!("{}: {}", outcome.url, outcome.summary());
    }
    if let Err(e) = &report.context {
        anyhow::bail!("{}", e);
    }

    let answer = session.ask(&question).await;
    println!("{}", answer);
    Ok(())
}
