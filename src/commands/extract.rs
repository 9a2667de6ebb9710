use anyhow::Result;
use pageqa::{config::Config, session::QaSession};
use tracing::info;

/// Fetch one page and print its extracted text
pub async fn extract_page(config: Config, url: String) -> Result<()> {
    let session = QaSession::new(&config, None)?;
    let content = session.extract_url(&url).await?;

    info!(
        "Extracted {} words from {} using the {} strategy{}",
        content.word_count,
        content.url,
        content.strategy,
        if content.used_fallback { " (whole-page fallback)" } else { "" }
    );
    println!("{}", content.text);
    Ok(())
}
