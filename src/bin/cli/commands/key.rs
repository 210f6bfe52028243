use anyhow::{Context, Result};

use smartstudy_lib::config::API_KEY_ENV;

use crate::app::App;
use crate::OutputFormat;

pub fn run_set(app: &App, key: &str) -> Result<()> {
    app.storage.save_api_key(key).context("Failed to save API key")?;
    println!("API key saved to {}", app.storage.base_path().display());
    Ok(())
}

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    let (source, key) = match app.storage.load_api_key()? {
        Some(key) => ("file", Some(key)),
        None => match std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            Some(key) => ("environment", Some(key)),
            None => ("none", None),
        },
    };
    let masked = key.as_deref().map(mask_key);

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "source": source, "key": masked })
        ),
        OutputFormat::Plain => match masked {
            Some(masked) => println!("{} (from {})", masked, source),
            None => println!("No API key. Run `key set <KEY>` or set {}", API_KEY_ENV),
        },
    }
    Ok(())
}

/// Keep the last four characters visible
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
