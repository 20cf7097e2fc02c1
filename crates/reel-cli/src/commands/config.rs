//! Show resolved configuration

use anyhow::{Context, Result};
use reel_gen::providers::available_providers;
use reel_gen::ReelConfig;

pub fn run() -> Result<()> {
    let config = ReelConfig::load().context("Failed to load configuration")?;

    let mut shown = config.clone();
    shown.provider.api_key = shown.provider.api_key.as_deref().map(mask);
    shown.platform.api_key = shown.platform.api_key.as_deref().map(mask);
    println!("{}", toml::to_string_pretty(&shown)?);

    println!("Providers: {}", available_providers().join(", "));
    match config.require_secrets() {
        Ok(()) => println!("Secrets: OK"),
        Err(e) => println!("Secrets: {}", e),
    }
    Ok(())
}

/// Keep the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
