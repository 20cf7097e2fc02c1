//! Print the capability descriptor

use anyhow::Result;
use reel_gen::GenerateVideoCapability;

pub fn run() -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&GenerateVideoCapability::descriptor())?
    );
    Ok(())
}
