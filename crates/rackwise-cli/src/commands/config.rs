use std::path::Path;

use rackwise_core::RackwiseConfig;

pub fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (pass --force to overwrite)", path.display());
    }

    std::fs::write(path, RackwiseConfig::default_toml()?)?;
    println!("✓ Generated {}", path.display());
    Ok(())
}
