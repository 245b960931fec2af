use anyhow::{bail, Result};
use specific_platform::get_platform_stability_string;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if std::env::args().len() > 1 {
        bail!("Usage:\n  platform-stability");
    }
    println!("{}", get_platform_stability_string()?);
    Ok(())
}
