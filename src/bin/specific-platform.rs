use anyhow::{bail, Context, Result};
use specific_platform::{get_specific_platform, get_specific_platform_string};
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "Usage:\n  specific-platform          print the normalized platform string\n  specific-platform --json   print the detected platform record as JSON"
}

fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [] => {
            println!("{}", get_specific_platform_string()?);
            Ok(())
        }
        [flag] if flag == "--json" => {
            let plat = get_specific_platform()?;
            let json = serde_json::to_string_pretty(&plat).context("serializing platform record")?;
            println!("{json}");
            Ok(())
        }
        _ => bail!(usage()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
