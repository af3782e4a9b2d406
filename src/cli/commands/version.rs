use crate::cli::output::Output;
use crate::errors::Result;

/// Show version information
pub fn run() -> Result<()> {
    let output = Output::default();
    output.section(format!("git-replay {}", env!("CARGO_PKG_VERSION")));
    output.bullet(env!("CARGO_PKG_DESCRIPTION"));
    output.bullet(format!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION")));
    output.bullet(format!(
        "Target: {}-{}",
        std::env::consts::ARCH,
        std::env::consts::OS
    ));

    #[cfg(debug_assertions)]
    output.bullet("Build type: Debug");
    #[cfg(not(debug_assertions))]
    output.bullet("Build type: Release");

    Ok(())
}
