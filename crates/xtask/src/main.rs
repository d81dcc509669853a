use anyhow::Context;
use serde::Deserialize;

/// The pure domain crate.
const DOMAIN_CRATE: &str = "underworld-domain";

/// Crates the domain crate must never depend on.
const FORBIDDEN_IN_DOMAIN: &[&str] = &["reqwest", "tokio", "underworld-player"];

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, `"dev"` or `"build"` otherwise.
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata output")?;

    let violations = violations(&metadata);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("arch-check: {violation}");
        }
        anyhow::bail!("arch-check failed with {} violation(s)", violations.len());
    }

    println!("arch-check: ok");
    Ok(())
}

fn violations(metadata: &Metadata) -> Vec<String> {
    metadata
        .packages
        .iter()
        .filter(|package| package.name == DOMAIN_CRATE)
        .flat_map(|package| {
            package
                .dependencies
                .iter()
                .filter(|dep| dep.kind.as_deref() != Some("dev"))
                .filter(|dep| FORBIDDEN_IN_DOMAIN.contains(&dep.name.as_str()))
                .map(move |dep| format!("{} must not depend on {}", package.name, dep.name))
        })
        .collect()
}
