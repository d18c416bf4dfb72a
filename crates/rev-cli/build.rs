//! Build script that stamps `rev --version` with the git revision.

use std::path::PathBuf;
use std::process::Command;

fn main() {
    // The repository root is two levels above this crate
    let git_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../.git");
    println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
    println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());

    let package = env!("CARGO_PKG_VERSION");
    let version = match git_revision() {
        Some(revision) if revision != package => format!("{} ({})", package, revision),
        _ => package.to_string(),
    };

    println!("cargo:rustc-env=REV_VERSION={}", version);
}

/// Nearest tag (or short hash), with a `-dirty` suffix for uncommitted changes.
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    if revision.is_empty() {
        return None;
    }

    // Tags are written v1.2.3
    Some(revision.strip_prefix('v').unwrap_or(revision).to_string())
}
