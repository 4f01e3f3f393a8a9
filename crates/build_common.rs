// Shared build script utilities for README-to-rustdoc transformation.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Render a crate's README.md into `OUT_DIR/README_GENERATED.md` for the
/// `#![doc = include_str!(...)]` attribute in lib.rs.
///
/// Transformations:
/// 1. Strip 'src/' prefix from links so rustdoc can resolve modules
/// 2. Strip '.rs' extension so links go to modules, not files
/// 3. Rewrite relative workspace-README links to the repository URL
///
/// The generated file is always written (empty when the crate has no
/// README) so the include never breaks the build.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme_path).unwrap_or_default();

    let mut rustdoc_content = content.replace("](src/", "](").replace(".rs)", ")");

    if let Some(url) = workspace_repo_url(crate_dir) {
        rustdoc_content = rustdoc_content.replace("](../../README.md", &format!("]({url}"));
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rustdoc_content).unwrap();
}

/// Extract the repository URL from the workspace Cargo.toml.
/// Returns None if the file can't be read or has no repository field.
fn workspace_repo_url(crate_dir: &str) -> Option<String> {
    let workspace_toml = Path::new(crate_dir)
        .parent()? // crates/
        .parent()? // workspace root
        .join("Cargo.toml");

    let content = fs::read_to_string(workspace_toml).ok()?;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("repository")
            && line.contains('=')
            && let Some(start) = line.find('"')
            && let Some(end) = line.rfind('"')
            && start < end
        {
            return Some(line[start + 1..end].to_string());
        }
    }
    None
}
