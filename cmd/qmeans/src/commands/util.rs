//! Utility functions for CLI commands.

use std::path::Path;

use anyhow::Context as _;

/// Loads a YAML or JSON document, chosen by file extension (YAML by default).
pub fn load_document<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("parse {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("parse {}", path.display()))?,
    };

    Ok(result)
}

/// Renders a value as pretty JSON or YAML.
pub fn render<T: serde::Serialize>(value: &T, as_json: bool) -> anyhow::Result<String> {
    Ok(if as_json {
        let mut s = serde_json::to_string_pretty(value)?;
        s.push('\n');
        s
    } else {
        serde_yaml::to_string(value)?
    })
}

/// Writes a rendered value to `output_path`, or stdout when absent.
pub fn output_result<T: serde::Serialize>(
    value: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = render(value, as_json)?;
    match output_path {
        Some(path) => std::fs::write(path, output).with_context(|| format!("write {path}"))?,
        None => print!("{}", output),
    }
    Ok(())
}
