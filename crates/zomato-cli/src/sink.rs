//! JSON files written by `--write-json`.
//!
//! Layout under the output directory:
//! - `restaurant_data/restaurants_page<N>.json`
//! - `menus/<restaurant name>_menu.json`

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

pub(crate) fn restaurants_page_path(out_dir: &Path, page: usize) -> PathBuf {
    out_dir
        .join("restaurant_data")
        .join(format!("restaurants_page{page}.json"))
}

pub(crate) fn menu_path(out_dir: &Path, restaurant_name: &str) -> PathBuf {
    out_dir
        .join("menus")
        .join(format!("{}_menu.json", sanitize_file_name(restaurant_name)))
}

/// Serializes `value` as pretty JSON to `path`, creating parent directories.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote JSON output");
    Ok(())
}

/// Keeps letters, digits, spaces, `-` and `_`; anything else becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "restaurant".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_path_layout() {
        assert_eq!(
            restaurants_page_path(Path::new("out"), 2),
            PathBuf::from("out/restaurant_data/restaurants_page2.json")
        );
    }

    #[test]
    fn menu_path_sanitizes_name() {
        assert_eq!(
            menu_path(Path::new("."), "Cafe/Bar: 24*7"),
            PathBuf::from("./menus/Cafe_Bar_ 24_7_menu.json")
        );
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(sanitize_file_name("  "), "restaurant");
        assert_eq!(sanitize_file_name("///"), "restaurant");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(sanitize_file_name("Café Noir"), "Café Noir");
    }

    #[tokio::test]
    async fn write_json_creates_directories() {
        let root = std::env::temp_dir().join(format!("zomato-cli-{}", uuid::Uuid::new_v4()));
        let path = restaurants_page_path(&root, 1);

        write_json(&path, &serde_json::json!([{"info": {"name": "R1"}}]))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed[0]["info"]["name"], "R1");
        std::fs::remove_dir_all(&root).unwrap();
    }
}
