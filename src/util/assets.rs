use std::borrow::Cow;

use rust_embed::RustEmbed;

use crate::domain::TableError;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

pub const REFERENCE_TABLES: &str = "/assets/reference_tables.json";

/// Returns the shipped reference tables document.
pub fn reference_tables_json() -> Result<Cow<'static, [u8]>, TableError> {
    load_asset(REFERENCE_TABLES).ok_or(TableError::MissingAsset(REFERENCE_TABLES))
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    let canonical = canonical_asset_path(path);
    EmbeddedAssets::get(&canonical).map(|file| file.data)
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if let Some(rest) = trimmed.strip_prefix("assets/") {
        rest.to_string()
    } else {
        trimmed.to_string()
    }
}
