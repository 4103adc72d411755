use crate::output::{print_json, print_table};
use anyhow::{Context, Result};
use destiny_core::config::Config;
use destiny_core::fortune::{characters, Portrait};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> Result<()> {
    if json {
        return print_json(&characters());
    }

    let config = Config::load(root).context("failed to load config")?;
    let assets = config.assets_path(root);
    let rows = characters()
        .iter()
        .map(|c| {
            let portrait = match c.portrait(&assets) {
                Portrait::Image(path) => path.to_string(),
                Portrait::Symbol(glyph) => glyph.to_string(),
            };
            vec![
                c.id.to_string(),
                c.name.to_string(),
                c.korean_name.to_string(),
                c.role.to_string(),
                c.element.tag().to_string(),
                portrait,
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "KOREAN", "ROLE", "ELEMENT", "PORTRAIT"], rows);
    Ok(())
}
