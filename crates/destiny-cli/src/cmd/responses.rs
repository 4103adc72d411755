use crate::output::{print_json, print_table};
use anyhow::{Context, Result};
use destiny_core::config::Config;
use destiny_core::responses::ResponseStore;
use serde_json::Value;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let store = ResponseStore::new(config.responses_path(root));
    let responses = store
        .list()
        .with_context(|| format!("failed to read {}", store.path().display()))?;

    if json {
        return print_json(&responses);
    }
    if responses.is_empty() {
        println!("No responses yet.");
        return Ok(());
    }

    let field = |fields: &serde_json::Map<String, Value>, key: &str| match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    };
    let rows = responses
        .iter()
        .map(|r| {
            let num = |key: &str| r.fields.get(key).and_then(Value::as_u64);
            let date = match (num("year"), num("month"), num("day")) {
                (Some(y), Some(m), Some(d)) => format!("{y}.{m:02}.{d:02}"),
                _ => "-".to_string(),
            };
            vec![
                r.id.clone(),
                r.created_at.clone(),
                field(&r.fields, "name"),
                date,
                field(&r.fields, "gender"),
            ]
        })
        .collect();
    print_table(&["ID", "CREATED", "NAME", "BIRTH DATE", "GENDER"], rows);
    Ok(())
}
