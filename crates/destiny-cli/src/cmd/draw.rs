use crate::output::print_json;
use anyhow::{Context, Result};
use destiny_core::config::Config;
use destiny_core::fortune::{FortuneOutcome, OutcomeResolver};
use destiny_core::share::share_text;
use std::path::Path;

pub fn run(root: &Path, seed: Option<u64>, json: bool) -> Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let outcome = OutcomeResolver::new(super::random_source(seed)).resolve();
    let share = share_text(&outcome, config.share_origin());

    if json {
        print_json(&serde_json::json!({
            "outcome": outcome,
            "shareText": share,
        }))?;
    } else {
        print_outcome(&outcome);
        println!();
        println!("{share}");
    }
    Ok(())
}

/// Human-readable rendering of a drawn fortune.
pub(crate) fn print_outcome(outcome: &FortuneOutcome) {
    let c = outcome.character;
    println!("{} {} ({})", c.symbol, c.name, c.korean_name);
    println!("  {} · {}", c.role, c.element.tag());
    println!("  {}", c.description);
    println!();
    println!("Saju:          {}", outcome.saju_message);
    println!("Today:         {}", outcome.daily_fortune);
    println!("Compatibility: {}", outcome.compatibility);
    println!("Lucky Item:    {}", outcome.lucky_item);
    println!("Lucky Color:   {}", outcome.lucky_color);
    println!("Lucky Number:  {}", outcome.lucky_number);
}
