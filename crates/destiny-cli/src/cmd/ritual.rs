//! Interactive terminal ritual.
//!
//! One line per step. An empty line advances with the current value (the
//! Enter accelerator) and `<` steps back. After the name step `back` also
//! steps back; on the name step it is just a name. Prompts go to stderr so
//! `--json` output stays machine-readable.

use crate::output::print_json;
use anyhow::{Context, Result};
use destiny_core::birth::{BirthData, BirthPatch, Gender};
use destiny_core::config::Config;
use destiny_core::fortune::RandomSource;
use destiny_core::ritual::{Phase, Progress, Ritual};
use destiny_core::share::share_text;
use destiny_core::sink::{InlineDispatcher, SinkSet};
use destiny_core::wizard::{Retreat, WizardStep};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

pub fn run(root: &Path, seed: Option<u64>, json: bool) -> Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "{}", w.message);
    }

    // Inline so the record is on disk before the process exits.
    let sink = Arc::new(SinkSet::from_config(root, &config));
    let mut ritual = Ritual::new(
        super::random_source(seed),
        sink,
        Arc::new(InlineDispatcher),
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut prompt = std::io::stderr();
    match drive(&mut ritual, &mut input, &mut prompt)? {
        Ending::Completed => {}
        Ending::Landing => {
            println!("Back at the start. Run `destiny ritual` to begin again.");
            return Ok(());
        }
        Ending::InputClosed => anyhow::bail!("input ended before the ritual was complete"),
    }

    let Some(record) = ritual.result() else {
        anyhow::bail!("ritual finished without a result");
    };
    let share = share_text(&record.outcome, config.share_origin());
    if json {
        print_json(&serde_json::json!({
            "data": record.birth,
            "outcome": record.outcome,
            "shareText": share,
        }))?;
    } else {
        println!();
        println!(
            "{} · {} {} · {}",
            record.birth.name.trim(),
            record.birth.birth_date_label(),
            record.birth.birth_time_label(),
            record.birth.gender.map_or("-", Gender::label),
        );
        println!();
        super::draw::print_outcome(&record.outcome);
        println!();
        println!("{share}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Driving the wizard
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Ending {
    Completed,
    Landing,
    InputClosed,
}

/// One line of user input, already interpreted for the current step.
#[derive(Debug, PartialEq)]
enum Command {
    Advance,
    Back,
    Set(BirthPatch),
}

fn drive<R: RandomSource>(
    ritual: &mut Ritual<R>,
    input: &mut impl BufRead,
    prompt: &mut impl Write,
) -> Result<Ending> {
    ritual.begin();
    let mut line = String::new();
    loop {
        let (step, data) = match ritual.phase() {
            Phase::Wizard(w) => (w.step(), w.data().clone()),
            Phase::Result(_) => return Ok(Ending::Completed),
            Phase::Landing => return Ok(Ending::Landing),
        };
        write!(
            prompt,
            "[{}/{}] {} / {} ({}) > ",
            step.index() + 1,
            WizardStep::count(),
            step.title(),
            step.title_ko(),
            current_value(step, &data),
        )?;
        prompt.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(prompt)?;
            return Ok(Ending::InputClosed);
        }

        let command = match parse_line(step, line.trim_end_matches(['\r', '\n'])) {
            Ok(command) => command,
            Err(hint) => {
                writeln!(prompt, "  {hint}")?;
                continue;
            }
        };
        match command {
            Command::Back => {
                if ritual.retreat() == Some(Retreat::Aborted) {
                    writeln!(prompt, "  leaving the ritual")?;
                }
                continue;
            }
            Command::Set(patch) => {
                ritual.update(patch);
            }
            Command::Advance => {}
        }
        if let Progress::Blocked(step) = ritual.activate() {
            writeln!(prompt, "  {}", blocked_hint(step))?;
        }
    }
}

fn parse_line(step: WizardStep, line: &str) -> std::result::Result<Command, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Advance);
    }
    if trimmed == "<" || (step != WizardStep::Name && trimmed.eq_ignore_ascii_case("back")) {
        return Ok(Command::Back);
    }
    match step {
        WizardStep::Name => Ok(Command::Set(BirthPatch::name(trimmed))),
        WizardStep::Date => {
            let hint = || "enter a date as YYYY-MM-DD".to_string();
            let parts = split_numbers(trimmed, &['-', '.', '/'])
                .filter(|p| p.len() == 3)
                .ok_or_else(hint)?;
            let year = i32::try_from(parts[0]).map_err(|_| hint())?;
            Ok(Command::Set(BirthPatch::date(year, parts[1], parts[2])))
        }
        WizardStep::Time => {
            let parts = split_numbers(trimmed, &[':'])
                .filter(|p| p.len() == 2)
                .ok_or_else(|| "enter a time as HH:MM (minutes 00, 15, 30 or 45)".to_string())?;
            Ok(Command::Set(BirthPatch::time(parts[0], parts[1])))
        }
        WizardStep::Gender => trimmed
            .parse::<Gender>()
            .map(|g| Command::Set(BirthPatch::gender(g)))
            .map_err(|_| "enter yin or yang".to_string()),
    }
}

fn split_numbers(s: &str, separators: &[char]) -> Option<Vec<u32>> {
    s.split(separators)
        .map(|p| p.trim().parse::<u32>().ok())
        .collect()
}

fn current_value(step: WizardStep, data: &BirthData) -> String {
    match step {
        WizardStep::Name if data.name.is_empty() => "empty".to_string(),
        WizardStep::Name => data.name.clone(),
        WizardStep::Date => data.birth_date_label(),
        WizardStep::Time => data.birth_time_label(),
        WizardStep::Gender => data.gender.map_or("yin/yang", Gender::as_str).to_string(),
    }
}

fn blocked_hint(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Name => "a name of 1 to 50 characters is needed to continue",
        WizardStep::Gender => "choose yin or yang to continue",
        WizardStep::Date | WizardStep::Time => "this step cannot continue yet",
    }
}
