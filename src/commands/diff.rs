//! `needy diff` - needs between a desired and a current state file

use anyhow::Result;
use colored::Colorize;
use needystates::{Need, Operation, State, StateOptions};

use crate::Context;
use crate::cli::{DiffArgs, OutputFormat};
use crate::config;
use crate::ui;

pub fn run(ctx: &Context, args: DiffArgs) -> Result<()> {
    let needs = compute_needs(&args)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&needs)?),
        OutputFormat::Text => display_needs(ctx, &needs, args.long),
    }

    Ok(())
}

/// Load both files and compare them
pub fn compute_needs(args: &DiffArgs) -> Result<Vec<Need>> {
    let (desired, _) = config::load_state(&args.desired)?;
    let (current, _) = config::load_state(&args.current)?;

    let mut options = StateOptions::new();
    if let Some(name) = &args.name {
        options = options.name(name.as_str());
    }
    if let Some(path) = &args.address_path {
        options = options.address_path(split_address_path(path));
    }
    if let Some(path) = &args.descriptors {
        options = options.descriptors(config::load_descriptors(path)?);
    }

    let desired = State::from_mapping(&desired, options.clone());
    let current = State::from_mapping(&current, options);
    let needs = desired.determine_needs(&current, args.strict);

    log::info!(
        "{} needs to turn {} into {}",
        needs.len(),
        args.current.display(),
        args.desired.display()
    );
    Ok(needs)
}

/// Split a dotted address path, ignoring empty segments
fn split_address_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn display_needs(ctx: &Context, needs: &[Need], long: bool) {
    if needs.is_empty() {
        println!();
        ui::success("No changes needed");
        return;
    }

    if !ctx.quiet {
        ui::header(&format!("{} needs", needs.len()));
    }

    for need in needs {
        let symbol = match need.operation {
            Operation::Add => "+".green(),
            Operation::Delete | Operation::Clear => "-".red(),
            Operation::Set => "~".yellow(),
            Operation::Get => "?".dimmed(),
        };

        let label = if long {
            need.long_label()
        } else {
            need.short_label()
        };
        let mut lines = label.lines();
        if let Some(first) = lines.next() {
            println!("  {} {}", symbol, first.bold());
        }
        for line in lines {
            ui::dim(&format!("  {}", line));
        }
    }
}
