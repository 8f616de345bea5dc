use cadet_roster::{
    BuildReport, BuilderConfig, RosterBundle, ScheduleBuilder, check_balance,
    load_bundle_from_json, logging, save_schedule_to_csv, save_schedule_to_json,
};
use chrono::{Datelike, NaiveDate};
use std::io::{self, Write};

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_schedule(bundle: &RosterBundle) -> String {
    let schedule = &bundle.schedule;
    let rows: Vec<Vec<String>> = schedule
        .assignments
        .iter()
        .map(|assignment| {
            let names = assignment
                .cadet_ids
                .iter()
                .map(|id| match bundle.find_cadet(id) {
                    Some(cadet) => format!("{} [{}]", cadet.name, cadet.role().label()),
                    None => format!("{id} [Unknown]"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                assignment.date.to_string(),
                assignment.date.weekday().to_string(),
                names,
            ]
        })
        .collect();
    render_text_table(&["date", "day", "cadets"], &rows)
}

fn render_roster(bundle: &RosterBundle) -> String {
    let rows: Vec<Vec<String>> = bundle
        .roster
        .iter()
        .map(|cadet| {
            let available = bundle
                .availability
                .iter()
                .filter(|r| r.cadet_id == cadet.id && r.schedule_id == bundle.schedule.id)
                .map(|r| r.days.len())
                .sum::<usize>();
            vec![
                cadet.id.clone(),
                cadet.name.clone(),
                cadet.gender.map(|g| g.as_str()).unwrap_or("-").to_string(),
                cadet.role().label().to_string(),
                cadet.eligible.to_string(),
                available.to_string(),
            ]
        })
        .collect();
    render_text_table(
        &["id", "name", "gender", "role", "eligible", "available_days"],
        &rows,
    )
}

fn print_report(report: &BuildReport) {
    println!("Summary            : {}", report.to_cli_summary());
    let join_dates = |dates: &[NaiveDate]| {
        dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !report.uncovered_days.is_empty() {
        println!("Uncovered days     : {}", join_dates(&report.uncovered_days));
    }
    if !report.days_without_chief.is_empty() {
        println!("Days without chief : {}", join_dates(&report.days_without_chief));
    }
    if !report.days_without_certified.is_empty() {
        println!(
            "Days w/o certified : {}",
            join_dates(&report.days_without_certified)
        );
    }
    for (cadet_id, load) in &report.cadet_loads {
        println!("  {:<16} {}", cadet_id, load);
    }
}

fn print_config(config: &BuilderConfig) {
    println!("Max sweeps         : {}", config.max_rebalance_iterations);
    println!("Load tolerance     : {}", config.load_tolerance);
    println!("Certified offset   : {}", config.certified_load_offset);
    println!("Chief passes       : {}", config.chief_balance_passes);
    println!("General passes     : {}", config.general_pool_passes);
    match config.seed {
        Some(seed) => println!("Seed               : {seed}"),
        None => println!("Seed               : random"),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <json_path>                   Load a roster bundle (schedule, roster, availability)\n  show                               Show current assignments\n  days                               List working days of the schedule\n  roster                             Show the roster with roles and availability counts\n  build                              Build assignments from the loaded bundle\n  seed <u64|none>                    Fix or clear the shuffle seed\n  report                             Show the last build report\n  check                              Check balance of the current assignments\n  exclude <YYYY-MM-DD>               Exclude a date from the schedule\n  include <YYYY-MM-DD>               Remove a date from the exclusions\n  config show                        Show builder configuration\n  config set <json_path>             Load builder configuration from JSON file\n  config save <json_path>            Save builder configuration to JSON file\n  save <json|csv> <path>             Persist the schedule to disk\n  db save <path>                     Store the schedule in a SQLite database\n  db load <path> <schedule_id>       Replace the schedule with a stored one\n  quit|exit                          Exit"
    );
}

fn parse_date(input: Option<&str>) -> Option<NaiveDate> {
    input.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[cfg(feature = "sqlite")]
fn run_db_command(parts: &mut std::str::SplitWhitespace<'_>, bundle: &mut RosterBundle) {
    use cadet_roster::{ScheduleStore, SqliteScheduleStore};

    let sub = parts.next();
    let path = parts.next();
    match (sub, path) {
        (Some("save"), Some(path)) => {
            let result = SqliteScheduleStore::new(path)
                .and_then(|store| store.save_schedule(&bundle.schedule));
            match result {
                Ok(_) => println!("Schedule stored in {path}."),
                Err(e) => println!("Error storing schedule: {}", e),
            }
        }
        (Some("load"), Some(path)) => {
            let Some(id) = parts.next() else {
                println!("Usage: db load <path> <schedule_id>");
                return;
            };
            let result = SqliteScheduleStore::new(path).and_then(|store| store.load_schedule(id));
            match result {
                Ok(Some(schedule)) => {
                    bundle.schedule = schedule;
                    println!("Schedule {id} loaded from {path}.");
                }
                Ok(None) => println!("Schedule {id} not found."),
                Err(e) => println!("Error loading schedule: {}", e),
            }
        }
        _ => println!("Usage: db <save|load> <path> [schedule_id]"),
    }
}

#[cfg(not(feature = "sqlite"))]
fn run_db_command(_parts: &mut std::str::SplitWhitespace<'_>, _bundle: &mut RosterBundle) {
    println!("Rebuild with the `sqlite` feature to enable database commands.");
}

fn main() {
    logging::init();

    let mut bundle: Option<RosterBundle> = None;
    let mut config = BuilderConfig::default();
    let mut last_report: Option<BuildReport> = None;

    println!("Cadet Roster (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => match load_bundle_from_json(path) {
                    Ok(loaded) => {
                        println!(
                            "Loaded bundle from {}: {} cadets, {} availability records.",
                            path,
                            loaded.roster.len(),
                            loaded.availability.len()
                        );
                        bundle = Some(loaded);
                        last_report = None;
                    }
                    Err(e) => println!("Error loading bundle: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => print_config(&config),
                (Some("set"), Some(path)) => match BuilderConfig::load(path) {
                    Ok(loaded) => {
                        config = loaded;
                        println!("Builder configuration loaded from {}.", path);
                    }
                    Err(e) => println!("Error loading config: {}", e),
                },
                (Some("save"), Some(path)) => match config.save(path) {
                    Ok(_) => println!("Builder configuration saved to {}.", path),
                    Err(e) => println!("Error saving config: {}", e),
                },
                _ => println!("Usage: config <show|set <json_path>|save <json_path>>"),
            },
            "seed" => match parts.next() {
                Some("none") => {
                    config.seed = None;
                    println!("Seed cleared.");
                }
                Some(value) => match value.parse::<u64>() {
                    Ok(seed) => {
                        config.seed = Some(seed);
                        println!("Seed set to {seed}.");
                    }
                    Err(_) => println!("Invalid seed"),
                },
                None => println!("Usage: seed <u64|none>"),
            },
            _ => {
                let Some(current) = bundle.as_mut() else {
                    println!("No bundle loaded. Use 'load <json_path>'.");
                    continue;
                };
                match cmd {
                    "show" => println!("{}", render_schedule(current)),
                    "roster" => println!("{}", render_roster(current)),
                    "days" => {
                        let schedule = &current.schedule;
                        match cadet_roster::WorkCalendar::for_schedule(schedule)
                            .working_days_in_range(schedule.start_date, schedule.end_date)
                        {
                            Ok(days) => {
                                println!("{} working days", days.len());
                                for day in days {
                                    println!("  {} {}", day, day.weekday());
                                }
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    "build" => {
                        let builder = ScheduleBuilder::new(config.clone());
                        match builder.build(
                            &current.schedule,
                            &current.roster,
                            &current.availability,
                        ) {
                            Ok(outcome) => {
                                current.schedule = outcome.schedule;
                                println!("Built schedule ({})", outcome.report.to_cli_summary());
                                println!("{}", render_schedule(current));
                                last_report = Some(outcome.report);
                            }
                            Err(e) => println!("Build error: {}", e),
                        }
                    }
                    "report" => match &last_report {
                        Some(report) => print_report(report),
                        None => println!("No build report yet. Use 'build'."),
                    },
                    "check" => match check_balance(
                        &current.schedule,
                        &current.roster,
                        &current.availability,
                        &config,
                    ) {
                        Ok(report) => {
                            println!(
                                "Balanced: {} ({} days checked)",
                                report.balanced, report.days_checked
                            );
                            for day in &report.violations {
                                let spread = day
                                    .load_spread
                                    .map(|s| s.to_string())
                                    .unwrap_or_else(|| "-".to_string());
                                println!(
                                    "  {} load_ok={} spread={} gender_ok={}",
                                    day.date, day.load_balanced, spread, day.gender_balanced
                                );
                            }
                        }
                        Err(e) => println!("Check error: {}", e),
                    },
                    "exclude" | "include" => match parse_date(parts.next()) {
                        Some(date) => {
                            let schedule = &mut current.schedule;
                            if cmd == "exclude" {
                                if !schedule.excluded_dates.contains(&date) {
                                    schedule.excluded_dates.push(date);
                                    schedule.excluded_dates.sort();
                                }
                                schedule.assignments.retain(|a| a.date != date);
                                println!("Excluded {date}.");
                            } else {
                                schedule.excluded_dates.retain(|d| *d != date);
                                println!("Included {date}.");
                            }
                        }
                        None => println!("Usage: {} <YYYY-MM-DD>", cmd),
                    },
                    "save" => {
                        let fmt = parts.next();
                        let path = parts.next();
                        match (fmt, path) {
                            (Some("json"), Some(path)) => {
                                match save_schedule_to_json(&current.schedule, path) {
                                    Ok(_) => println!("Schedule saved to {}.", path),
                                    Err(e) => println!("Error saving JSON: {}", e),
                                }
                            }
                            (Some("csv"), Some(path)) => {
                                match save_schedule_to_csv(&current.schedule, path) {
                                    Ok(_) => println!("Schedule saved to {}.", path),
                                    Err(e) => println!("Error saving CSV: {}", e),
                                }
                            }
                            _ => println!("Usage: save <json|csv> <path>"),
                        }
                    }
                    "db" => run_db_command(&mut parts, current),
                    _ => println!("Unknown command. Type 'help'."),
                }
            }
        }
    }
}
