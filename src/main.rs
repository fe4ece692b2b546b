// errand - tell your terminal what you need done
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use chrono::Local;
use errand_lib::{
    config::Config,
    core::{analytics::Period, DayAgenda, Dispatcher, Exchange, Outcome, ProductivityReport, Session},
    interpreter::{DateResolver, SmartSuggestion, SuggestionEngine},
    Database, Result,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = Config::load()?;
    init_logging(&config);

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "say" => handle_say(&config, &args[2..]).await,
        "repl" => handle_repl(&config).await,
        "tasks" => handle_tasks(&config, &args[2..]).await,
        "agenda" => handle_agenda(&config, &args[2..]).await,
        "suggest" => handle_suggest(&config).await,
        "stats" => handle_stats(&config, &args[2..]).await,
        "history" => handle_history(&config, &args[2..]).await,
        "status" => handle_status(&config).await,
        "version" | "-v" | "--version" => {
            println!("errand v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

// ERRAND_LOG wins over the config file. Logs go to stderr so they never mix
// with command output.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("ERRAND_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn handle_say(config: &Config, args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: Nothing to say. Try: errand say create task buy milk");
        return Ok(());
    }

    let mut session = open_session(config).await?;
    let exchange = session.handle_now(&args.join(" ")).await?;
    print_exchange(&exchange);

    Ok(())
}

async fn handle_repl(config: &Config) -> Result<()> {
    let mut session = open_session(config).await?;

    println!("errand v{}. Type 'help' for ideas, 'reset' to start over, 'exit' to quit.", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            "reset" => {
                session.reset();
                println!("Starting fresh.");
                continue;
            }
            text => match session.handle_now(text).await {
                Ok(exchange) => print_exchange(&exchange),
                // keep the loop alive; one bad line shouldn't end the conversation
                Err(e) => eprintln!("✗ {}", e.user_message()),
            },
        }
    }

    Ok(())
}

async fn handle_tasks(config: &Config, args: &[String]) -> Result<()> {
    let include_completed = args.iter().any(|arg| arg == "--all");
    let db = get_database(config).await?;
    let tasks = db.get_tasks(include_completed).await?;
    let now = Local::now().naive_local();

    if tasks.is_empty() {
        println!("No tasks. Try: errand say create task <something>");
        return Ok(());
    }

    println!("\nTasks:");
    println!("{}", "=".repeat(60));
    for task in &tasks {
        let status = if task.completed {
            "✓"
        } else if task.is_overdue(now) {
            "!"
        } else {
            " "
        };
        let due = task
            .due_date
            .map(|d| format!(" due {}", d.format("%a %b %-d %H:%M")))
            .unwrap_or_default();
        println!(
            "{:4}. {} {} [{}, {}, {} min]{}",
            task.id, status, task.title, task.priority, task.category, task.estimated_duration, due
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_agenda(config: &Config, args: &[String]) -> Result<()> {
    let phrase = if args.is_empty() {
        "today".to_string()
    } else {
        args.join(" ")
    };

    let resolver = DateResolver::new()?;
    let Some(when) = resolver.resolve_combined(&phrase, Local::now().naive_local()) else {
        eprintln!("Couldn't work out which day '{}' is", phrase);
        return Ok(());
    };

    let db = Arc::new(get_database(config).await?);
    let agenda = Dispatcher::new(db).agenda(when.date()).await?;
    print_agenda(&agenda);

    Ok(())
}

async fn handle_suggest(config: &Config) -> Result<()> {
    let db = Arc::new(get_database(config).await?);
    let now = Local::now().naive_local();
    let snapshot = Dispatcher::new(db).load_snapshot(now).await?;

    let suggestions = SuggestionEngine::generate(&snapshot, now, config.suggestion_limit);
    print_suggestions(&suggestions);

    Ok(())
}

async fn handle_stats(config: &Config, args: &[String]) -> Result<()> {
    let period = match args.first() {
        Some(arg) => match arg.parse::<Period>() {
            Ok(period) => period,
            Err(e) => {
                eprintln!("Error: {}", e.user_message());
                eprintln!("Periods: today, week, month, all");
                return Ok(());
            }
        },
        None => Period::Week,
    };

    let db = Arc::new(get_database(config).await?);
    let report = Dispatcher::new(db)
        .report(period, Local::now().naive_local())
        .await?;
    print_report(&report);

    Ok(())
}

async fn handle_history(config: &Config, args: &[String]) -> Result<()> {
    let limit = args
        .first()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(10);

    let db = get_database(config).await?;
    let entries = db.get_conversation_log(limit).await?;

    if entries.is_empty() {
        println!("Nothing said yet.");
        return Ok(());
    }

    println!("\nRecent utterances:");
    println!("{}", "=".repeat(60));
    for (i, entry) in entries.iter().enumerate() {
        let status = if entry.success { "✓" } else { "✗" };
        println!(
            "{:3}. {} {} -> {}",
            i + 1,
            status,
            entry.input,
            entry.action.as_deref().unwrap_or("none")
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_status(config: &Config) -> Result<()> {
    let db = get_database(config).await?;
    let stats = db.stats().await?;

    println!("\nerrand Status");
    println!("{}", "=".repeat(60));
    println!("\nDatabase: {}", db.path().display());
    println!("  Tasks:      {}", stats.total_tasks);
    println!("  Notes:      {}", stats.total_notes);
    println!("  Reminders:  {}", stats.total_reminders);
    println!("  Events:     {}", stats.total_events);
    println!("  Utterances: {}", stats.total_utterances);
    println!("  Pool size:  {}", stats.pool_size);
    println!("{}", "=".repeat(60));

    db.close().await;
    Ok(())
}

fn print_exchange(exchange: &Exchange) {
    let result = &exchange.result;
    let marker = if result.success { "✓" } else { "?" };
    println!("{} {}", marker, result.message);

    match &exchange.outcome {
        Outcome::Agenda(agenda) => print_agenda(agenda),
        Outcome::Report(report) => print_report(report),
        Outcome::Suggestions(suggestions) => print_suggestions(suggestions),
        Outcome::AwaitingChoice(tasks) => {
            for (i, task) in tasks.iter().enumerate() {
                println!("  {}. {}", i + 1, task.title);
            }
            println!("Say 'the first one', 'the second one', or 'option N'.");
        }
        Outcome::TaskCreated(task) => {
            println!(
                "  [{}, {}, ~{} min]",
                task.priority, task.category, task.estimated_duration
            );
        }
        Outcome::TaskCompleted(_)
        | Outcome::NoteCreated(_)
        | Outcome::ReminderCreated(_)
        | Outcome::EventCreated(_) => {}
        Outcome::Nothing => {
            if !result.suggestions.is_empty() {
                println!("\nTry:");
                for suggestion in &result.suggestions {
                    println!("  • {}", suggestion);
                }
            }
        }
    }
}

fn print_agenda(agenda: &DayAgenda) {
    println!("\n{}", agenda.date.format("%A, %B %-d"));
    println!("{}", "=".repeat(60));

    if agenda.is_empty() {
        println!("Nothing planned.");
    }
    for event in &agenda.events {
        println!(
            "  {}-{}  {} ({})",
            event.start_time.format("%H:%M"),
            event.end_time.format("%H:%M"),
            event.title,
            event.event_type
        );
    }
    for reminder in &agenda.reminders {
        println!("  {}  ⏰ {}", reminder.reminder_time.format("%H:%M"), reminder.title);
    }
    for task in &agenda.tasks_due {
        let status = if task.completed { "✓" } else { " " };
        println!("  due    {} {}", status, task.title);
    }

    println!("{}", "=".repeat(60));
}

fn print_report(report: &ProductivityReport) {
    println!("\nProductivity for {}", report.period.label());
    println!("{}", "=".repeat(60));
    println!("  Tasks:           {}", report.total);
    println!("  Completed:       {} ({}%)", report.completed, report.completion_percent());
    println!("  Pending:         {}", report.pending);
    println!("  Overdue:         {}", report.overdue);
    println!("  Avg. estimate:   {:.0} min", report.average_estimated_duration);

    if !report.by_category.is_empty() {
        println!("\n  By category:");
        for breakdown in &report.by_category {
            println!(
                "    {:<10} {}/{} done",
                breakdown.category, breakdown.completed, breakdown.total
            );
        }
    }
    println!("{}", "=".repeat(60));
}

fn print_suggestions(suggestions: &[SmartSuggestion]) {
    if suggestions.is_empty() {
        println!("Nothing needs your attention right now.");
        return;
    }

    println!("\nSuggestions");
    println!("{}", "=".repeat(60));
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!(
            "\n{}. {} (confidence: {:.0}%)",
            i + 1,
            suggestion.command,
            suggestion.confidence * 100.0
        );
        println!("   {}", suggestion.reason);
    }
    println!("\n{}", "=".repeat(60));
}

async fn open_session(config: &Config) -> Result<Session> {
    let db = Arc::new(get_database(config).await?);
    Session::new(db, config)
}

async fn get_database(config: &Config) -> Result<Database> {
    Database::new(&config.database_path).await
}

fn print_usage() {
    println!(
        r#"errand v{} - Tell your terminal what you need done

USAGE:
    errand <COMMAND> [OPTIONS]

COMMANDS:
    say <text>             Say something ("create task buy milk")
    repl                   Talk back and forth, follow-ups included
    tasks [--all]          List open tasks (--all includes finished ones)
    agenda [day]           Show the agenda for a day (default: today)
    suggest                What to focus on next
    stats [period]         Productivity for today, week, month or all
    history [limit]        Recent utterances (default: 10)
    status                 Show database stats
    version                Show version
    help                   Show this help

EXAMPLES:
    errand say remind me to call Sarah at 3pm
    errand say schedule lunch with Alex tomorrow at noon
    errand say what's my schedule for today
    errand agenda friday
    errand stats month

CONFIGURATION:
    ~/.errand/config.json   (database_path, history_capacity,
                             suggestion_limit, log_level)
    ERRAND_LOG=debug        Override the log filter
"#,
        env!("CARGO_PKG_VERSION")
    );
}
