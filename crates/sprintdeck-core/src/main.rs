use std::sync::Arc;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

use sprintdeck_core::{HydratedProject, SprintAdvance, Tracker};
use sprintdeck_model::UserId;
use sprintdeck_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("sprintdeck")
        .version(sprintdeck_core::VERSION)
        .about("Sprint-scoped project tracking over a keyed document store")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("demo")
                .about("Seed a project and walk the full sprint lifecycle in memory")
                .arg(
                    Arg::new("tasks")
                        .long("tasks")
                        .default_value("3")
                        .value_parser(value_parser!(usize))
                        .help("Number of tasks to seed in sprint 1"),
                )
                .arg(
                    Arg::new("subtasks")
                        .long("subtasks")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Number of subtasks under each task"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print hydrated views as JSON"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("demo", args)) => {
            let tasks = *args.get_one::<usize>("tasks").unwrap();
            let subtasks = *args.get_one::<usize>("subtasks").unwrap();
            let json = args.get_flag("json");
            run_demo(tasks, subtasks, json).await
        }
        _ => unreachable!("arg_required_else_help"),
    }
}

async fn run_demo(tasks: usize, subtasks: usize, json: bool) -> anyhow::Result<()> {
    let tracker = Tracker::new(Arc::new(MemoryStore::new()));
    let owner = UserId::new("demo-user");

    let project = tracker
        .create_project(&owner, "Demo project", "seeded by the demo subcommand")
        .await
        .context("creating the demo project")?;
    println!("Created project {project} for {owner}");

    let mut first_task = None;
    let mut first_subtask = None;
    for t in 1..=tasks {
        let task = tracker
            .create_task(&project, &format!("Task {t}"), "demo task")
            .await
            .with_context(|| format!("creating task {t}"))?;
        for s in 1..=subtasks {
            let subtask = tracker
                .create_subtask(&task, &format!("Subtask {t}.{s}"), "demo subtask")
                .await
                .with_context(|| format!("creating subtask {t}.{s}"))?;
            if first_subtask.is_none() {
                first_subtask = Some((task.clone(), subtask));
            }
        }
        first_task.get_or_insert(task);
    }

    println!("\n== Freshly seeded ==");
    render(&tracker.hydrate(&project).await?, json)?;

    if let Some((task, subtask)) = &first_subtask {
        tracker.complete_subtask(task, subtask).await?;
        println!("\nCompleted subtask {subtask}");
    }
    if let Some(task) = &first_task {
        tracker.complete_task(task).await?;
        println!("Completed task {task}");
    }

    println!("\n== After completions ==");
    render(&tracker.hydrate(&project).await?, json)?;

    println!("\n== Sprint lifecycle ==");
    loop {
        match tracker.advance_sprint(&project).await? {
            SprintAdvance::Advanced(level) => {
                let view = tracker.hydrate(&project).await?;
                println!("Advanced to sprint {level}: {} visible tasks", view.tasks.len());
            }
            SprintAdvance::Reported => {
                println!("Final sprint reached; project moves to reporting");
                break;
            }
        }
    }

    println!("\n== Owner's project listing ==");
    for listing in tracker.user_projects(&owner).await? {
        println!("  {} - {}", listing.id, listing.project.name);
    }

    Ok(())
}

fn render(view: &HydratedProject, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!(
        "Project '{}' (sprint {}, {} tasks visible)",
        view.name,
        view.sprint_level,
        view.tasks.len()
    );
    // Reference maps carry no order; sort for stable output.
    let mut tasks: Vec<_> = view.tasks.iter().collect();
    tasks.sort_by(|a, b| a.title.cmp(&b.title));
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        println!("  [{mark}] {} ({})", task.title, task.id);
        let mut subtasks: Vec<_> = task.subtasks.iter().collect();
        subtasks.sort_by(|a, b| a.title.cmp(&b.title));
        for subtask in subtasks {
            let mark = if subtask.completed { "x" } else { " " };
            println!("      [{mark}] {}", subtask.title);
        }
    }
    Ok(())
}
