// cli/todos.rs — `todod list/add/toggle/rm/status` CLI commands.
//
// The CLI is the client side of the system: it fetches the full list once,
// projects the filter locally, and mutates by re-sending whole records.

use anyhow::Result;
use clap::ValueEnum;

use super::client::ApiClient;
use crate::store::{Task, TaskDraft};

/// Client-side list projection. Never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    All,
    Active,
    Completed,
}

/// Apply the filter over a fetched list.
pub fn project(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| match filter {
            Filter::All => true,
            Filter::Active => !t.completed,
            Filter::Completed => t.completed,
        })
        .collect()
}

/// `todod list [--filter all|active|completed] [--json]`
pub async fn cmd_list(port: u16, filter: Filter, json: bool) -> Result<()> {
    let client = ApiClient::new(port)?;
    let tasks = client.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    let visible = project(&tasks, filter);
    if visible.is_empty() {
        match filter {
            Filter::All => println!("No tasks yet. Add one with `todod add <text>`."),
            Filter::Active => println!("All tasks are completed!"),
            Filter::Completed => println!("No completed tasks yet."),
        }
        return Ok(());
    }

    println!("{:<8} {:<4} {}", "ID", "", "Task");
    println!("{}", "-".repeat(40));
    for task in &visible {
        let mark = if task.completed { "✓" } else { " " };
        println!("{:<8} {:<4} {}", task.id, mark, task.text);
    }

    let pending = tasks.iter().filter(|t| !t.completed).count();
    let completed = tasks.len() - pending;
    println!("\n{pending} pending, {completed} completed");
    Ok(())
}

/// `todod add <text>`
pub async fn cmd_add(port: u16, text: String) -> Result<()> {
    let text = text.trim().to_string();
    if text.is_empty() {
        anyhow::bail!("task text cannot be empty");
    }
    let client = ApiClient::new(port)?;
    let task = client
        .create(&TaskDraft {
            id: None,
            text,
            completed: false,
        })
        .await?;
    println!("✓ Added task {}: {}", task.id, task.text);
    Ok(())
}

/// `todod toggle <id>` — flip `completed` by re-sending the whole record.
pub async fn cmd_toggle(port: u16, id: i64) -> Result<()> {
    let client = ApiClient::new(port)?;
    let tasks = client.list().await?;
    let task = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow::anyhow!("no task with id {id}"))?;

    let flipped = Task {
        completed: !task.completed,
        ..task.clone()
    };
    let updated = client.replace(id, &flipped).await?;
    let state = if updated.completed { "done" } else { "pending" };
    println!("✓ Task {} marked {}", updated.id, state);
    Ok(())
}

/// `todod rm <id>`
pub async fn cmd_remove(port: u16, id: i64) -> Result<()> {
    let client = ApiClient::new(port)?;
    let message = client.delete(id).await?;
    println!("✓ {message}");
    Ok(())
}

/// `todod status`
pub async fn cmd_status(port: u16) -> Result<()> {
    let client = ApiClient::new(port)?;
    let health = client.health().await?;
    println!("Status:  {}", health["status"].as_str().unwrap_or("unknown"));
    println!("Version: {}", health["version"].as_str().unwrap_or("unknown"));
    println!("Uptime:  {}s", health["uptime_secs"].as_u64().unwrap_or(0));
    println!("Tasks:   {}", health["tasks"].as_u64().unwrap_or(0));
    Ok(())
}
