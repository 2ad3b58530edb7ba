use crate::config::OutputFormat;
use crate::error::Result;
use registry::{Task, TaskRegistry};

const RULE: &str = "---------------------------------------------------------";

fn write_header(out: &mut String, title: &str) {
    out.push_str(&format!("\n{}:\n", title));
    out.push_str("ID\tPriority\tWait ID\t\tState\n");
    out.push_str(RULE);
    out.push('\n');
}

fn format_row(task: &Task) -> String {
    format!(
        "{}\t{}\t\t{}\t\t{}\n",
        task.id,
        task.priority,
        task.wait_key.unwrap_or(-1),
        task.state
    )
}

fn write_section<'a>(out: &mut String, title: &str, tasks: impl Iterator<Item = &'a Task>) {
    write_header(out, title);
    for task in tasks {
        out.push_str(&format_row(task));
    }
    out.push('\n');
}

/// Ready in priority order, Waiting in arrival order, then the running task
/// if there is one.
pub fn render_table(registry: &TaskRegistry) -> String {
    let mut out = String::new();
    write_section(&mut out, "Ready Queue", registry.ready().iter());
    write_section(&mut out, "Wait Queue", registry.waiting().iter());
    if let Some(task) = registry.running() {
        write_section(&mut out, "Running Task", std::iter::once(task));
    }
    out
}

pub fn render_json(registry: &TaskRegistry) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&registry.snapshot())?;
    json.push('\n');
    Ok(json)
}

pub fn render(registry: &TaskRegistry, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(registry)),
        OutputFormat::Json => render_json(registry),
    }
}
