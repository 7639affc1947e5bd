use std::io::{self, BufRead, Write};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tracing::error;
use crate::calculator::{calculate, has_drift, recompute};
use crate::error::{Result, TransportError};
use crate::manager::TaskManager;
use crate::models::{Task, TaskInput};
use crate::store::TaskStore;

/// Field values given on the command line. `None` keeps the draft's value.
#[derive(Debug, Default, Clone)]
pub struct TaskArgs {
    pub employee: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub hours: Option<f64>,
    pub rate: Option<f64>,
    pub charges: Option<f64>,
}

impl TaskArgs {
    /// Overwrites the fields of `input` that were given.
    pub fn apply(self, input: &mut TaskInput) {
        if let Some(e) = self.employee { input.employee_name = e; }
        if let Some(d) = self.description { input.task_description = d; }
        if let Some(d) = self.date { input.date = d; }
        if let Some(h) = self.hours { input.hours_spent = h; }
        if let Some(r) = self.rate { input.hourly_rate = r; }
        if let Some(c) = self.charges { input.additional_charges = c; }
    }
}

/// Creates a task from a fresh draft dated today, overridden by `args`.
pub async fn cmd_add<S: TaskStore>(manager: &mut TaskManager<S>, args: TaskArgs, silent: bool) -> Result<Task> {
    let mut draft = TaskInput::draft();
    args.apply(&mut draft);
    let task = manager.create(&draft).await?;
    if !silent {
        println!("Task added (id = {}, total = {:.2})", task.id, task.total_remuneration);
    }
    warn_if_stale(manager, silent);
    Ok(task)
}

/// Replaces a task with its current values overridden by `args`.
///
/// The snapshot is refreshed first so the edit starts from what the store
/// holds now.
pub async fn cmd_edit<S: TaskStore>(manager: &mut TaskManager<S>, id: u64, args: TaskArgs, silent: bool) -> Result<Task> {
    manager.refresh().await?;
    let mut draft = match manager.get(id) {
        Some(t) => TaskInput::from_task(t),
        None => return Err(TransportError::NotFound { id }.into()),
    };
    args.apply(&mut draft);
    let task = manager.update(id, &draft).await?;
    if !silent {
        println!("Task {} updated (total = {:.2})", id, task.total_remuneration);
    }
    warn_if_stale(manager, silent);
    Ok(task)
}

/// Removes a task, asking for confirmation on stdin unless `force` is set.
///
/// Returns `false` when the user declined.
pub async fn cmd_remove<S: TaskStore>(manager: &mut TaskManager<S>, id: u64, force: bool, silent: bool) -> Result<bool> {
    let confirmed = force || confirm(&format!("Delete task {}? This cannot be undone. [y/N] ", id), &mut io::stdin().lock())?;
    remove_if_confirmed(manager, id, confirmed, silent).await
}

/// Second half of [`cmd_remove`], once the user has answered.
pub async fn remove_if_confirmed<S: TaskStore>(manager: &mut TaskManager<S>, id: u64, confirmed: bool, silent: bool) -> Result<bool> {
    if !confirmed {
        if !silent { println!("Aborted."); }
        return Ok(false);
    }
    manager.delete(id).await?;
    if !silent { println!("Task {} removed.", id); }
    warn_if_stale(manager, silent);
    Ok(true)
}

/// Lists tasks in a formatted table.
pub async fn cmd_list<S: TaskStore>(manager: &mut TaskManager<S>) -> Result<()> {
    let tasks = manager.list().await?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    println!("{}", tasks_table(tasks));
    Ok(())
}

/// Prints the remuneration for the given amounts without touching the store.
pub fn cmd_calc(hours: f64, rate: f64, charges: f64) -> Result<f64> {
    let draft = TaskInput {
        employee_name: "-".into(),
        task_description: "-".into(),
        hours_spent: hours,
        hourly_rate: rate,
        additional_charges: charges,
        ..TaskInput::draft()
    };
    crate::validation::validate(&draft)?;
    let total = calculate(hours, rate, charges);
    println!("{:.2}", total);
    Ok(total)
}

/// Builds the task table, with the total of every row in the footer.
///
/// Totals are recomputed from each row's fields; rows whose stored total
/// disagrees are highlighted.
pub fn tasks_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Employee Name").add_attribute(Attribute::Bold),
            Cell::new("Task Description").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Hours").add_attribute(Attribute::Bold),
            Cell::new("Rate").add_attribute(Attribute::Bold),
            Cell::new("Charges").add_attribute(Attribute::Bold),
            Cell::new("Total").add_attribute(Attribute::Bold),
        ]);

    let mut grand_total = 0.0;
    for t in tasks {
        let total = recompute(t);
        grand_total += total;
        let total_color = if has_drift(t) { Color::Red } else { Color::Green };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.employee_name),
            Cell::new(&t.task_description),
            Cell::new(&t.date),
            Cell::new(format!("{:.2}", t.hours_spent)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", t.hourly_rate)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", t.additional_charges)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", total)).fg(total_color).set_alignment(CellAlignment::Right),
        ]);
    }

    table.add_row(vec![
        Cell::new(""),
        Cell::new(format!("{} tasks", tasks.len())).add_attribute(Attribute::Italic),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.2}", (grand_total * 100.0_f64).round() / 100.0))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Logs a failed command and reports it on stderr.
pub fn report_error(err: &crate::error::Error) {
    error!("{}", err);
    match err {
        crate::error::Error::Validation(v) => eprintln!("Invalid input: {} {}", v.field.label(), v.message),
        other => eprintln!("Error: {}", other),
    }
}

/// The change was saved; only the reload after it failed.
fn warn_if_stale<S: TaskStore>(manager: &TaskManager<S>, silent: bool) {
    if manager.is_stale() && !silent {
        eprintln!("Warning: the change was saved but the task list could not be reloaded.");
    }
}

/// Prints `prompt` and reads a y/N answer from `reader`.
pub fn confirm<R: BufRead>(prompt: &str, reader: &mut R) -> io::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
