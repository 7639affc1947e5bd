use crossterm::event::KeyCode;
use ratatui::widgets::TableState;
use tracing::debug;
use crate::calculator::calculate;
use crate::error::{Error, Field, ValidationError};
use crate::manager::TaskManager;
use crate::models::{Task, TaskInput};
use crate::store::TaskStore;
use crate::validation::{parse_amount, violations};

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    ConfirmDelete,
}

/// State of the add/edit dialog.
///
/// Values are kept as typed so the user can fix a bad number in place.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// `None` when adding, the task being replaced when editing.
    pub target_id: Option<u64>,
    pub values: [String; 6],
    pub focus: usize,
    pub errors: Vec<ValidationError>,
}

impl TaskForm {
    /// Form for a new draft dated today.
    pub fn new_draft() -> Self {
        Self::from_input(None, &TaskInput::draft())
    }

    /// Form pre-filled with an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self::from_input(Some(task.id), &TaskInput::from_task(task))
    }

    fn from_input(target_id: Option<u64>, input: &TaskInput) -> Self {
        TaskForm {
            target_id,
            values: [
                input.employee_name.clone(),
                input.task_description.clone(),
                input.date.clone(),
                input.hours_spent.to_string(),
                input.hourly_rate.to_string(),
                input.additional_charges.to_string(),
            ],
            focus: 0,
            errors: Vec::new(),
        }
    }

    pub fn focused_field(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[Self::index(field)]
    }

    pub fn error_for(&self, field: Field) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = if self.focus == 0 { Field::ALL.len() - 1 } else { self.focus - 1 };
    }

    pub fn push(&mut self, c: char) {
        self.values[self.focus].push(c);
    }

    pub fn pop(&mut self) {
        self.values[self.focus].pop();
    }

    /// Converts the typed values into a draft, or every field error at once.
    pub fn to_input(&self) -> Result<TaskInput, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut amount = |field: Field| match parse_amount(field, self.value(field)) {
            Ok(v) => v,
            Err(e) => {
                errors.push(e);
                0.0
            }
        };
        let hours_spent = amount(Field::HoursSpent);
        let hourly_rate = amount(Field::HourlyRate);
        let additional_charges = amount(Field::AdditionalCharges);

        let input = TaskInput {
            employee_name: self.value(Field::EmployeeName).to_string(),
            task_description: self.value(Field::TaskDescription).to_string(),
            date: self.value(Field::Date).to_string(),
            hours_spent,
            hourly_rate,
            additional_charges,
        };

        let unparsed: Vec<Field> = errors.iter().map(|e| e.field).collect();
        errors.extend(violations(&input).into_iter().filter(|e| !unparsed.contains(&e.field)));
        if errors.is_empty() {
            Ok(input)
        } else {
            errors.sort_by_key(|e| Self::index(e.field));
            Err(errors)
        }
    }

    /// Total the current values would be saved with, if they are usable amounts.
    pub fn preview_total(&self) -> Option<f64> {
        let parse = |field: Field| {
            parse_amount(field, self.value(field))
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
        };
        Some(calculate(
            parse(Field::HoursSpent)?,
            parse(Field::HourlyRate)?,
            parse(Field::AdditionalCharges)?,
        ))
    }

    fn index(field: Field) -> usize {
        Field::ALL.iter().position(|f| *f == field).unwrap_or(0)
    }
}

/// Interactive state: the selection, the open dialog and the last message.
pub struct App<S: TaskStore> {
    pub manager: TaskManager<S>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub form: Option<TaskForm>,
    pub pending_delete: Option<u64>,
    pub notification: Option<String>,
}

impl<S: TaskStore> App<S> {
    /// Creates an App around a manager whose snapshot is already loaded.
    pub fn new(manager: TaskManager<S>) -> App<S> {
        let mut app = App {
            manager,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            form: None,
            pending_delete: None,
            notification: None,
        };
        app.fix_selection();
        app
    }

    pub fn tasks(&self) -> &[Task] {
        self.manager.tasks()
    }

    /// Dispatches one key press. Any key clears the last notification.
    ///
    /// Returns `true` when the user asked to quit.
    pub async fn handle_key(&mut self, code: KeyCode) -> bool {
        self.notification = None;

        match self.input_mode {
            InputMode::Normal => match code {
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Char('a') => self.start_add(),
                KeyCode::Char('e') | KeyCode::Enter => self.start_edit(),
                KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
                KeyCode::Char('r') => self.refresh().await,
                _ => {}
            },
            InputMode::Editing => match code {
                KeyCode::Enter => self.submit_form().await,
                KeyCode::Esc => self.cancel_form(),
                KeyCode::Tab | KeyCode::Down => {
                    if let Some(form) = self.form.as_mut() { form.next_field(); }
                }
                KeyCode::BackTab | KeyCode::Up => {
                    if let Some(form) = self.form.as_mut() { form.previous_field(); }
                }
                KeyCode::Char(c) => {
                    if let Some(form) = self.form.as_mut() { form.push(c); }
                }
                KeyCode::Backspace => {
                    if let Some(form) = self.form.as_mut() { form.pop(); }
                }
                _ => {}
            },
            InputMode::ConfirmDelete => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete().await,
                _ => self.cancel_delete(),
            },
        }
        false
    }

    /// The task under the cursor.
    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks().get(i))
    }

    /// Selects the next task.
    pub fn next(&mut self) {
        let len = self.tasks().len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task.
    pub fn previous(&mut self) {
        let len = self.tasks().len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Reloads the collection from the store.
    pub async fn refresh(&mut self) {
        match self.manager.refresh().await {
            Ok(()) => self.notification = Some(format!("Loaded {} tasks", self.tasks().len())),
            Err(e) => self.notify_error("Could not load tasks", &e),
        }
        self.fix_selection();
    }

    /// Opens the dialog with a fresh draft.
    pub fn start_add(&mut self) {
        self.form = Some(TaskForm::new_draft());
        self.input_mode = InputMode::Editing;
    }

    /// Opens the dialog for the selected task.
    pub fn start_edit(&mut self) {
        if let Some(form) = self.selected_task().map(TaskForm::from_task) {
            self.form = Some(form);
            self.input_mode = InputMode::Editing;
        }
    }

    /// Closes the dialog without saving.
    pub fn cancel_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Saves the dialog. On a validation error the dialog stays open with the
    /// errors shown next to their fields; on a transport error it stays open
    /// with a notification so the user can retry.
    pub async fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else { return; };
        let input = match form.to_input() {
            Ok(input) => input,
            Err(errors) => {
                debug!("Form has {} invalid fields", errors.len());
                form.errors = errors;
                return;
            }
        };
        form.errors.clear();
        let target_id = form.target_id;

        let result = match target_id {
            Some(id) => self.manager.update(id, &input).await,
            None => self.manager.create(&input).await,
        };
        match result {
            Ok(task) => {
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.notification = Some(format!("Saved task {} (total {:.2})", task.id, task.total_remuneration));
                self.select_id(task.id);
                self.note_if_stale();
            }
            Err(Error::Validation(e)) => {
                if let Some(form) = self.form.as_mut() {
                    form.errors = vec![e];
                }
            }
            Err(e) => self.notify_error("Could not save task", &e),
        }
    }

    /// Asks for confirmation before deleting the selected task.
    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.pending_delete = Some(id);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    /// Deletes the task awaiting confirmation.
    pub async fn confirm_delete(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.pending_delete.take() else { return; };
        match self.manager.delete(id).await {
            Ok(()) => {
                self.notification = Some(format!("Deleted task {}", id));
                self.note_if_stale();
            }
            Err(e) => self.notify_error("Could not delete task", &e),
        }
        self.fix_selection();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = InputMode::Normal;
    }

    fn note_if_stale(&mut self) {
        if self.manager.is_stale() {
            let saved = self.notification.take().unwrap_or_default();
            self.notification = Some(format!("{}, but the list could not be reloaded (r to retry)", saved));
        }
    }

    fn notify_error(&mut self, what: &str, err: &Error) {
        self.notification = Some(format!("{}: {}", what, err));
    }

    fn select_id(&mut self, id: u64) {
        let i = self.tasks().iter().position(|t| t.id == id);
        self.state.select(i);
        self.fix_selection();
    }

    /// Keeps the selection inside the collection after it changed size.
    fn fix_selection(&mut self) {
        let len = self.tasks().len();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }
}
