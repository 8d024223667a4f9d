use chrono::NaiveDate;

use crate::model::task::{DATE_FORMAT, Priority, Task};

/// Error type for task operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("invalid date '{0}': use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid priority '{0}': choose 1, 2 or 3")]
    InvalidPriority(String),
    #[error("no task ids left: the largest id is already {}", u32::MAX)]
    IdsExhausted,
}

/// Result of a successful create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub id: u32,
    /// Due date input that was not a valid date and was replaced by "no date"
    pub dropped_due_date: Option<String>,
}

/// A single-field edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    /// Empty text clears the date
    DueDate(String),
    /// Menu selector `1`, `2` or `3`
    Priority(String),
    Completed(bool),
}

/// What an applied edit changed, for the confirmation message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    Title,
    DueDateSet,
    DueDateRemoved,
    Priority,
    Completed(bool),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Parse due date input: empty means no date, anything else must be a real
/// calendar date in `YYYY-MM-DD` form.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| TaskError::InvalidDate(input.to_string()))
}

fn clean_title(input: &str) -> Result<String, TaskError> {
    let title = input.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Next id: one past the largest id in use. For lists built only through
/// `create_task` this is `len + 1`. `None` once the largest id is `u32::MAX`.
pub fn next_id(tasks: &[Task]) -> Option<u32> {
    tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Append a new task. An empty title is rejected; a malformed due date is
/// dropped and reported in the outcome; an unknown priority selector
/// (including empty input) means Medium.
pub fn create_task(
    tasks: &mut Vec<Task>,
    title: &str,
    due_date: &str,
    priority: &str,
) -> Result<CreateOutcome, TaskError> {
    let title = clean_title(title)?;

    let (due_date, dropped_due_date) = match parse_due_date(due_date) {
        Ok(date) => (date, None),
        Err(_) => (None, Some(due_date.trim().to_string())),
    };

    let id = next_id(tasks).ok_or(TaskError::IdsExhausted)?;
    let mut task = Task::new(id, title);
    task.due_date = due_date;
    task.priority = Priority::from_selector(priority).unwrap_or_default();
    tasks.push(task);

    Ok(CreateOutcome {
        id,
        dropped_due_date,
    })
}

// ---------------------------------------------------------------------------
// Toggle / edit
// ---------------------------------------------------------------------------

/// Flip the completed flag; returns the new value
pub fn toggle_complete(task: &mut Task) -> bool {
    task.completed = !task.completed;
    task.completed
}

/// Apply one field edit. On error the task is unchanged.
pub fn edit_field(task: &mut Task, edit: FieldEdit) -> Result<FieldChange, TaskError> {
    match edit {
        FieldEdit::Title(text) => {
            task.title = clean_title(&text)?;
            Ok(FieldChange::Title)
        }
        FieldEdit::DueDate(text) => match parse_due_date(&text)? {
            Some(date) => {
                task.due_date = Some(date);
                Ok(FieldChange::DueDateSet)
            }
            None => {
                task.due_date = None;
                Ok(FieldChange::DueDateRemoved)
            }
        },
        FieldEdit::Priority(selector) => {
            let priority = Priority::from_selector(&selector)
                .ok_or_else(|| TaskError::InvalidPriority(selector.trim().to_string()))?;
            task.priority = priority;
            Ok(FieldChange::Priority)
        }
        FieldEdit::Completed(done) => {
            task.completed = done;
            Ok(FieldChange::Completed(done))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
