use crate::model::task::Task;
use crate::ops::view::ViewState;
use crate::util::unicode::{clip_to_width, pad_to_width};

const RULE_WIDTH: usize = 50;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Screen title framed by heavy rules, preceded by a blank line
fn banner(title: &str) -> String {
    format!("\n{}\n{}\n{}", heavy_rule(), title, heavy_rule())
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

pub fn main_menu() -> String {
    [
        banner(" WELCOME TO TASK MANAGER "),
        "The simplest way to organize your tasks.".to_string(),
        String::new(),
        "MAIN MENU:".to_string(),
        "(V)iew My Tasks".to_string(),
        "(A)dd a New Task".to_string(),
        "(Q)uit".to_string(),
        String::new(),
        "Tip: Start by adding a task with 'A'.".to_string(),
        light_rule(),
    ]
    .join("\n")
}

pub fn add_task_intro() -> String {
    [
        banner("ADD A NEW TASK"),
        "Creating a task helps you remember and track".to_string(),
        "your progress. All you need is a title!".to_string(),
        light_rule(),
    ]
    .join("\n")
}

fn list_header() -> String {
    [
        banner("MY TASKS"),
        "SORT: (D)ue Date  (P)riority  (T)itle".to_string(),
        "FILTER: (N)o Filter  (I)ncomplete  (C)ompleted".to_string(),
        light_rule(),
    ]
    .join("\n")
}

/// The list screen when the store holds no tasks at all
pub fn empty_task_list() -> String {
    [
        list_header(),
        "No tasks found. Add some tasks to get started!".to_string(),
        light_rule(),
        "ACTIONS: (A)dd Task  (B)ack to Main Menu".to_string(),
    ]
    .join("\n")
}

/// The list screen for a projected view. Rows are numbered from 1 in
/// projection order.
pub fn task_list(rows: &[&Task], view: &ViewState, title_width: usize) -> String {
    let mut lines = vec![list_header(), table_header(title_width), light_rule()];
    for (i, task) in rows.iter().enumerate() {
        lines.push(task_row(i + 1, task, title_width));
    }
    lines.push(light_rule());
    lines.push(format!(
        "Showing {} task(s)  [filter: {}, sort: {}]",
        rows.len(),
        view.filter.label(),
        view.sort.label()
    ));
    lines.push(format!(
        "ACTIONS: (A)dd Task  (1-{})Toggle Complete  (E)dit  (B)ack",
        rows.len()
    ));
    lines.join("\n")
}

pub fn table_header(title_width: usize) -> String {
    format!(
        "{:<3} {:<6} {} {:<12} {}",
        "#",
        "Status",
        pad_to_width("Task", title_width),
        "Due Date",
        "Priority"
    )
}

/// One table row. The title is clipped for display only.
pub fn task_row(number: usize, task: &Task, title_width: usize) -> String {
    let status = if task.completed { "[✓]" } else { "[ ]" };
    let due = match task.due_date_text() {
        d if d.is_empty() => "No date".to_string(),
        d => d,
    };
    format!(
        "{:<3} {:<6} {} {:<12} {}",
        number,
        status,
        pad_to_width(clip_to_width(&task.title, title_width), title_width),
        due,
        task.priority
    )
}

pub fn edit_screen(task: &Task) -> String {
    let due = match task.due_date_text() {
        d if d.is_empty() => "Not set".to_string(),
        d => d,
    };
    [
        banner("EDIT A TASK"),
        format!("You are editing: '{}'", task.title),
        "Changes are saved immediately.".to_string(),
        light_rule(),
        format!("1. Title: {}", task.title),
        format!("2. Due Date: {}", due),
        format!("3. Priority: {}", task.priority),
        format!(
            "4. Completed: {}",
            if task.completed { "Yes" } else { "No" }
        ),
        light_rule(),
        "(R)evert All Changes  (B)ack to Task List".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use crate::ops::view::{Filter, SortKey};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn long_task() -> Task {
        Task {
            id: 7,
            title: "Prepare quarterly budget review".into(),
            due_date: NaiveDate::from_ymd_opt(2025, 9, 30),
            priority: Priority::High,
            completed: true,
        }
    }

    #[test]
    fn test_row_clips_title_only_for_display() {
        let task = long_task();
        let row = task_row(1, &task, 18);
        assert_eq!(row, "1   [✓]    Prepare quarterly  2025-09-30   High");
        assert_eq!(task.title, "Prepare quarterly budget review");
    }

    #[test]
    fn test_row_without_date() {
        let task = Task::new(2, "Buy milk".into());
        let row = task_row(12, &task, 10);
        assert_eq!(row, "12  [ ]    Buy milk   No date      Medium");
    }

    #[test]
    fn test_header_lines_up_with_rows() {
        let mut task = long_task();
        task.completed = false;
        let header = table_header(18);
        let row = task_row(1, &task, 18);
        assert_eq!(header.find("Due Date"), row.find("2025-09-30"));
    }

    #[test]
    fn test_task_list_footer() {
        let tasks = [long_task(), Task::new(8, "Walk dog".into())];
        let rows: Vec<&Task> = tasks.iter().collect();
        let view = ViewState {
            filter: Filter::Completed,
            sort: SortKey::Title,
        };
        let screen = task_list(&rows, &view, 18);
        assert!(screen.contains("Showing 2 task(s)  [filter: Completed only, sort: Title]"));
        assert!(screen.contains("(1-2)Toggle Complete"));
    }

    #[test]
    fn test_edit_screen_fields() {
        let screen = edit_screen(&Task::new(3, "Call mom".into()));
        assert!(screen.contains("1. Title: Call mom"));
        assert!(screen.contains("2. Due Date: Not set"));
        assert!(screen.contains("3. Priority: Medium"));
        assert!(screen.contains("4. Completed: No"));
    }

    #[test]
    fn test_banner_starts_with_blank_line() {
        assert!(main_menu().starts_with("\n====="));
    }
}
