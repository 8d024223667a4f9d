use crate::model::task::Task;

/// Which tasks the list screen shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Incomplete,
    Completed,
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Incomplete => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Tasks",
            Filter::Incomplete => "Incomplete only",
            Filter::Completed => "Completed only",
        }
    }
}

/// Ordering of the list screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Insertion order
    #[default]
    None,
    DueDate,
    Priority,
    Title,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "None",
            SortKey::DueDate => "Due Date",
            SortKey::Priority => "Priority",
            SortKey::Title => "Title",
        }
    }
}

/// Transient filter/sort state of one visit to the list screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: Filter,
    pub sort: SortKey,
}

/// Filter and sort `tasks` into a new ordering. The source slice is not
/// touched; all sorts are stable so ties keep insertion order.
pub fn project<'a>(tasks: &'a [Task], view: &ViewState) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = tasks.iter().filter(|t| view.filter.matches(t)).collect();

    match view.sort {
        SortKey::None => {}
        // Undated tasks go last
        SortKey::DueDate => rows.sort_by_key(|t| (t.due_date.is_none(), t.due_date)),
        SortKey::Priority => rows.sort_by_key(|t| t.priority.rank()),
        SortKey::Title => rows.sort_by_cached_key(|t| t.title.to_lowercase()),
    }

    rows
}

/// Map a 1-based row number of a projected view back to the task id.
///
/// Rows are resolved to ids rather than positions because the projection
/// reorders and filters the underlying list.
pub fn resolve_selection(rows: &[&Task], row: usize) -> Option<u32> {
    row.checked_sub(1)
        .and_then(|i| rows.get(i))
        .map(|task| task.id)
}
