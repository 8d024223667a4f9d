use std::io;
use std::path::PathBuf;

use crate::cli::commands::Cli;
use crate::cli::output;
use crate::io::config_io::{self, DEFAULT_CONFIG_FILE};
use crate::io::store::{LoadOutcome, TaskStore};
use crate::ops::task_ops::{self, FieldChange, FieldEdit, TaskError};
use crate::ops::view::{self, ViewState};

use super::console::{Console, LineConsole};
use super::input::{self, EditCommand, EditTarget, ListCommand, MenuCommand};

/// Which screen the menu loop is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    /// The list screen with its filter/sort for this visit
    TaskList(ViewState),
    /// Editing one task; `view` is restored on the way back to the list
    EditTask { id: u32, view: ViewState },
    Exit,
}

/// Outcome of a prompt-driven step: `None` means input was closed
type Step<T> = io::Result<Option<T>>;

/// The interactive menu loop over a task store
pub struct App<C> {
    store: TaskStore,
    console: C,
    title_width: usize,
}

impl<C: Console> App<C> {
    pub fn new(store: TaskStore, console: C, title_width: usize) -> Self {
        App {
            store,
            console,
            title_width,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Load the store, then drive screens until the user quits or input
    /// closes.
    pub fn run(&mut self) -> io::Result<()> {
        self.load()?;

        let mut screen = Screen::MainMenu;
        while screen != Screen::Exit {
            screen = self.step(screen)?;
        }
        Ok(())
    }

    /// Show one screen, handle one command, and return the next screen
    pub fn step(&mut self, screen: Screen) -> io::Result<Screen> {
        match screen {
            Screen::MainMenu => self.main_menu(),
            Screen::TaskList(view) => self.task_list(view),
            Screen::EditTask { id, view } => self.edit_task(id, view),
            Screen::Exit => Ok(Screen::Exit),
        }
    }

    // -----------------------------------------------------------------------
    // Screens
    // -----------------------------------------------------------------------

    fn main_menu(&mut self) -> io::Result<Screen> {
        self.say(&output::main_menu())?;
        let Some(choice) = self.ask("\nEnter your choice: ")? else {
            return Ok(Screen::Exit);
        };

        match input::parse_menu(&choice) {
            Some(MenuCommand::View) => Ok(Screen::TaskList(ViewState::default())),
            Some(MenuCommand::Add) => Ok(self
                .add_task()?
                .map_or(Screen::Exit, |_| Screen::MainMenu)),
            Some(MenuCommand::Quit) => {
                self.say("Thank you for using Task Manager!")?;
                self.say("Your tasks have been saved automatically.")?;
                Ok(Screen::Exit)
            }
            None => {
                self.say("Invalid choice. Please try V, A, or Q.")?;
                Ok(Screen::MainMenu)
            }
        }
    }

    fn task_list(&mut self, view: ViewState) -> io::Result<Screen> {
        if self.store.is_empty() {
            return self.empty_task_list(view);
        }

        let screen = {
            let rows = view::project(self.store.tasks(), &view);
            output::task_list(&rows, &view, self.title_width)
        };
        self.say(&screen)?;

        let Some(choice) = self.ask("\nEnter a command, task number: ")? else {
            return Ok(Screen::Exit);
        };

        match input::parse_list(&choice) {
            Some(ListCommand::Add) => Ok(self
                .add_task()?
                .map_or(Screen::Exit, |_| Screen::TaskList(view))),
            Some(ListCommand::Back) => Ok(Screen::MainMenu),
            Some(ListCommand::Edit) => self.choose_task_to_edit(view),
            Some(ListCommand::Sort(sort)) => {
                self.say(&format!("Now sorting by: {}", sort.label()))?;
                Ok(Screen::TaskList(ViewState { sort, ..view }))
            }
            Some(ListCommand::Filter(filter)) => {
                self.say(&format!("Now showing: {}", filter.label()))?;
                Ok(Screen::TaskList(ViewState { filter, ..view }))
            }
            Some(ListCommand::Select(row)) => match self.resolve_row(&view, row) {
                Some(id) => Ok(self
                    .toggle_task(id)?
                    .map_or(Screen::Exit, |_| Screen::TaskList(view))),
                None => {
                    self.say("Invalid task number.")?;
                    Ok(Screen::TaskList(view))
                }
            },
            None => {
                self.say("Invalid choice. Please try again.")?;
                Ok(Screen::TaskList(view))
            }
        }
    }

    fn empty_task_list(&mut self, view: ViewState) -> io::Result<Screen> {
        self.say(&output::empty_task_list())?;
        let Some(choice) = self.ask("\nEnter your choice: ")? else {
            return Ok(Screen::Exit);
        };

        match input::parse_list(&choice) {
            Some(ListCommand::Add) => Ok(self
                .add_task()?
                .map_or(Screen::Exit, |_| Screen::TaskList(view))),
            Some(ListCommand::Back) => Ok(Screen::MainMenu),
            _ => {
                self.say("Invalid choice. Please try again.")?;
                Ok(Screen::TaskList(view))
            }
        }
    }

    /// Ask for a row number of the list as currently displayed and open the
    /// edit screen for that task.
    fn choose_task_to_edit(&mut self, view: ViewState) -> io::Result<Screen> {
        if view::project(self.store.tasks(), &view).is_empty() {
            self.say("No tasks to edit.")?;
            return Ok(Screen::TaskList(view));
        }

        self.say("\nEnter the task number to edit:")?;
        let Some(answer) = self.ask("Task number: ")? else {
            return Ok(Screen::Exit);
        };
        let Some(row) = input::parse_row_number(&answer) else {
            self.say("Please enter a valid number.")?;
            return Ok(Screen::TaskList(view));
        };

        match self.resolve_row(&view, row) {
            Some(id) => Ok(Screen::EditTask { id, view }),
            None => {
                self.say("Invalid task number.")?;
                Ok(Screen::TaskList(view))
            }
        }
    }

    fn edit_task(&mut self, id: u32, view: ViewState) -> io::Result<Screen> {
        let Some(task) = self.store.find(id) else {
            return Ok(Screen::TaskList(view));
        };
        let screen = output::edit_screen(task);
        let completed = task.completed;
        self.say(&screen)?;

        let Some(choice) = self.ask("\nEnter the number to change, or a command: ")? else {
            return Ok(Screen::Exit);
        };

        let edit = match input::parse_edit(&choice) {
            Some(EditCommand::Back) => return Ok(Screen::TaskList(view)),
            Some(EditCommand::Revert) => {
                self.revert()?;
                return Ok(Screen::TaskList(view));
            }
            Some(EditCommand::Field(EditTarget::Title)) => {
                let Some(text) = self.ask("Enter new title: ")? else {
                    return Ok(Screen::Exit);
                };
                FieldEdit::Title(text)
            }
            Some(EditCommand::Field(EditTarget::DueDate)) => {
                let Some(text) =
                    self.ask("Enter new due date (YYYY-MM-DD) or empty to remove: ")?
                else {
                    return Ok(Screen::Exit);
                };
                FieldEdit::DueDate(text)
            }
            Some(EditCommand::Field(EditTarget::Priority)) => {
                let Some(text) = self.ask("Enter new priority (1-High, 2-Medium, 3-Low): ")?
                else {
                    return Ok(Screen::Exit);
                };
                FieldEdit::Priority(text)
            }
            Some(EditCommand::Field(EditTarget::Completed)) => FieldEdit::Completed(!completed),
            None => {
                self.say("Invalid choice.")?;
                return Ok(Screen::EditTask { id, view });
            }
        };

        self.apply_edit(id, edit)?;
        Ok(Screen::EditTask { id, view })
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Prompt for a new task and add it. Returns `None` if input closed
    /// part way through.
    fn add_task(&mut self) -> Step<()> {
        self.say(&output::add_task_intro())?;

        let title = loop {
            let Some(title) = self.ask("\nEnter Task Title: ")? else {
                return Ok(None);
            };
            if !title.trim().is_empty() {
                break title;
            }
            self.say("Title is required. Please enter a task title.")?;
        };
        let Some(due_date) = self.ask("Due Date (YYYY-MM-DD) [Optional - press Enter to skip]: ")?
        else {
            return Ok(None);
        };
        let Some(priority) = self.ask("Priority (1-High, 2-Medium, 3-Low) [2]: ")? else {
            return Ok(None);
        };

        let outcome =
            match task_ops::create_task(self.store.tasks_mut(), &title, &due_date, &priority) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.say(&format!("Could not add task: {}", e))?;
                    return Ok(Some(()));
                }
            };
        if outcome.dropped_due_date.is_some() {
            self.say("Invalid date format. Using no due date.")?;
        }
        tracing::info!(id = outcome.id, "task created");

        if self.persist()? {
            self.say(&format!(
                "\nTask '{}' has been added successfully!",
                title.trim()
            ))?;
            return self.pause();
        }
        self.say("Failed to save task.")?;
        Ok(Some(()))
    }

    fn toggle_task(&mut self, id: u32) -> Step<()> {
        let Some(task) = self.store.find_mut(id) else {
            self.say("Invalid task number.")?;
            return Ok(Some(()));
        };
        task_ops::toggle_complete(task);
        let message = format!("\nMarked '{}' as {}!", task.title, task.status_word());

        if self.persist()? {
            self.say(&message)?;
            self.say("You can toggle this again to change back.")?;
            return self.pause();
        }
        self.say("Failed to save changes.")?;
        Ok(Some(()))
    }

    fn apply_edit(&mut self, id: u32, edit: FieldEdit) -> io::Result<()> {
        let Some(task) = self.store.find_mut(id) else {
            return Ok(());
        };

        let message = match task_ops::edit_field(task, edit) {
            Ok(FieldChange::Title) => "Title updated.".to_string(),
            Ok(FieldChange::DueDateSet) => "Due date updated.".to_string(),
            Ok(FieldChange::DueDateRemoved) => "Due date removed.".to_string(),
            Ok(FieldChange::Priority) => "Priority updated.".to_string(),
            Ok(FieldChange::Completed(done)) => format!(
                "Marked as {}.",
                if done { "completed" } else { "incomplete" }
            ),
            Err(TaskError::EmptyTitle) => return self.say("Title cannot be empty."),
            Err(TaskError::InvalidDate(_)) => return self.say("Invalid date format."),
            Err(TaskError::InvalidPriority(_)) => return self.say("Invalid priority."),
            Err(e @ TaskError::IdsExhausted) => return self.say(&e.to_string()),
        };

        self.say(&message)?;
        self.persist()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Store plumbing
    // -----------------------------------------------------------------------

    /// Two-step lookup: project the list as displayed, then map the row
    /// number to the task id.
    fn resolve_row(&self, view: &ViewState, row: usize) -> Option<u32> {
        let rows = view::project(self.store.tasks(), view);
        view::resolve_selection(&rows, row)
    }

    fn load(&mut self) -> io::Result<()> {
        match self.store.load() {
            Ok(LoadOutcome::Loaded(_)) => self.say("Your tasks have been loaded successfully."),
            Ok(LoadOutcome::Missing) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "starting with an empty task list");
                self.say(&format!("Could not load tasks: {}. Starting with empty list.", e))
            }
        }
    }

    fn revert(&mut self) -> io::Result<()> {
        match self.store.revert() {
            Ok(_) => self.say("All changes reverted."),
            Err(e) => self.say(&format!(
                "Could not reload tasks: {}. Starting with empty list.",
                e
            )),
        }
    }

    /// Save the store; reports failures and returns whether the save worked.
    fn persist(&mut self) -> io::Result<bool> {
        match self.store.save() {
            Ok(()) => Ok(true),
            Err(e) => {
                self.say(&format!("Error saving tasks: {}", e))?;
                Ok(false)
            }
        }
    }

    fn pause(&mut self) -> Step<()> {
        Ok(self.ask("Press Enter to continue...")?.map(|_| ()))
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        self.console.write_line(text)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.console.prompt(prompt)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Resolve config and data file from the command line, then run the menu
/// loop on stdin/stdout.
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(format!("config file not found: {}", path.display()).into());
        }
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    let config = config_io::read_config(&config_path)?;

    let data_file = cli
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.file));
    tracing::debug!(data_file = %data_file.display(), "starting session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = LineConsole::new(stdin.lock(), stdout.lock());
    let mut app = App::new(TaskStore::new(data_file), console, config.display.title_width);
    app.run()?;
    Ok(())
}
