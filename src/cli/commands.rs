use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "join", about = concat!("[=] join v", env!("CARGO_PKG_VERSION"), " - your board is four lists"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new join workspace in the current directory
    Init(InitArgs),
    /// Print the board columns, optionally filtered by a search term
    Board(BoardArgs),
    /// Add a task
    Add(AddArgs),
    /// Show task details
    Show(ShowArgs),
    /// Move a task to another column
    Mv(MvArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Toggle a subtask's done flag
    Check(CheckArgs),
    /// Assign a contact to a task
    Assign(AssignArgs),
    /// Remove a contact from a task
    Unassign(AssignArgs),
    /// Search tasks by title or description
    Search(SearchArgs),
    /// Show board statistics and the next deadline
    Summary,
    /// Manage contacts
    Contact(ContactCmd),
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Sign in
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show failed-write log entries
    Log,
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Workspace name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if join/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Board / task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BoardArgs {
    /// Filter tasks by a case-insensitive search term
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Task description
    #[arg(long, default_value = "")]
    pub description: String,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Priority: urgent, medium, or low
    #[arg(long)]
    pub priority: Option<String>,
    /// Category: story or technical
    #[arg(long)]
    pub category: String,
    /// Column to create the task in (default: todo)
    #[arg(long)]
    pub column: Option<String>,
    /// Assign a contact by ID (repeatable)
    #[arg(long = "assign", action = clap::ArgAction::Append)]
    pub assign: Vec<String>,
    /// Add a subtask (repeatable)
    #[arg(long = "subtask", action = clap::ArgAction::Append)]
    pub subtasks: Vec<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Target column: todo, in-progress, feedback, or done
    pub column: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Task ID
    pub id: String,
    /// Subtask number (1-based, as printed by `show`)
    pub subtask: usize,
}

#[derive(Args)]
pub struct AssignArgs {
    /// Task ID
    pub task: String,
    /// Contact ID
    pub contact: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search term (case-insensitive substring of title or description)
    pub term: String,
}

// ---------------------------------------------------------------------------
// Contact args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ContactCmd {
    #[command(subcommand)]
    pub command: ContactCommands,
}

#[derive(Subcommand)]
pub enum ContactCommands {
    /// Add a contact
    Add(ContactAddArgs),
    /// List contacts alphabetically
    List(ContactListArgs),
    /// Show contact details
    Show(ContactShowArgs),
    /// Edit a contact
    Edit(ContactEditArgs),
    /// Delete a contact
    Rm(ContactRmArgs),
}

#[derive(Args)]
pub struct ContactAddArgs {
    /// Full name
    pub name: String,
    /// Email address
    #[arg(long)]
    pub mail: String,
    /// Phone number
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Args)]
pub struct ContactListArgs {
    /// Only contacts offered for assignment (excludes the signed-in user)
    #[arg(long)]
    pub assignable: bool,
}

#[derive(Args)]
pub struct ContactShowArgs {
    /// Contact ID
    pub id: String,
}

#[derive(Args)]
pub struct ContactEditArgs {
    /// Contact ID
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub mail: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Args)]
pub struct ContactRmArgs {
    /// Contact ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Auth args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SignupArgs {
    /// Display name
    pub name: String,
    /// Email address
    pub mail: String,
    /// Password
    #[arg(long)]
    pub password: String,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Email address
    pub mail: String,
    /// Password
    #[arg(long)]
    pub password: String,
}
