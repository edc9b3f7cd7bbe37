mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Local, NaiveDate};

use crate::auth::Authenticator;
use crate::board::projection::{filter_tasks, no_results, project};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::event_log;
use crate::io::lock::FileLock;
use crate::io::workspace::{self, Workspace, WorkspaceError};
use crate::model::contact::Contact;
use crate::model::task::{Category, Priority, Status, Task};
use crate::ops::contact_ops::ContactDirectory;
use crate::ops::summary::{summarize, upcoming_deadline};
use crate::ops::task_ops::{add_subtask, prepare_for_save, set_status, toggle_subtask};
use crate::ops::validate;
use crate::store::{DocumentStore, JsonStore, StoreError};

/// Global override for workspace directory (set by -C flag)
static WORKSPACE_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for workspace_cwd()
    if let Some(ref dir) = cli.workspace_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        WORKSPACE_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        None => {
            eprintln!("nothing to do (try `join --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, override_dir()),

            // Read commands
            Commands::Board(args) => cmd_board(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Search(args) => cmd_search(args, json),
            Commands::Summary => cmd_summary(json),
            Commands::Whoami => cmd_whoami(json),
            Commands::Log => cmd_log(),

            // Write commands
            Commands::Add(args) => cmd_add(args),
            Commands::Mv(args) => cmd_mv(args),
            Commands::Rm(args) => cmd_rm(args),
            Commands::Check(args) => cmd_check(args),
            Commands::Assign(args) => cmd_assign(args, true),
            Commands::Unassign(args) => cmd_assign(args, false),

            // Contacts
            Commands::Contact(cmd) => match cmd.command {
                ContactCommands::Add(args) => cmd_contact_add(args),
                ContactCommands::List(args) => cmd_contact_list(args, json),
                ContactCommands::Show(args) => cmd_contact_show(args, json),
                ContactCommands::Edit(args) => cmd_contact_edit(args),
                ContactCommands::Rm(args) => cmd_contact_rm(args),
            },

            // Auth
            Commands::Signup(args) => cmd_signup(args),
            Commands::Login(args) => cmd_login(args),
            Commands::Logout => cmd_logout(),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn override_dir() -> Option<PathBuf> {
    WORKSPACE_DIR_OVERRIDE.lock().unwrap().clone()
}

fn workspace_cwd() -> Result<Workspace, WorkspaceError> {
    let start = match override_dir() {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(WorkspaceError::IoError)?,
    };
    let root = workspace::discover_workspace(&start)?;
    workspace::load_workspace(&root)
}

fn open_store(ws: &Workspace) -> Result<JsonStore, StoreError> {
    JsonStore::open(&ws.data_dir)
}

fn find_task(store: &JsonStore, id: &str) -> Result<Task, Box<dyn std::error::Error>> {
    let tasks: Vec<Task> = store.snapshot()?;
    tasks
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| format!("no task with id {id}").into())
}

fn find_contact(store: &JsonStore, id: &str) -> Result<Contact, Box<dyn std::error::Error>> {
    let contacts: Vec<Contact> = store.snapshot()?;
    contacts
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| format!("no contact with id {id}").into())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse_flexible(s)
        .ok_or_else(|| format!("unknown column '{s}' (todo, in-progress, feedback, done)"))
}

/// Run a store write; on failure, record it in the event log before
/// propagating.
fn logged_write<T>(
    ws: &Workspace,
    operation: &str,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    if let Err(err) = &result {
        event_log::log_write_failure(&ws.data_dir, operation, &err.to_string());
    }
    result
}

// ---------------------------------------------------------------------------
// Board / task commands
// ---------------------------------------------------------------------------

fn cmd_board(args: BoardArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let tasks: Vec<Task> = store.snapshot()?;
    let search = args.search.unwrap_or_default();
    let columns = project(&tasks, &search);
    let empty_search = no_results(&tasks, &search);

    if json {
        let board = BoardJson {
            todo: columns.todo.iter().map(TaskJson::from_task).collect(),
            in_progress: columns.in_progress.iter().map(TaskJson::from_task).collect(),
            await_feedback: columns
                .await_feedback
                .iter()
                .map(TaskJson::from_task)
                .collect(),
            done: columns.done.iter().map(TaskJson::from_task).collect(),
            no_results: empty_search,
        };
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    if empty_search {
        println!("No tasks match '{}'.", search.trim());
        return Ok(());
    }
    for status in crate::model::task::ALL_STATUSES {
        let column = columns.column(status);
        println!("{} ({})", status.heading(), column.len());
        for task in column {
            println!("  {}", task_line(task));
        }
    }
    Ok(())
}

fn cmd_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;

    let mut draft = Task::new(args.title);
    draft.description = args.description;
    draft.category = Category::parse_flexible(&args.category)
        .ok_or_else(|| format!("unknown category '{}' (story, technical)", args.category))?;
    if let Some(due) = &args.due {
        draft.date = Some(NaiveDate::parse_from_str(due, "%Y-%m-%d")?);
    }
    if let Some(priority) = &args.priority {
        draft.priority = Some(
            Priority::parse_flexible(priority)
                .ok_or_else(|| format!("unknown priority '{priority}' (urgent, medium, low)"))?,
        );
    }
    if let Some(column) = &args.column {
        draft.status = parse_status(column)?;
    }

    let contacts: Vec<Contact> = store.snapshot()?;
    for contact_id in &args.assign {
        if !contacts.iter().any(|c| &c.id == contact_id) {
            return Err(format!("no contact with id {contact_id}").into());
        }
        draft.assign(contact_id);
    }
    for subtask in &args.subtasks {
        add_subtask(&mut draft, subtask);
    }

    let task = prepare_for_save(draft, today())?;
    let status = task.status;
    let id = logged_write(&ws, "add task", store.add(task))?;
    println!("Created task [{id}] in {status}");
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let task = find_task(&store, &args.id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&TaskJson::from_task(&task))?
        );
        return Ok(());
    }

    println!("{}", task_line(&task));
    println!("  column:   {}", task.status);
    println!("  category: {}", task.category.as_str());
    if !task.description.is_empty() {
        println!("  note:     {}", task.description);
    }
    if !task.assigned_to.is_empty() {
        let contacts: Vec<Contact> = store.snapshot()?;
        let names: Vec<String> = task
            .assigned_to
            .iter()
            .filter_map(|id| contacts.iter().find(|c| &c.id == id))
            .map(|c| c.name.clone())
            .collect();
        println!("  assigned: {}", names.join(", "));
    }
    for (i, sub) in task.subtasks.iter().enumerate() {
        let mark = if sub.done { 'x' } else { ' ' };
        println!("  {}. [{}] {}", i + 1, mark, sub.title);
    }
    Ok(())
}

fn cmd_mv(args: MvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let task = find_task(&store, &args.id)?;
    let status = parse_status(&args.column)?;

    // Dropping a task into the column it is in must not write.
    match set_status(&task, status) {
        None => println!("Task [{}] is already in {status}", task.id),
        Some(updated) => {
            logged_write(&ws, "update task", store.update(&updated))?;
            println!("Moved task [{}] to {status}", updated.id);
        }
    }
    Ok(())
}

fn cmd_rm(args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let task = find_task(&store, &args.id)?;
    logged_write(&ws, "delete task", store.delete::<Task>(&task.id))?;
    println!("Deleted task [{}] {}", task.id, task.title);
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let mut task = find_task(&store, &args.id)?;

    let index = args
        .subtask
        .checked_sub(1)
        .ok_or("subtask numbers start at 1")?;
    let done = toggle_subtask(&mut task, index)
        .ok_or_else(|| format!("task [{}] has no subtask {}", task.id, args.subtask))?;
    logged_write(&ws, "update task", store.update(&task))?;
    let state = if done { "done" } else { "open" };
    println!(
        "Subtask {} of [{}] is now {state} ({}/{})",
        args.subtask,
        task.id,
        task.done_subtasks(),
        task.subtasks.len()
    );
    Ok(())
}

fn cmd_assign(args: AssignArgs, assign: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let mut task = find_task(&store, &args.task)?;

    if assign {
        let contact = find_contact(&store, &args.contact)?;
        task.assign(&contact.id);
        logged_write(&ws, "update task", store.update(&task))?;
        println!("Assigned {} to task [{}]", contact.name, task.id);
    } else {
        if !task.unassign(&args.contact) {
            return Err(format!(
                "contact {} is not assigned to task [{}]",
                args.contact, task.id
            )
            .into());
        }
        logged_write(&ws, "update task", store.update(&task))?;
        println!("Removed contact {} from task [{}]", args.contact, task.id);
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let tasks: Vec<Task> = store.snapshot()?;
    let matches = filter_tasks(&tasks, &args.term);

    if json {
        let out: Vec<TaskJson> = matches.iter().map(|t| TaskJson::from_task(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if no_results(&tasks, &args.term) {
        println!("No tasks match '{}'.", args.term.trim());
        return Ok(());
    }
    for task in matches {
        println!("{:<16} {}", task.status.to_string(), task_line(task));
    }
    Ok(())
}

fn cmd_summary(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let tasks: Vec<Task> = store.snapshot()?;
    let stats = summarize(&tasks);
    let deadline = upcoming_deadline(&tasks, today());

    if json {
        let out = SummaryJson::from_stats(&stats, deadline.as_ref().map(|d| d.date.to_string()));
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("To do:          {}", stats.todo);
    println!("In progress:    {}", stats.in_progress);
    println!("Await feedback: {}", stats.await_feedback);
    println!("Done:           {}", stats.done);
    println!("Urgent:         {}", stats.urgent);
    println!("Tasks on board: {}", stats.open());
    match deadline {
        Some(deadline) => {
            let titles: Vec<&str> = deadline.tasks.iter().map(|t| t.title.as_str()).collect();
            let priority = deadline
                .priority
                .map(|p| format!(" ({})", p.as_str()))
                .unwrap_or_default();
            println!(
                "Upcoming deadline: {}{priority}: {}",
                deadline.date,
                titles.join(", ")
            );
        }
        None => println!("No upcoming Deadline"),
    }
    Ok(())
}

fn cmd_log() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let entries = event_log::read_entries(&ws.data_dir);
    if entries.is_empty() {
        println!("No failed writes recorded.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  {}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.operation,
            entry.detail
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Contact commands
// ---------------------------------------------------------------------------

fn validated_contact_fields(
    name: Option<&str>,
    mail: Option<&str>,
    phone: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(name) = name
        && !validate::is_valid_name(name)
    {
        return Err(format!("not a valid name: '{name}'").into());
    }
    if let Some(mail) = mail
        && !validate::is_valid_email(mail)
    {
        return Err(format!("not a valid email address: '{mail}'").into());
    }
    if let Some(phone) = phone
        && !phone.is_empty()
        && !validate::is_valid_phone(phone)
    {
        return Err(format!("not a valid phone number: '{phone}'").into());
    }
    Ok(())
}

fn cmd_contact_add(args: ContactAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;

    validated_contact_fields(Some(&args.name), Some(&args.mail), Some(&args.phone))?;

    let mut directory = ContactDirectory::new();
    directory.set_snapshot(store.snapshot()?);
    let contact = directory.with_avatar_color(Contact::new(args.name, args.mail, args.phone));

    let id = logged_write(&ws, "add contact", store.add(contact))?;
    println!("Created contact [{id}]");
    Ok(())
}

fn cmd_contact_list(args: ContactListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let mut directory = ContactDirectory::new();
    directory.set_snapshot(store.snapshot()?);

    let contacts = if args.assignable {
        let auth = Authenticator::load(&ws.data_dir);
        let mail = auth.current_user().map(|u| u.mail.clone());
        directory.assignable(mail.as_deref())
    } else {
        directory.sorted()
    };

    if json {
        let out: Vec<ContactJson> = contacts.into_iter().map(ContactJson::from_contact).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for contact in contacts {
        println!("{}", contact_line(contact));
    }
    Ok(())
}

fn cmd_contact_show(args: ContactShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let contact = find_contact(&store, &args.id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ContactJson::from_contact(&contact))?
        );
        return Ok(());
    }

    println!("{}", contact_line(&contact));
    if !contact.bg_color.is_empty() {
        println!("  avatar: {}", contact.bg_color);
    }

    // Tasks this contact is assigned to.
    let tasks: Vec<Task> = store.snapshot()?;
    for task in tasks.iter().filter(|t| t.assigned_to.contains(&contact.id)) {
        println!("  task: {}", task_line(task));
    }
    Ok(())
}

fn cmd_contact_edit(args: ContactEditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let mut contact = find_contact(&store, &args.id)?;

    validated_contact_fields(args.name.as_deref(), args.mail.as_deref(), args.phone.as_deref())?;
    if let Some(name) = args.name {
        contact.name = name;
    }
    if let Some(mail) = args.mail {
        contact.mail = mail;
    }
    if let Some(phone) = args.phone {
        contact.phone = phone;
    }

    logged_write(&ws, "update contact", store.update(&contact))?;
    println!("Updated contact [{}]", contact.id);
    Ok(())
}

fn cmd_contact_rm(args: ContactRmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let contact = find_contact(&store, &args.id)?;
    logged_write(&ws, "delete contact", store.delete::<Contact>(&contact.id))?;
    // Assignments keep the dangling id; the board simply stops resolving it.
    println!("Deleted contact [{}] {}", contact.id, contact.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Auth commands
// ---------------------------------------------------------------------------

fn cmd_signup(args: SignupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let _lock = FileLock::acquire_default(&ws.data_dir)?;
    let mut store = open_store(&ws)?;
    let mut auth = Authenticator::load(&ws.data_dir);
    let user = auth.sign_up(&mut store, &args.name, &args.mail, &args.password)?;
    println!("Signed up and in as {} <{}>", user.name, user.mail);
    Ok(())
}

fn cmd_login(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let store = open_store(&ws)?;
    let mut auth = Authenticator::load(&ws.data_dir);
    let user = auth.sign_in(&store, &args.mail, &args.password)?;
    println!("Signed in as {} <{}>", user.name, user.mail);
    Ok(())
}

fn cmd_logout() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let mut auth = Authenticator::load(&ws.data_dir);
    auth.sign_out();
    println!("Signed out");
    Ok(())
}

fn cmd_whoami(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace_cwd()?;
    let auth = Authenticator::load(&ws.data_dir);
    match auth.current_user() {
        Some(user) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "id": user.id,
                        "name": user.name,
                        "mail": user.mail,
                    })
                );
            } else {
                println!("{} <{}>", user.name, user.mail);
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}
