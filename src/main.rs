use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ideabox::{
    Database, MediaStore, NoteDraft, NoteId, NoteInput, NoteKind, NoteQuery, NoteService,
    Priority, SortKey, Viewer, auth,
    media::IMAGE_BUCKET,
    models::{Note, NoteStatus},
    tags,
};

/// ideabox - quick idea capture for notes, links, and images
#[derive(Parser)]
#[command(name = "ideabox")]
#[command(about = "A quick idea capture tool for notes, links, and images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add a new note
    Add(AddCommand),
    /// List notes
    List(ListCommand),
    /// Edit an existing note
    Edit(EditCommand),
    /// Move a note to the archive
    Archive(IdCommand),
    /// Restore an archived note
    Restore(IdCommand),
    /// Permanently delete an archived note
    Delete(DeleteCommand),
    /// Show all tags in use
    Tags,
    /// Show all groups in use
    Groups,
    /// Store an image and create a note pointing at it
    Attach(AttachCommand),
    /// Create an account and sign in
    Signup(CredentialsCommand),
    /// Sign in to an existing account
    Signin(CredentialsCommand),
    /// Sign out of the current session
    Signout,
    /// Show the signed-in account
    Whoami,
    /// Launch the interactive terminal interface
    Tui,
}

/// Add a new note
#[derive(Parser)]
struct AddCommand {
    /// The note title
    #[arg(value_name = "TITLE")]
    title: String,

    /// The note content: text, or a URL for link and image notes.
    /// Audio notes take no content
    #[arg(value_name = "CONTENT")]
    content: Option<String>,

    /// Note kind: text, link, image, or audio
    #[arg(short, long, default_value = "text")]
    kind: NoteKind,

    /// Comma-separated tags to apply to the note
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    /// Group label for the note
    #[arg(short, long)]
    group: Option<String>,

    /// Priority: low, medium, or high
    #[arg(short, long, default_value = "medium")]
    priority: Priority,

    /// Hide the note from public listings
    #[arg(long)]
    hidden: bool,
}

/// List notes
#[derive(Parser)]
struct ListCommand {
    /// List the archive instead of active notes
    #[arg(long)]
    archived: bool,

    /// Only notes carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Only notes with this group label
    #[arg(short, long)]
    group: Option<String>,

    /// Sort order: created_at_desc, created_at_asc, priority_desc,
    /// priority_asc, title_asc, or title_desc
    #[arg(short, long, default_value = "created_at_desc")]
    sort: SortKey,
}

/// Edit an existing note; omitted fields keep their current value
#[derive(Parser)]
struct EditCommand {
    /// The note id
    #[arg(value_name = "ID")]
    id: i64,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New content
    #[arg(long)]
    content: Option<String>,

    /// New kind: text, link, image, or audio
    #[arg(long)]
    kind: Option<NoteKind>,

    /// Replacement comma-separated tags
    #[arg(long)]
    tags: Option<String>,

    /// New group label; pass an empty string to clear the group
    #[arg(long)]
    group: Option<String>,

    /// New priority
    #[arg(long)]
    priority: Option<Priority>,

    /// New hidden flag
    #[arg(long)]
    hidden: Option<bool>,
}

/// Commands that only take a note id
#[derive(Parser)]
struct IdCommand {
    /// The note id
    #[arg(value_name = "ID")]
    id: i64,
}

/// Permanently delete a note
#[derive(Parser)]
struct DeleteCommand {
    /// The note id
    #[arg(value_name = "ID")]
    id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Archive an active note first instead of refusing
    #[arg(long)]
    force: bool,
}

/// Store an image file
#[derive(Parser)]
struct AttachCommand {
    /// Title for the created image note
    #[arg(value_name = "TITLE")]
    title: String,

    /// Path to the image file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Comma-separated tags to apply to the note
    #[arg(short, long)]
    tags: Option<String>,

    /// Group label for the note
    #[arg(short, long)]
    group: Option<String>,
}

/// Email and password credentials
#[derive(Parser)]
struct CredentialsCommand {
    /// Account email address
    #[arg(value_name = "EMAIL")]
    email: String,

    /// Account password
    #[arg(value_name = "PASSWORD")]
    password: String,
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Add(cmd) => handle_add(cmd),
        Commands::List(cmd) => handle_list(cmd),
        Commands::Edit(cmd) => handle_edit(cmd),
        Commands::Archive(cmd) => handle_archive(cmd),
        Commands::Restore(cmd) => handle_restore(cmd),
        Commands::Delete(cmd) => handle_delete(cmd),
        Commands::Tags => handle_tags(),
        Commands::Groups => handle_groups(),
        Commands::Attach(cmd) => handle_attach(cmd),
        Commands::Signup(cmd) => handle_signup(cmd),
        Commands::Signin(cmd) => handle_signin(cmd),
        Commands::Signout => handle_signout(),
        Commands::Whoami => handle_whoami(),
        Commands::Tui => ideabox::tui::run(),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Logs go to stderr so listing output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors (bad input, missing sign-in, unknown note) exit with
/// code 1; store and I/O failures exit with code 2.
fn is_user_error(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<ideabox::Error>() {
        Some(e) => e.is_user_error(),
        None => false,
    }
}

/// Opens the on-disk database and resolves the session viewer.
fn open_database() -> Result<Database> {
    let db_path = ideabox::utils::get_database_path().context("Failed to get database path")?;
    ideabox::utils::ensure_parent_directory(&db_path)
        .context("Failed to ensure database directory")?;
    Database::open(&db_path).context("Failed to open database")
}

fn handle_add(cmd: &AddCommand) -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let draft = build_draft(
        cmd.title.clone(),
        cmd.kind,
        cmd.content.clone(),
        cmd.tags.clone().unwrap_or_default(),
        cmd.group.clone().unwrap_or_default(),
        cmd.priority,
        cmd.hidden,
    );
    let input = draft.validate()?;

    execute_add(&NoteService::new(db), viewer, input)
}

/// Assembles a form draft from CLI arguments, routing the content into
/// the field matching the kind so the form validation rules apply to
/// notes added from the command line too.
fn build_draft(
    title: String,
    kind: NoteKind,
    content: Option<String>,
    tags: String,
    group: String,
    priority: Priority,
    hidden: bool,
) -> NoteDraft {
    let mut draft = NoteDraft {
        title,
        kind,
        tags,
        group,
        priority,
        hidden,
        ..NoteDraft::default()
    };
    let content = content.unwrap_or_default();
    match kind {
        NoteKind::Text => draft.text = content,
        NoteKind::Link => draft.link_url = content,
        NoteKind::Image => {
            if !content.trim().is_empty() {
                draft.image_url = Some(content);
            }
        }
        NoteKind::Audio => {}
    }
    draft
}

fn execute_add(service: &NoteService, viewer: Viewer, input: NoteInput) -> Result<()> {
    let note = service.create_note(input, viewer)?;

    print!("Note created (id: {})", note.id);
    if !note.tags.is_empty() {
        print!(" with tags: {}", note.tags.join(", "));
    }
    println!();
    Ok(())
}

fn handle_list(cmd: &ListCommand) -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);

    let mut query = if cmd.archived {
        let owner = viewer.require("view your archive")?;
        NoteQuery::archived(owner)
    } else {
        NoteQuery::active(viewer)
    };
    query = query.with_sort(cmd.sort);
    if let Some(tag) = &cmd.tag {
        query = query.with_tag(tag.clone());
    }
    if let Some(group) = &cmd.group {
        query = query.with_group(group.clone());
    }

    let notes = service.list_notes(&query)?;
    if notes.is_empty() {
        println!("No notes found.");
        return Ok(());
    }
    for note in &notes {
        println!("{}", summary_line(note));
    }
    Ok(())
}

/// One listing line per note: id, title, metadata, tags.
fn summary_line(note: &Note) -> String {
    let mut line = format!("[{}] {} ({})", note.id, note.title, note.priority);
    if let Some(group) = &note.group {
        line.push_str(&format!(" @{group}"));
    }
    if !note.tags.is_empty() {
        line.push_str(&format!(" #{}", note.tags.join(" #")));
    }
    if note.hidden {
        line.push_str(" [hidden]");
    }
    line
}

fn handle_edit(cmd: &EditCommand) -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);
    let id = NoteId::new(cmd.id);

    let current = service
        .get_note(id)?
        .ok_or(ideabox::Error::NoteNotFound(id))?;
    let input = edited_input(&current, cmd)?;

    let note = service.update_note(id, input, viewer)?;
    println!("Note {} updated", note.id);
    Ok(())
}

/// Merges edit flags over the current note and revalidates the result.
///
/// Omitted flags keep their current value; a changed kind carries the
/// content over to the new kind's field, so `--kind` usually travels
/// with `--content`.
fn edited_input(current: &Note, cmd: &EditCommand) -> Result<NoteInput> {
    let kind = cmd.kind.unwrap_or(current.kind);
    let content = cmd.content.clone().unwrap_or_else(|| current.content.clone());
    let draft = build_draft(
        cmd.title.clone().unwrap_or_else(|| current.title.clone()),
        kind,
        Some(content),
        cmd.tags.clone().unwrap_or_else(|| current.tags.join(", ")),
        cmd.group
            .clone()
            .unwrap_or_else(|| current.group.clone().unwrap_or_default()),
        cmd.priority.unwrap_or(current.priority),
        cmd.hidden.unwrap_or(current.hidden),
    );
    Ok(draft.validate()?)
}

fn handle_archive(cmd: &IdCommand) -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);

    service.archive_note(NoteId::new(cmd.id), viewer)?;
    println!("Note {} archived", cmd.id);
    Ok(())
}

fn handle_restore(cmd: &IdCommand) -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);

    service.restore_note(NoteId::new(cmd.id), viewer)?;
    println!("Note {} restored", cmd.id);
    Ok(())
}

fn handle_delete(cmd: &DeleteCommand) -> Result<()> {
    if !cmd.yes && !confirm("Are you sure you want to delete this note?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);

    execute_delete(&service, viewer, NoteId::new(cmd.id), cmd.force)?;
    println!("Note {} deleted", cmd.id);
    Ok(())
}

/// Deletes a note, enforcing the archive-first rule.
///
/// An active note is refused unless `force` is set, in which case it
/// is archived and then deleted in one go.
fn execute_delete(service: &NoteService, viewer: Viewer, id: NoteId, force: bool) -> Result<()> {
    let note = service
        .get_note(id)?
        .ok_or(ideabox::Error::NoteNotFound(id))?;

    if note.status == NoteStatus::Active {
        if !force {
            return Err(ideabox::Error::Validation(
                "Note is still active; archive it first or pass --force".into(),
            )
            .into());
        }
        service.archive_note(id, viewer)?;
    }

    if !service.delete_note(id, viewer)? {
        return Err(ideabox::Error::NoteNotFound(id).into());
    }
    Ok(())
}

/// Asks a yes/no question on stdout, defaulting to no.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn handle_tags() -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);

    let tags = service.tag_cloud(viewer)?;
    if tags.is_empty() {
        println!("No tags in use.");
    }
    for tag in tags {
        println!("{tag}");
    }
    Ok(())
}

fn handle_groups() -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;
    let service = NoteService::new(db);

    let groups = service.groups(viewer)?;
    if groups.is_empty() {
        println!("No groups in use.");
    }
    for group in groups {
        println!("{group}");
    }
    Ok(())
}

fn handle_attach(cmd: &AttachCommand) -> Result<()> {
    let db = open_database()?;
    let viewer = auth::viewer(&db)?;

    let media_root = ideabox::utils::get_media_root().context("Failed to get media root")?;
    let store = MediaStore::new(media_root);

    let bytes = std::fs::read(&cmd.file)
        .with_context(|| format!("Failed to read file: {}", cmd.file.display()))?;
    let file_name = cmd
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let stored = store.upload(IMAGE_BUCKET, &file_name, &bytes, |pct| {
        print!("\rUploading... {pct}%");
        let _ = std::io::stdout().flush();
    })?;
    println!();

    let input = NoteInput {
        title: cmd.title.clone(),
        content: store.public_url(IMAGE_BUCKET, &stored.key),
        kind: NoteKind::Image,
        tags: cmd.tags.as_deref().map(tags::normalize_tags).unwrap_or_default(),
        group: cmd.group.as_deref().and_then(tags::normalize_group),
        priority: Priority::default(),
        hidden: false,
    };

    let service = NoteService::new(db);
    let note = service.create_note(input, viewer)?;
    println!("Image note created (id: {})", note.id);
    Ok(())
}

fn handle_signup(cmd: &CredentialsCommand) -> Result<()> {
    let db = open_database()?;
    let user = auth::sign_up(&db, &cmd.email, &cmd.password)?;
    println!("Account created; signed in as {}", user.email);
    Ok(())
}

fn handle_signin(cmd: &CredentialsCommand) -> Result<()> {
    let db = open_database()?;
    let user = auth::sign_in(&db, &cmd.email, &cmd.password)?;
    println!("Signed in as {}", user.email);
    Ok(())
}

fn handle_signout() -> Result<()> {
    let db = open_database()?;
    auth::sign_out(&db)?;
    println!("Signed out");
    Ok(())
}

fn handle_whoami() -> Result<()> {
    let db = open_database()?;
    match auth::current_user(&db)? {
        Some(user) => println!("{}", user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}
