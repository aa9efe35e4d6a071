use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use blog_client::api::{BlogDraft, BlogQuery, BlogStatus, Credentials, ImageUpload};
use blog_client::config::{ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_SESSION_FILE, DEFAULT_TIMEOUT_SECS};
use blog_client::session::FileTokenStore;
use blog_client::{ApiClient, ApiError, GuardDecision, NoticeLevel, Role, SessionContext, UiEvent, UiEvents, check_access};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to read {}: {source}", path.display())]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("not logged in; run `blog-cli login` first")]
    NotLoggedIn,
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "blog-cli", about = "Blog API client with a persisted login session")]
struct Cli {
    #[arg(long, env = "BLOG_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "BLOG_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    session_file: PathBuf,

    #[arg(long, env = "BLOG_API_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        #[arg(long, env = "BLOG_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the locally stored session without contacting the server.
    Whoami,
    /// Fetch the profile from the server and refresh the stored copy.
    Profile,
    Blog(BlogCommand),
    Category(TaxonomyCommand),
    Tag(TaxonomyCommand),
    Comment(CommentCommand),
    Subscribe {
        email: String,
    },
    Unsubscribe {
        email: String,
    },
    /// Run the route guard for a view path against the stored session.
    CanAccess {
        path: String,
        #[arg(long)]
        role: Option<Role>,
    },
}

#[derive(Args, Debug)]
struct BlogCommand {
    #[command(subcommand)]
    command: BlogSubcommand,
}

#[derive(Subcommand, Debug)]
enum BlogSubcommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        status: Option<BlogStatus>,
        #[arg(long, help = "Only posts written by the logged-in user")]
        mine: bool,
    },
    Get {
        key: String,
    },
    Create(BlogCreateArgs),
    Delete {
        key: String,
    },
    Publish {
        slug: String,
        #[arg(long, help = "Move the post back to draft instead")]
        unpublish: bool,
    },
}

#[derive(Args, Debug)]
struct BlogCreateArgs {
    #[arg(long)]
    title: String,

    #[arg(long, help = "Post body; read from --content-file when omitted")]
    content: Option<String>,

    #[arg(long, conflicts_with = "content")]
    content_file: Option<PathBuf>,

    #[arg(long)]
    category_id: Option<u64>,

    #[arg(long = "tag-id")]
    tag_ids: Vec<u64>,

    #[arg(long, default_value = "draft")]
    status: BlogStatus,

    #[arg(long, help = "Featured image; switches the request to multipart")]
    image: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TaxonomyCommand {
    #[command(subcommand)]
    command: TaxonomySubcommand,
}

#[derive(Subcommand, Debug)]
enum TaxonomySubcommand {
    List,
}

#[derive(Args, Debug)]
struct CommentCommand {
    #[command(subcommand)]
    command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentSubcommand {
    List { blog_id: u64 },
    Create { blog_id: u64, content: String },
    Approve { id: u64 },
    Pending,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.base_url)?
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_session_file(cli.session_file);

    let store = Arc::new(FileTokenStore::new(config.session_file.clone()));
    let session = SessionContext::bootstrap(store);
    let (events, rx) = UiEvents::channel();
    let printer = tokio::spawn(print_events(rx));

    let client = ApiClient::new(config, session, events)?;
    let result = run(&client, cli.command).await;

    // Last sender gone: the printer drains what is queued and exits.
    drop(client);
    let _ = printer.await;
    result
}

async fn run(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = client.login(&Credentials { email, password }).await?;
            print_json(&user)
        }
        Command::Logout => {
            client.logout().await;
            print_json(&json!({ "authenticated": false }))
        }
        Command::Whoami => {
            let state = client.session().snapshot();
            let Some(user) = state.user.filter(|_| state.token.is_some()) else {
                return Err(CliError::NotLoggedIn);
            };
            print_json(&user)
        }
        Command::Profile => print_json(&client.profile().await?),
        Command::Blog(blog) => run_blog(client, blog).await,
        Command::Category(taxonomy) => match taxonomy.command {
            TaxonomySubcommand::List => print_json(&client.list_categories().await?),
        },
        Command::Tag(taxonomy) => match taxonomy.command {
            TaxonomySubcommand::List => print_json(&client.list_tags().await?),
        },
        Command::Comment(comment) => run_comment(client, comment).await,
        Command::Subscribe { email } => print_json(&client.subscribe(&email).await?.message),
        Command::Unsubscribe { email } => print_json(&client.unsubscribe(&email).await?.message),
        Command::CanAccess { path, role } => {
            let decision = check_access(&client.session().snapshot(), role, &path);
            let rendered = match decision {
                GuardDecision::Allow => json!({ "allowed": true }),
                GuardDecision::Redirect(target) => json!({ "allowed": false, "redirect": target.path() }),
            };
            print_json(&rendered)
        }
    }
}

async fn run_blog(client: &ApiClient, blog: BlogCommand) -> Result<(), CliError> {
    match blog.command {
        BlogSubcommand::List { page, search, category, tag, status, mine } => {
            let query = BlogQuery { page, search, category, tag, status, ordering: None };
            let listing = if mine { client.my_blogs(&query).await? } else { client.list_blogs(&query).await? };
            print_json(listing.items())
        }
        BlogSubcommand::Get { key } => print_json(&client.get_blog(&key).await?),
        BlogSubcommand::Create(args) => {
            let draft = blog_draft(args)?;
            print_json(&client.create_blog(&draft).await?)
        }
        BlogSubcommand::Delete { key } => {
            client.delete_blog(&key).await?;
            print_json(&json!({ "deleted": key }))
        }
        BlogSubcommand::Publish { slug, unpublish } => {
            let status = if unpublish { BlogStatus::Draft } else { BlogStatus::Published };
            print_json(&client.publish_blog(&slug, status).await?)
        }
    }
}

async fn run_comment(client: &ApiClient, comment: CommentCommand) -> Result<(), CliError> {
    match comment.command {
        CommentSubcommand::List { blog_id } => print_json(&client.list_comments(blog_id).await?),
        CommentSubcommand::Create { blog_id, content } => {
            print_json(&client.create_comment(blog_id, &content).await?)
        }
        CommentSubcommand::Approve { id } => print_json(&client.approve_comment(id).await?),
        CommentSubcommand::Pending => print_json(&client.pending_comments().await?),
    }
}

fn blog_draft(args: BlogCreateArgs) -> Result<BlogDraft, CliError> {
    let content = match (args.content, args.content_file) {
        (Some(content), _) => content,
        (None, Some(path)) => {
            std::fs::read_to_string(&path).map_err(|source| CliError::ReadFile { path, source })?
        }
        (None, None) => String::new(),
    };

    let featured_image = match args.image {
        Some(path) => {
            let bytes = std::fs::read(&path).map_err(|source| CliError::ReadFile { path: path.clone(), source })?;
            let file_name = path.file_name().map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
            Some(ImageUpload::from_bytes(file_name, bytes))
        }
        None => None,
    };

    let mut draft = BlogDraft::new(args.title, content);
    draft.category_id = args.category_id;
    draft.tag_ids = args.tag_ids;
    draft.status = args.status;
    draft.featured_image = featured_image;
    Ok(draft)
}

async fn print_events(mut rx: UnboundedReceiver<UiEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            UiEvent::Notice(notice) => {
                let label = match notice.level {
                    NoticeLevel::Error => "error",
                    NoticeLevel::Success => "ok",
                    NoticeLevel::Info => "info",
                };
                eprintln!("[{label}] {}", notice.message);
            }
            UiEvent::Redirect(target) => eprintln!("-> {}", target.path()),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
