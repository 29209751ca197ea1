use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twig::areas::remote::Credentials;
use twig::areas::repository::Repository;
use twig::artifacts::diff::myers::EditKind;
use twig::artifacts::objects::object_type::ObjectType;
use twig::commands::plumbing::cat_file::CatFileMode;

#[derive(Parser)]
#[command(
    name = "twig",
    version,
    about = "A minimal content-addressable version-control storage engine",
    long_about = "twig stores snapshots of a flat working directory as hash-addressed objects \
    in a git-compatible .git directory, stages files in a binary index and chains flat trees \
    into commits on a branch."
)]
struct Cli {
    /// Repository root
    #[arg(long, global = true, env = "TWIG_REPO", default_value = ".")]
    repo: PathBuf,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Initialize a new repository")]
    Init {
        #[arg(help = "Directory to create the repository in (defaults to --repo)")]
        path: Option<PathBuf>,
    },
    #[command(about = "Stage files (directories are expanded)")]
    Add {
        #[arg(required = true, help = "Paths relative to the repository root")]
        paths: Vec<PathBuf>,
    },
    #[command(about = "Show changed, new and deleted files")]
    Status,
    #[command(about = "Show changes between the index and the working copy")]
    Diff,
    #[command(name = "write-tree", about = "Store the index as a tree object")]
    WriteTree,
    #[command(about = "Record the staged files as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "hash-object", about = "Compute an object ID, optionally storing the object")]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", value_parser = parse_object_type)]
        object_type: ObjectType,
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Print an object's type, size or contents")]
    CatFile {
        #[arg(short = 't', group = "mode", help = "Print the object type")]
        show_type: bool,
        #[arg(short = 's', group = "mode", help = "Print the payload size")]
        show_size: bool,
        #[arg(short = 'p', group = "mode", help = "Pretty-print the object")]
        pretty: bool,
        #[arg(
            required = true,
            num_args = 1..=2,
            value_names = ["TYPE", "OBJECT"],
            help = "Object digest or prefix, preceded by its expected type when no flag is given"
        )]
        args: Vec<String>,
    },
    #[command(name = "ls-files", about = "List staged files")]
    LsFiles {
        #[arg(short, long, help = "Show mode, digest and stage number")]
        stage: bool,
    },
    #[command(name = "remote-head", about = "Show the head commit a remote advertises")]
    RemoteHead {
        url: String,
        #[arg(short, long, env = "TWIG_USERNAME")]
        username: String,
        #[arg(short, long, env = "TWIG_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn parse_object_type(value: &str) -> Result<ObjectType> {
    ObjectType::try_from(value)
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("twig={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cat_file_request(
    show_type: bool,
    show_size: bool,
    pretty: bool,
    args: &[String],
) -> Result<(CatFileMode, String)> {
    let mode = match (show_type, show_size, pretty) {
        (true, _, _) => Some(CatFileMode::Type),
        (_, true, _) => Some(CatFileMode::Size),
        (_, _, true) => Some(CatFileMode::Pretty),
        _ => None,
    };

    match (mode, args) {
        (Some(mode), [object]) => Ok((mode, object.clone())),
        (None, [object_type, object]) => Ok((
            CatFileMode::Raw(ObjectType::try_from(object_type.as_str())?),
            object.clone(),
        )),
        (Some(_), _) => anyhow::bail!("expected a single object with -t, -s or -p"),
        (None, _) => anyhow::bail!("expected <TYPE> <OBJECT>, or one of -t, -s, -p"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !std::io::stdout().is_terminal() || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or(cli.repo);
            let repository = Repository::init(&path).await?;
            writeln!(
                stdout,
                "initialized empty repository: {}",
                repository.path().display()
            )?;
        }
        Commands::Add { paths } => {
            Repository::new(&cli.repo)?.add(&paths).await?;
        }
        Commands::Status => {
            let status = Repository::new(&cli.repo)?.status().await?;
            for (title, paths) in status.sections() {
                writeln!(stdout, "{title}")?;
                for path in paths {
                    let path = match title {
                        "new files:" => path.green(),
                        "deleted files:" => path.red(),
                        _ => path.yellow(),
                    };
                    writeln!(stdout, "    {path}")?;
                }
            }
        }
        Commands::Diff => {
            for (kind, line) in Repository::new(&cli.repo)?.diff_lines().await? {
                let line = match kind {
                    _ if line.starts_with("@@") => line.cyan(),
                    EditKind::Delete => line.red(),
                    EditKind::Insert => line.green(),
                    EditKind::Equal => line.normal(),
                };
                writeln!(stdout, "{line}")?;
            }
        }
        Commands::WriteTree => {
            let tree_oid = Repository::new(&cli.repo)?.write_tree().await?;
            writeln!(stdout, "{tree_oid}")?;
        }
        Commands::Commit { message } => {
            let repository = Repository::new(&cli.repo)?;
            let parent = repository.refs().read_head()?;
            let commit_oid = repository.commit(&message, None).await?;

            let root = if parent.is_none() { " (root-commit)" } else { "" };
            writeln!(
                stdout,
                "[{}{}] {}",
                repository.refs().current_branch()?,
                root,
                commit_oid.to_short_oid().yellow()
            )?;
        }
        Commands::HashObject {
            write,
            object_type,
            file,
        } => {
            let object_id = Repository::new(&cli.repo)?.hash_object(&file, object_type, write)?;
            writeln!(stdout, "{object_id}")?;
        }
        Commands::CatFile {
            show_type,
            show_size,
            pretty,
            args,
        } => {
            let (mode, object) = cat_file_request(show_type, show_size, pretty, &args)?;
            let content = Repository::new(&cli.repo)?.cat_file(&object, mode)?;
            stdout.write_all(&content)?;
        }
        Commands::LsFiles { stage } => {
            for line in Repository::new(&cli.repo)?.ls_files(stage).await? {
                writeln!(stdout, "{line}")?;
            }
        }
        Commands::RemoteHead {
            url,
            username,
            password,
        } => {
            let credentials = Credentials::new(username, password);
            match Repository::new(&cli.repo)?
                .remote_head(&url, &credentials)
                .await?
            {
                Some(head) => writeln!(stdout, "{head}")?,
                None => writeln!(stdout, "{}", "remote has no commits".dimmed())?,
            }
        }
    }

    Ok(())
}
