use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ugit::checkout::CheckoutTarget;
use ugit::commit::CommitOutcome;
use ugit::hash::{hash_to_hex, short_hex};
use ugit::repository::Repository;
use ugit::{branch, checkout, commit, log, status};

#[derive(Parser)]
#[command(name = "ugit")]
#[command(about = "A minimal content-addressed version control system")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create `.ugit` and the default branch scaffold.
    Init {
        path: Option<PathBuf>,
    },
    /// Stage files.
    Add {
        paths: Vec<PathBuf>,
    },
    /// Create a commit from the staged index.
    Commit {
        #[arg(short = 'm', long)]
        message: String,

        #[arg(long)]
        author: Option<String>,
    },
    /// Print three-way status.
    Status,
    /// Print history.
    Log {
        #[arg(short = 'n', long)]
        n: Option<usize>,
    },
    /// Switch the working tree and HEAD to a commit or branch.
    Checkout {
        #[arg(name = "commit-or-branch")]
        target: String,

        /// Create a new branch at the current commit, then switch to it.
        #[arg(short = 'b')]
        new_branch: bool,
    },
    /// List or create branches.
    Branch {
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from("."));
            Repository::init(&path).with_context(|| format!("initializing {}", path.display()))?;
            println!("Initialized empty ugit repository in {}/.ugit", path.display());
        }

        Commands::Add { paths } => {
            let repo = Repository::open(&PathBuf::from("."))?;
            let mut store = repo.object_store()?;
            let report = ugit::add::add(&repo, &mut store, &paths)?;
            for (path, err) in &report.errors {
                eprintln!("error: {}: {err}", path.display());
            }
        }

        Commands::Commit { message, author } => {
            let repo = Repository::open(&PathBuf::from("."))?;
            let mut store = repo.object_store()?;
            match commit::commit(&repo, &mut store, &message, author.as_deref())? {
                CommitOutcome::Committed { hash } => {
                    println!("[{}] {}", short_hex(&hash), message.trim());
                }
                CommitOutcome::NothingToCommit => {
                    println!("nothing to commit");
                }
            }
        }

        Commands::Status => {
            let repo = Repository::open(&PathBuf::from("."))?;
            let store = repo.object_store()?;
            let report = status::status(&repo, &store)?;
            status::print_status(&report, &mut std::io::stdout())?;
        }

        Commands::Log { n } => {
            let repo = Repository::open(&PathBuf::from("."))?;
            let store = repo.object_store()?;
            let entries = log::log(&repo, &store, n)?;
            print!("{}", log::format_log(&entries));
        }

        Commands::Checkout { target, new_branch } => {
            let repo = Repository::open(&PathBuf::from("."))?;
            let store = repo.object_store()?;

            if new_branch {
                let head = repo
                    .resolve_head()?
                    .context("cannot create a branch: HEAD has no commit yet")?;
                branch::create(&repo, &target, head)?;
                checkout::checkout(&repo, &store, CheckoutTarget::Branch(&target))?;
            } else if branch::read(&repo, &target)?.is_some() {
                checkout::checkout(&repo, &store, CheckoutTarget::Branch(&target))?;
            } else {
                let hash = ugit::hash::hex_to_hash(&target)
                    .with_context(|| format!("'{target}' is neither a known branch nor a commit hash"))?;
                checkout::checkout(&repo, &store, CheckoutTarget::Commit(hash))?;
            }

            println!("switched to {target}");
        }

        Commands::Branch { name } => {
            let repo = Repository::open(&PathBuf::from("."))?;
            match name {
                Some(name) => {
                    let head = repo
                        .resolve_head()?
                        .context("cannot create a branch: HEAD has no commit yet")?;
                    branch::create(&repo, &name, head)?;
                }
                None => {
                    for b in branch::list(&repo)? {
                        let marker = if b.is_current { "* " } else { "  " };
                        let hash = b.hash.map_or_else(|| "?".to_string(), |h| hash_to_hex(&h));
                        println!("{marker}{}  {hash}", b.name);
                    }
                }
            }
        }
    }

    Ok(())
}
