use std::path::PathBuf;

use anyhow::Context;
use rethread_client::{
    api::{Permalink, Post},
    AutoAck, FileStore, PostState, PostView, Tracker,
};

const USER_AGENT: &str = concat!("rethread/", env!("CARGO_PKG_VERSION"));

// Characters of a comment's first line shown when listing threads
const PREVIEW_LEN: usize = 80;

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long, default_value = "https://www.reddit.com")]
    host: String,

    /// Snapshot directory, defaults to the RETHREAD_STORE environment variable
    #[structopt(short, long, parse(from_os_str))]
    store: Option<PathBuf>,

    /// Read the post from a saved `.json` document instead of fetching it
    #[structopt(long, parse(from_os_str))]
    from_file: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Show whether a post has new comments since it was last acknowledged
    Status {
        /// Permalink of the post, eg. /r/rust/comments/abc123/some_title/
        permalink: String,
    },

    /// List the threads leading to each new comment
    Threads { permalink: String },

    /// Mark every comment of the post as seen
    Ack { permalink: String },

    /// Refetch the post periodically, acknowledging new comments after a delay
    Watch {
        permalink: String,

        /// Seconds between two fetches
        #[structopt(long, default_value = "60")]
        interval: u64,

        /// Seconds new comments stay flagged before being acknowledged
        #[structopt(long, default_value = "10")]
        auto_ack: i64,
    },
}

fn store_path(opt: &Opt) -> anyhow::Result<PathBuf> {
    if let Some(p) = &opt.store {
        return Ok(p.clone());
    }
    let path = std::env::var("RETHREAD_STORE")
        .context("retrieving RETHREAD_STORE environment variable, as --store was not passed")?;
    Ok(PathBuf::from(path))
}

async fn load_post(
    client: &reqwest::Client,
    opt: &Opt,
    permalink: &Permalink,
) -> anyhow::Result<Post> {
    let body = match &opt.from_file {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("reading post document {:?}", path))?,
        None => client
            .get(format!("{}{}", opt.host, permalink.json_path()))
            .query(&[("raw_json", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .with_context(|| format!("fetching post {permalink}"))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| format!("downloading post {permalink}"))?
            .to_vec(),
    };
    let post = Post::from_reddit_json(&body).context("decoding post document")?;
    if post.permalink != *permalink {
        tracing::warn!(
            requested = %permalink,
            got = %post.permalink,
            "post document is for another permalink, tracking it under its own"
        );
    }
    Ok(post)
}

fn describe(state: PostState) -> String {
    match state {
        PostState::Unseen => String::from("never acknowledged"),
        PostState::Seen => String::from("no new comments"),
        PostState::SeenWithNew(1) => String::from("1 new comment"),
        PostState::SeenWithNew(n) => format!("{n} new comments"),
    }
}

fn preview(body: &str) -> String {
    let line = body.lines().next().unwrap_or("");
    match line.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => String::from(line),
    }
}

fn print_status(post: &Post, view: &PostView) {
    println!("{}", post.title);
    println!("  {} comments, {}", post.num_comments(), describe(view.state));
    if let Some(t) = view.last_acknowledged {
        println!("  last acknowledged {}", t.to_rfc3339());
    }
}

fn print_threads(view: &PostView) {
    let threads = view.threads();
    if threads.is_empty() {
        println!("no new comments");
        return;
    }
    for (i, t) in threads.iter().enumerate() {
        println!("thread {}/{}", i + 1, threads.len());
        for (pos, c) in t.path.iter().enumerate() {
            let marker = if pos == t.new_index { "*" } else { " " };
            println!(
                "{marker} {:indent$}{} ({}): {}",
                "",
                c.author,
                c.id,
                preview(&c.body),
                indent = 2 * pos,
            );
        }
    }
}

/// Countdown to keep running once a fetch found the post in `state`
///
/// A running countdown restarts whenever the state changes, so comments that
/// just arrived stay flagged for the whole delay. A post never acknowledged
/// gets acknowledged too, giving later fetches something to compare against.
fn next_countdown(
    countdown: Option<AutoAck>,
    previous: Option<PostState>,
    state: PostState,
    delay: chrono::Duration,
) -> Option<AutoAck> {
    match state {
        // acknowledged from elsewhere in the meantime
        PostState::Seen => None,
        _ if previous == Some(state) && countdown.is_some() => countdown,
        _ => Some(AutoAck::new(delay)),
    }
}

async fn watch(
    client: &reqwest::Client,
    opt: &Opt,
    tracker: &mut Tracker<FileStore>,
    permalink: &Permalink,
    interval: u64,
    auto_ack: i64,
) -> anyhow::Result<()> {
    let tick = std::time::Duration::from_secs(1);
    let mut ticker = tokio::time::interval(tick);
    let mut until_fetch = 0;
    let mut countdown: Option<AutoAck> = None;
    let mut post: Option<Post> = None;
    let mut last_state = None;
    let delay = chrono::Duration::seconds(auto_ack);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("stopped watching {permalink}");
                return Ok(());
            }
            _ = ticker.tick() => (),
        }

        if until_fetch == 0 {
            until_fetch = interval.max(1);
            match load_post(client, opt, permalink).await {
                Ok(p) => {
                    let view = tracker.view(&p)?;
                    if last_state != Some(view.state) {
                        print_status(&p, &view);
                        if view.state == PostState::Unseen {
                            println!(
                                "  taking a first snapshot in {auto_ack}s, later comments will show as new"
                            );
                        }
                    }
                    countdown = next_countdown(countdown, last_state, view.state, delay);
                    last_state = Some(view.state);
                    post = Some(p);
                }
                Err(err) => tracing::error!(?err, "failed to load post, will retry next interval"),
            }
        }
        until_fetch -= 1;

        let fired = match countdown.as_mut() {
            Some(c) => c.advance(chrono::Duration::seconds(1)),
            None => false,
        };
        if fired {
            countdown = None;
            if let Some(p) = &post {
                let snapshot = tracker.acknowledge(p)?;
                println!("acknowledged {} comments", snapshot.len());
                last_state = Some(PostState::Seen);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let mut tracker = Tracker::new(FileStore::new(store_path(&opt)?));
    let client = reqwest::Client::new();

    match &opt.cmd {
        Command::Status { permalink } => {
            let post = load_post(&client, &opt, &Permalink::new(permalink.clone())).await?;
            let view = tracker.view(&post)?;
            print_status(&post, &view);
        }
        Command::Threads { permalink } => {
            let post = load_post(&client, &opt, &Permalink::new(permalink.clone())).await?;
            let view = tracker.view(&post)?;
            print_threads(&view);
        }
        Command::Ack { permalink } => {
            let post = load_post(&client, &opt, &Permalink::new(permalink.clone())).await?;
            let previous = tracker.state(&post)?;
            let snapshot = tracker.acknowledge(&post)?;
            println!(
                "acknowledged {} comments, previously {}",
                snapshot.len(),
                describe(previous)
            );
            tracing::info!(
                store = ?tracker.store().path(),
                post = %post.permalink,
                "saved snapshot"
            );
        }
        Command::Watch {
            permalink,
            interval,
            auto_ack,
        } => {
            let permalink = Permalink::new(permalink.clone());
            watch(&client, &opt, &mut tracker, &permalink, *interval, *auto_ack).await?;
        }
    }

    Ok(())
}
