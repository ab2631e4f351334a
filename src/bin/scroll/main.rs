use std::fmt::{Display, Formatter};
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spdlog::{error, info, warn};

use scroll::config::Config;
use scroll::logger::configure_logger;
use scroll::scroll_list::ScrollList;
use scroll::view::json_export::write_json;
use scroll::view::rss_renderer::RssChannel;
use scroll::text_utils::format_naive_date;
use scroll::{ingest, ScrollIndex, ScrollPost, ScrollType};

use crate::config::open_config;
use crate::new_post::new_cmd;

mod config;
mod new_post;

const CFG_FILE_NAME: &str = "scroll.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path. Defaults to scroll.toml next to the executable, in the
    /// current directory or in the user config directory
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest the scroll directory and write the JSON artifact (and feed)
    Build(BuildArgs),
    /// List published posts, most recent first
    List(ListArgs),
    /// Show one published post with its neighbors and related posts
    Show {
        slug: String,
    },
    /// Posts most similar to the given one
    Similar {
        slug: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Tags by number of published posts
    Tags,
    /// Scaffold a new post
    New(NewArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Overrides paths.output_file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Overrides paths.feed_file
    #[arg(short, long)]
    feed: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// 1-based page, using defaults.page_size
    #[arg(short, long)]
    page: Option<u32>,

    /// Only posts with this tag
    #[arg(short, long)]
    tag: Option<String>,
}

#[derive(Parser, Debug)]
pub(crate) struct NewArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    author: Option<String>,

    #[arg(long = "type", default_value = "update", value_parser = parse_scroll_type)]
    scroll_type: ScrollType,

    #[arg(short, long, default_value_t = PostOutput::Stdout)]
    output: PostOutput,
}

#[derive(Clone, Debug, ValueEnum)]
pub(crate) enum PostOutput {
    /// Writes the new post to the stdout
    Stdout,
    /// Writes the new post to a file in the scroll directory
    File,
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PostOutput::Stdout => write!(f, "stdout"),
            PostOutput::File => write!(f, "file"),
        }
    }
}

fn parse_scroll_type(value: &str) -> Result<ScrollType, String> {
    value.parse()
}

fn load_index(config: &Config) -> Result<ScrollIndex> {
    let scroll_dir = &config.paths.scroll_dir;
    let raw_documents = ScrollList::new(scroll_dir)
        .read_raw_documents()
        .with_context(|| format!("Reading scroll directory {}", scroll_dir.display()))?;

    Ok(ingest(raw_documents, &config.ingest_options())?)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating directory {}", parent.display()))?;
    }
    Ok(())
}

fn build_cmd(config: &Config, args: BuildArgs) -> Result<()> {
    let index = load_index(config)?;

    let out = args.out.unwrap_or_else(|| config.paths.output_file.clone());
    create_parent(&out)?;
    let file = File::create(&out).with_context(|| format!("Creating {}", out.display()))?;
    write_json(&index, BufWriter::new(file))?;
    info!("Wrote {} scroll posts to {}", index.all().len(), out.display());

    let Some(feed_path) = args.feed.or_else(|| config.paths.feed_file.clone()) else {
        return Ok(());
    };
    let Some(ref feed) = config.feed else {
        warn!("Feed file {} requested without a [feed] section, skipping", feed_path.display());
        return Ok(());
    };

    let rss = RssChannel {
        ch_title: &feed.title,
        ch_link: &feed.site_url,
        ch_desc: &feed.description,
    };
    let posts = index.list_published();
    let recent = &posts[..posts.len().min(feed.item_count)];
    let xml = rss.render(recent)?;

    create_parent(&feed_path)?;
    fs::write(&feed_path, xml).with_context(|| format!("Writing {}", feed_path.display()))?;
    info!("Wrote feed with {} items to {}", recent.len(), feed_path.display());

    Ok(())
}

fn print_line(post: &ScrollPost) {
    let date = format_naive_date(&post.date);
    println!("{:<14} {:<14} {:>3} min  {}  ({})", date, post.scroll_type, post.reading_time_minutes, post.title, post.slug);
}

fn list_cmd(config: &Config, args: ListArgs) -> Result<()> {
    let index = load_index(config)?;

    let posts = match (args.tag, args.page) {
        (Some(tag), _) => index.with_tag(&tag),
        (None, Some(page)) => {
            let page = index.page(page, config.defaults.page_size)?;
            println!("Page {} of {}", page.number, page.page_count);
            page.items
        }
        (None, None) => index.list_published(),
    };

    for post in posts {
        print_line(post);
    }
    Ok(())
}

fn show_cmd(config: &Config, slug: &str) -> Result<()> {
    let index = load_index(config)?;
    let post = index.find_by_slug(slug)?;

    println!("{}", post);
    println!("{}", post.excerpt);

    let neighbors = index.neighbors(slug);
    if let Some(newer) = neighbors.newer {
        println!("Newer: {}", newer.slug);
    }
    if let Some(older) = neighbors.older {
        println!("Older: {}", older.slug);
    }

    println!("Related:");
    for related in index.similar_to(slug, config.defaults.similar_limit) {
        print_line(related);
    }
    Ok(())
}

fn similar_cmd(config: &Config, slug: &str, limit: Option<usize>) -> Result<()> {
    let index = load_index(config)?;
    let limit = limit.unwrap_or(config.defaults.similar_limit);
    for post in index.similar_to(slug, limit) {
        print_line(post);
    }
    Ok(())
}

fn tags_cmd(config: &Config) -> Result<()> {
    let index = load_index(config)?;
    for (tag, count) in index.tags() {
        println!("{:>4}  {}", count, tag);
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config_path.map(PathBuf::from);
    let config = open_config(config_path);

    if let Ok(ref config) = config {
        if let Err(err) = configure_logger(config.log.as_ref()) {
            warn!("Error creating logger sinks. Using console instead. Desc={}", err);
        }
    }

    match args.command {
        // Scaffolding works without a config, it only uses it to find the scroll dir
        Command::New(new_args) => {
            let scroll_dir = config.as_ref().ok().map(|c| c.paths.scroll_dir.as_path());
            new_cmd(new_args, scroll_dir)
        }
        Command::Build(build_args) => build_cmd(&config?, build_args),
        Command::List(list_args) => list_cmd(&config?, list_args),
        Command::Show { slug } => show_cmd(&config?, &slug),
        Command::Similar { slug, limit } => similar_cmd(&config?, &slug, limit),
        Command::Tags => tags_cmd(&config?),
    }
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
