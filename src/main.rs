//! CLI entry point for wp-pipeline

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wp_pipeline::{helpers, Site};

#[derive(Parser)]
#[command(name = "wp-pipeline")]
#[command(version)]
#[command(about = "Inspect and convert a WordPress blog export", long_about = None)]
struct Cli {
    /// Path to the exported posts JSON file
    #[arg(short, long, global = true, default_value = "blog-posts.json")]
    data: PathBuf,

    /// Optional pipeline config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List published posts, newest first
    List,

    /// Show one post's metadata, route, and featured image
    Show {
        /// Post slug
        slug: String,
    },

    /// Convert a post body (or a raw file) to HTML on stdout
    Convert {
        /// Post slug to convert
        slug: Option<String>,

        /// Convert the contents of a file instead of a post body
        #[arg(short, long, conflicts_with = "slug")]
        file: Option<PathBuf>,
    },

    /// Print related posts for a slug in rank order
    Related {
        /// Post slug
        slug: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "4")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "wp_pipeline=debug,info"
    } else {
        "wp_pipeline=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let site = Site::load(&cli.data, cli.config.as_deref())?;

    match cli.command {
        Commands::List => {
            let mut posts: Vec<_> = site.posts.published().collect();
            posts.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
            for post in posts {
                println!(
                    "{}  {:<40}  {} ({} min read)",
                    helpers::format_display_date(&post.date),
                    post.slug,
                    post.title,
                    site.reading_time(&post.content)
                );
            }
        }

        Commands::Show { slug } => {
            let Some(post) = site.posts.find_by_slug(&slug) else {
                bail!("no post with slug {:?}", slug);
            };
            println!("Title:     {}", post.title);
            println!("Slug:      {}", post.slug);
            println!("Status:    {}", String::from(post.post_status.clone()));
            println!("Published: {}", helpers::format_display_date(&post.date));
            println!("Modified:  {}", helpers::format_display_date(&post.modified));
            println!("Reading:   {} min", site.reading_time(&post.content));
            println!(
                "Route:     {}/{}",
                site.config.blog_route.trim_end_matches('/'),
                post.slug
            );
            match site.featured_image(post) {
                Some(image) => println!("Image:     {}", image),
                None => println!("Image:     (none)"),
            }
        }

        Commands::Convert { slug, file } => {
            let raw = match (&slug, &file) {
                (Some(slug), None) => {
                    let Some(post) = site.posts.find_by_slug(slug) else {
                        bail!("no post with slug {:?}", slug);
                    };
                    post.content.clone()
                }
                (None, Some(path)) => std::fs::read_to_string(path)?,
                _ => bail!("provide a slug or --file"),
            };
            println!("{}", site.convert(&raw).to_html());
        }

        Commands::Related { slug, limit } => {
            for post in site.related(&slug, limit) {
                println!("{:<40}  {}", post.slug, post.title);
            }
        }
    }

    Ok(())
}
