//! richblocks CLI - editor HTML to content-store blocks

mod config;
mod import;
mod serve;
mod shutdown;

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use richblocks::convert::render_blocks;
use richblocks::posts::published_posts;
use richblocks::store::MemoryStore;
use richblocks::submit::{search_authors, submit_review, Submission};
use richblocks::{
    CleanupPreset, ConvertOptions, ExtractionStats, HtmlParser, JsonFormat, OutputFormat,
    ParseOptions, RenderOptions,
};

use config::{ReviewArgs, StoreArgs};
use import::ImportArgs;

type CmdResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "richblocks")]
#[command(author = "Plumfield Moms")]
#[command(version)]
#[command(about = "Convert editor HTML to content-store blocks", long_about = None)]
struct Cli {
    /// Input HTML file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    parse: ParseArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Conversion switches shared by the convert commands.
#[derive(clap::Args, Clone, Copy, Default)]
struct ParseArgs {
    /// Convert <ol> items as numbered list items
    #[arg(long, global = true)]
    ordered_lists: bool,

    /// Emit nested blocks again for every enclosing block
    #[arg(long, global = true)]
    repeat_nested: bool,

    /// Text cleanup preset
    #[arg(long, value_enum, global = true)]
    cleanup: Option<CleanupLevel>,
}

impl ParseArgs {
    fn options(self) -> ParseOptions {
        let mut options = ParseOptions::new().with_ordered_lists(self.ordered_lists);
        if self.repeat_nested {
            options = options.repeat_nested();
        }
        if let Some(level) = self.cleanup {
            options = options.with_cleanup_preset(level.into());
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert HTML to every format (JSON, text, HTML)
    Convert {
        /// Input HTML files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert HTML to wire blocks JSON
    Json {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Convert HTML to plain text
    #[command(alias = "txt")]
    Text {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Append link URLs after link text
        #[arg(long)]
        link_urls: bool,
    },

    /// Render converted blocks back to HTML
    Html {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show conversion statistics
    Info {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Run the review app server
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        reviews: ReviewArgs,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Directory holding pwa.html and the static assets
        #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
        public_dir: PathBuf,

        /// Password for the review app
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: Option<String>,

        /// Request worker threads
        #[arg(long, default_value_t = 4)]
        threads: usize,
    },

    /// Import new podcast episodes
    Import(ImportArgs),

    /// List authors
    Authors {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        reviews: ReviewArgs,

        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List published posts
    Posts {
        #[command(flatten)]
        store: StoreArgs,

        /// Posts database
        #[arg(long, env = "DATABASE_ID")]
        database: String,
    },

    /// Submit a review from an HTML file
    Submit {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        reviews: ReviewArgs,

        /// Review type (bookReview, pictureBookReview, reflection)
        #[arg(short = 't', long = "type")]
        review_type: String,

        /// Review title
        #[arg(long)]
        title: String,

        /// Author page id
        #[arg(long)]
        author: String,

        /// Review body HTML (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the page instead of creating it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Unicode normalization only
    Minimal,
    /// Normalization, invisible characters and whitespace (default)
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = shutdown::setup_shutdown_handler() {
        log::warn!("could not install the Ctrl+C handler: {}", e);
    }

    let cli = Cli::parse();
    let parse = cli.parse;

    let result = match cli.command {
        Some(Commands::Convert { inputs, output }) => cmd_convert(&inputs, output.as_deref(), parse),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(input.as_deref(), output.as_deref(), compact, parse),
        Some(Commands::Text {
            input,
            output,
            link_urls,
        }) => cmd_text(input.as_deref(), output.as_deref(), link_urls, parse),
        Some(Commands::Html { input, output }) => cmd_html(input.as_deref(), output.as_deref(), parse),
        Some(Commands::Info { input }) => cmd_info(input.as_deref(), parse),
        Some(Commands::Serve {
            store,
            reviews,
            host,
            port,
            public_dir,
            admin_password,
            threads,
        }) => cmd_serve(
            &store,
            &reviews,
            &host,
            port,
            public_dir,
            admin_password,
            threads,
        ),
        Some(Commands::Import(args)) => import::cmd_import(&args),
        Some(Commands::Authors {
            store,
            reviews,
            search,
        }) => cmd_authors(&store, &reviews, search.as_deref()),
        Some(Commands::Posts { store, database }) => cmd_posts(&store, &database),
        Some(Commands::Submit {
            store,
            reviews,
            review_type,
            title,
            author,
            input,
            dry_run,
        }) => read_input(input.as_deref())
            .map_err(Into::into)
            .and_then(|html| {
                let submission = Submission {
                    title,
                    author_id: author,
                    html: Some(html),
                    ..Default::default()
                };
                cmd_submit(&store, &reviews, &review_type, &submission, dry_run)
            }),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_convert(&[input], cli.output.as_deref(), parse)
            } else {
                println!("{}", "Usage: richblocks <FILE> [OUTPUT]".yellow());
                println!("       richblocks --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read a file, or stdin when no path (or `-`) is given.
fn read_input(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(inputs: &[PathBuf], output: Option<&Path>, parse: ParseArgs) -> CmdResult {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("richblocks_output"));
    fs::create_dir_all(&output_dir)?;

    let formats = [OutputFormat::Json, OutputFormat::Text, OutputFormat::Html];
    let pb = ProgressBar::new((inputs.len() * formats.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let parser = HtmlParser::with_options(parse.options());
    let mut written = Vec::new();
    for input in inputs {
        pb.set_message(format!("Converting {}...", input.display()));
        let html = fs::read_to_string(input)?;
        let blocks = parser.parse(&html);
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();

        for format in formats {
            let options = ConvertOptions::new().with_format(format);
            let result = render_blocks(blocks.clone(), &options)?;
            let name = format!("{}.{}", stem, format.extension());
            fs::write(output_dir.join(&name), &result.content)?;
            written.push(name);
            pb.inc(1);
        }
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_json(input: Option<&Path>, output: Option<&Path>, compact: bool, parse: ParseArgs) -> CmdResult {
    let html = read_input(input)?;
    let blocks = HtmlParser::with_options(parse.options()).parse(&html);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = richblocks::render::to_json(&blocks, format)?;
    write_output(output, &json)?;
    Ok(())
}

fn cmd_text(input: Option<&Path>, output: Option<&Path>, link_urls: bool, parse: ParseArgs) -> CmdResult {
    let html = read_input(input)?;
    let blocks = HtmlParser::with_options(parse.options()).parse(&html);

    let options = RenderOptions::new().with_link_urls(link_urls);
    let text = richblocks::render::to_text(&blocks, &options);
    write_output(output, &text)?;
    Ok(())
}

fn cmd_html(input: Option<&Path>, output: Option<&Path>, parse: ParseArgs) -> CmdResult {
    let html = read_input(input)?;
    let blocks = HtmlParser::with_options(parse.options()).parse(&html);
    write_output(output, &richblocks::render::to_html(&blocks))?;
    Ok(())
}

fn cmd_info(input: Option<&Path>, parse: ParseArgs) -> CmdResult {
    let html = read_input(input)?;
    let blocks = HtmlParser::with_options(parse.options()).parse(&html);
    let stats = ExtractionStats::from_blocks(&blocks);

    println!("{}", "Conversion Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if let Some(path) = input {
        println!("{}: {}", "File".bold(), path.display());
    }
    println!("{}: {}", "Input bytes".bold(), html.len());
    println!("{}: {}", "Blocks".bold(), stats.block_count());
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Runs".bold(), stats.run_count);
    println!("{}: {}", "Styled runs".bold(), stats.styled_run_count);
    println!("{}: {}", "Links".bold(), stats.link_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_serve(
    store: &StoreArgs,
    reviews: &ReviewArgs,
    host: &str,
    port: u16,
    public_dir: PathBuf,
    admin_password: Option<String>,
    threads: usize,
) -> CmdResult {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid address {}:{}: {}", host, port, e))?;

    let admin_password = admin_password.filter(|p| !p.is_empty());
    if admin_password.is_none() {
        log::warn!("ADMIN_PASSWORD is not set, every login will be rejected");
    }
    if !public_dir.is_dir() {
        log::warn!("public directory {} does not exist", public_dir.display());
    }

    let state = serve::AppState {
        store: Arc::new(store.client()?),
        destinations: reviews.destinations(),
        authors_db: reviews.authors_db.clone(),
        parser: HtmlParser::new(),
        sessions: serve::SessionStore::default(),
        admin_password,
        public_dir,
    };

    println!("{} http://{}", "Serving on".green().bold(), addr);
    serve::run(state, addr, threads)
}

fn cmd_authors(store: &StoreArgs, reviews: &ReviewArgs, search: Option<&str>) -> CmdResult {
    let client = store.client()?;
    let authors = search_authors(&client, reviews.authors_db()?, search)?;

    for author in &authors {
        println!("{}  {}", author.id.dimmed(), author.name);
    }
    println!("\n{} {} authors", "Found".green(), authors.len());
    Ok(())
}

fn cmd_posts(store: &StoreArgs, database: &str) -> CmdResult {
    let client = store.client()?;
    let posts = published_posts(&client, database)?;
    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}

fn cmd_submit(
    store: &StoreArgs,
    reviews: &ReviewArgs,
    review_type: &str,
    submission: &Submission,
    dry_run: bool,
) -> CmdResult {
    let destinations = reviews.destinations();
    let parser = HtmlParser::new();

    if dry_run {
        let memory = MemoryStore::new();
        submit_review(&memory, &destinations, review_type, submission, &parser)?;
        println!("{}", serde_json::to_string_pretty(&memory.created())?);
        return Ok(());
    }

    let client = store.client()?;
    let page = submit_review(&client, &destinations, review_type, submission, &parser)?;
    println!("{} {}", "Created page".green(), page.id);
    if let Some(url) = page.url {
        println!("  {}", url.dimmed());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "richblocks".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Editor HTML to content-store blocks");
    println!();
    println!("License: MIT");
}
