use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use lectern_core::{
    Article, ExtractionResult, JsonConfig, Library, MarkdownConfig, Reader, ReaderConfig, TextConfig, convert_to_json,
    convert_to_markdown, convert_to_text, import_text, interleave,
};
use owo_colors::OwoColorize;

mod echo;

use echo::{
    format_size, print_banner, print_detail, print_extraction_details, print_info, print_step, print_success,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Markdown,
    Html,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, html, text, json", s)),
        }
    }
}

/// Extract readable articles from web pages and keep them in a local library
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version)]
#[command(about = "Extract readable articles and save them to your reading library", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (markdown, html, text, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputFormat,

    /// Page URL used to resolve relative image paths for file and stdin input
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Treat the input as pasted plain text instead of HTML
    #[arg(long)]
    text: bool,

    /// Title for plain text input (default: "text")
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Include reference table with all links (Markdown/JSON only)
    #[arg(long)]
    references: bool,

    /// Include TOML frontmatter (Markdown) or a title header (text)
    #[arg(long)]
    frontmatter: bool,

    /// Render extracted images where they appeared (Markdown/HTML only)
    #[arg(long)]
    inline_images: bool,

    /// Strip images from output
    #[arg(long)]
    no_images: bool,

    /// Wrap text output at this many columns
    #[arg(long, default_value = "0", value_name = "COLS")]
    wrap: usize,

    /// HTTP timeout in seconds, per attempt
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Only try the direct request, never the public proxies
    #[arg(long)]
    no_proxies: bool,

    /// Fail when the extracted content is shorter than this many characters
    #[arg(long, value_name = "NUM")]
    min_length: Option<usize>,

    /// Save the article to the library
    #[arg(long)]
    save: bool,

    /// Library file (default: the user data directory)
    #[arg(long, value_name = "FILE")]
    library: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn is_url(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }

    fn reader_config(&self) -> ReaderConfig {
        let mut builder = ReaderConfig::builder().timeout(self.timeout);
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if self.no_proxies {
            builder = builder.proxies(Vec::<String>::new());
        }
        if let Some(min) = self.min_length {
            builder = builder.min_content_length(min);
        }
        builder.build()
    }

    /// Where the article came from, as recorded in output and the library.
    fn source(&self) -> Option<String> {
        if self.is_url() { Some(self.input.clone()) } else { self.url.clone() }
    }
}

async fn read_input(args: &Args, reader: &Reader) -> anyhow::Result<String> {
    if args.input == "-" {
        lectern_core::fetch_stdin().context("Failed to read from stdin")
    } else if args.is_url() {
        if args.text {
            bail!("--text expects a file or stdin, not a URL");
        }
        let config = &reader.config().fetch;
        lectern_core::fetch_url(&args.input, config).await.context("Failed to fetch URL")
    } else {
        lectern_core::fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))
    }
}

/// Extraction for HTML input, or the imported paragraphs for plain text.
fn extract(args: &Args, reader: &Reader, input: &str) -> anyhow::Result<(ExtractionResult, Article)> {
    let source = args.source();

    if args.text {
        let article = import_text(args.title.as_deref().unwrap_or_default(), input, source);
        let mut result = reader.parse(&article.content).context("Failed to read imported text")?;
        result.title = article.title.clone();
        return Ok((result, article));
    }

    let result = match &source {
        Some(url) => reader.parse_with_url(input, url),
        None => reader.parse(input),
    }
    .context("Failed to extract article")?;

    let title = args.title.clone().unwrap_or_else(|| result.title.clone());
    let article = Article::new(title, result.content.clone(), source, result.images.clone());
    Ok((result, article))
}

fn render(args: &Args, result: &ExtractionResult) -> anyhow::Result<String> {
    let source = args.source();
    let source = source.as_deref();

    let output = match args.format {
        OutputFormat::Markdown => {
            let config = MarkdownConfig {
                include_frontmatter: args.frontmatter,
                include_references: args.references,
                strip_images: args.no_images,
                inline_images: args.inline_images,
                include_title_heading: true,
            };
            convert_to_markdown(result, source, &config).context("Failed to convert to Markdown")?
        }
        OutputFormat::Html if args.inline_images && !args.no_images => interleave(result),
        OutputFormat::Html if args.no_images => lectern_core::rewrite::strip_images(&result.content),
        OutputFormat::Html => result.content.clone(),
        OutputFormat::Text => {
            let config = TextConfig { preserve_paragraphs: true, line_width: args.wrap, include_header: args.frontmatter };
            convert_to_text(result, source, &config).context("Failed to convert to text")?
        }
        OutputFormat::Json => {
            let config = JsonConfig { include_text: true, include_references: args.references, pretty: true, ..Default::default() };
            convert_to_json(result, source, &config).context("Failed to convert to JSON")?
        }
    };

    Ok(output)
}

fn save(args: &Args, article: Article) -> anyhow::Result<()> {
    let path = match &args.library {
        Some(path) => path.clone(),
        None => Library::default_path().context("No data directory available; pass --library")?,
    };

    let mut library = Library::load(&path).with_context(|| format!("Failed to load library: {}", path.display()))?;
    let title = article.title.clone();
    let id = library.add_article(article);
    library.save(&path).with_context(|| format!("Failed to save library: {}", path.display()))?;

    print_success(&format!("Saved \"{}\" ({}) to {}", title, id, path.display()));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let total = if args.save { 4 } else { 3 };

    if args.verbose {
        print_banner();
        print_info("Debug output enabled");
        eprintln!();
    }

    if args.no_images && args.inline_images {
        print_warning("--no-images overrides --inline-images");
    }

    let reader = Reader::with_config(args.reader_config());

    if args.verbose {
        let from = match args.input.as_str() {
            "-" => "Reading from stdin".to_string(),
            input if args.is_url() => format!("Fetching from {}", input.bright_white().underline()),
            input => format!("Reading from file {}", input.bright_white()),
        };
        print_step(1, total, &from);
    }

    let input = read_input(&args, &reader).await?;

    if args.verbose {
        print_detail("Size", &format_size(input.len()));
        eprintln!();
        print_step(2, total, if args.text { "Importing plain text" } else { "Extracting article" });
    }

    let (result, article) = extract(&args, &reader, &input)?;

    if args.verbose {
        print_detail("Title", &result.title);
        print_extraction_details(&result);
        print_step(3, total, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = render(&args, &result)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    if args.save {
        if args.verbose {
            print_step(4, total, "Saving to library");
        }
        save(&args, article)?;
    }

    Ok(())
}
