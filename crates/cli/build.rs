use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let completions_dir = out_dir.join("completions");

    if fs::create_dir_all(&completions_dir).is_err() {
        return;
    }

    let mut cmd = clap::Command::new("lectern")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract readable articles and save them to your reading library")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (markdown, html, text, json)")
                .value_name("FORMAT")
                .default_value("markdown")
                .value_parser(["markdown", "html", "text", "json"]),
        )
        .arg(clap::arg!(--url <URL> "Page URL used to resolve relative image paths for file and stdin input"))
        .arg(clap::arg!(--text "Treat the input as pasted plain text instead of HTML"))
        .arg(clap::arg!(--title <TITLE> "Title for plain text input"))
        .arg(clap::arg!(--references "Include reference table with all links (Markdown/JSON only)"))
        .arg(clap::arg!(--frontmatter "Include TOML frontmatter (Markdown) or a title header (text)"))
        .arg(clap::arg!(--inline_images "Render extracted images where they appeared"))
        .arg(clap::arg!(--no_images "Strip images from output"))
        .arg(clap::arg!(--wrap <COLS> "Wrap text output at this many columns").default_value("0"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds, per attempt").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--no_proxies "Only try the direct request, never the public proxies"))
        .arg(clap::arg!(--min_length <NUM> "Fail when the extracted content is shorter than this"))
        .arg(clap::arg!(--save "Save the article to the library"))
        .arg(
            clap::arg!(--library <FILE> "Library file (default: the user data directory)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug output"));

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        if let Err(e) = clap_complete::generate_to(shell, &mut cmd, "lectern", &completions_dir) {
            println!("cargo:warning=Failed to generate {shell} completions: {e}");
        }
    }

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
