//! ipynb-render - Render Jupyter notebooks to HTML fragments

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ipynb_render::{create_renderer, parse, title_of, MathBackend, Render, RenderConfig};

#[derive(Parser)]
#[command(name = "ipynb-render")]
#[command(version, about = "Render Jupyter notebooks to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    ipynb-render notebook.ipynb                 Print the HTML fragment
    ipynb-render notebook.ipynb -o out.html     Write it to a file
    cat notebook.ipynb | ipynb-render -         Read the notebook from stdin
    ipynb-render --title notebook.ipynb         Print the notebook title")]
struct Cli {
    /// Notebook file, or - for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prefix of CSS class names
    #[arg(long, value_name = "PREFIX")]
    class_prefix: Option<String>,

    /// Math backend: katex, mathjax or mathml
    #[arg(long, value_name = "BACKEND")]
    math: Option<MathBackend>,

    /// Print only the notebook title
    #[arg(short, long)]
    title: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> ipynb_render::Result<()> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(prefix) = &cli.class_prefix {
        config.class_prefix = prefix.clone();
    }
    if let Some(backend) = cli.math {
        config.math_backend = backend;
    }

    let input = read_input(&cli.input)?;
    let notebook = parse(&input)?;

    let mut out = if cli.title {
        title_of(&notebook)
    } else {
        log::info!("Rendering {} cells from {}", notebook.cells.len(), cli.input);
        create_renderer(&config).render(&notebook)?.outer_html()
    };
    out.push('\n');

    match &cli.output {
        Some(path) => std::fs::write(path, out)?,
        None => io::stdout().write_all(out.as_bytes())?,
    }
    Ok(())
}

fn read_input(input: &str) -> io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
    }
}
