use std::path::PathBuf;
use std::process;

use clap::Parser;

use consent_pdf::publish::{DirectoryStore, RecordBundle, publish_consent_document};
use consent_pdf::{Error, FontRole, FontSources, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "consent-pdf", version, about = "Render a signed consent record as a PDF")]
struct Cli {
    /// JSON file holding the submission, module and provider records
    bundle: PathBuf,

    /// Directory documents are stored in
    #[arg(long, default_value = "consent-documents")]
    store: PathBuf,

    /// Product name printed in the page footers
    #[arg(long, default_value = "ClearConsent")]
    brand: String,

    #[arg(long, value_name = "FONT FILE", help = "TrueType font replacing Helvetica")]
    sans: Option<PathBuf>,
    #[arg(long, value_name = "FONT FILE", help = "TrueType font replacing Helvetica-Bold")]
    sans_bold: Option<PathBuf>,
    #[arg(long, value_name = "FONT FILE", help = "TrueType font replacing Times-Roman")]
    serif: Option<PathBuf>,
    #[arg(long, value_name = "FONT FILE", help = "TrueType font replacing Times-Italic")]
    serif_italic: Option<PathBuf>,

    /// Reuse an already stored document instead of regenerating it
    #[arg(long)]
    keep: bool,

    /// Log timing and fallback details
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn font_sources(&self) -> Result<FontSources, Error> {
        let mut sources = FontSources::default();
        for (role, path) in [
            (FontRole::Sans, &self.sans),
            (FontRole::SansBold, &self.sans_bold),
            (FontRole::Serif, &self.serif),
            (FontRole::SerifItalic, &self.serif_italic),
        ] {
            if let Some(path) = path {
                sources = sources.with_file(role, path)?;
            }
        }
        Ok(sources)
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let json = std::fs::read_to_string(&cli.bundle)?;
    let bundle = RecordBundle::from_json(&json)?;
    let options = RenderOptions {
        brand: cli.brand.clone(),
        fonts: cli.font_sources()?,
    };

    let mut request = bundle.request();
    request.regenerate = !cli.keep;

    let store = DirectoryStore::new(&cli.store);
    let published = publish_consent_document(&request, &bundle, &store, &options)?;
    println!("{}", serde_json::to_string_pretty(&published)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
