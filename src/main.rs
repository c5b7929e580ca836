use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use mention_index::{load_texts, tag_batch, write_tagged, Dictionary, TaggerConfig, VERSION};

#[derive(Parser)]
#[command(name = "mention-index", version = VERSION, about = "Tag texts with bank, card and keyword mentions")]
struct Cli {
    /// Tagger config (JSON), or a directory holding banks.json/cards.json/keywords.json
    #[arg(long, env = "MENTION_INDEX_CONFIG", default_value = "tagger.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tag every text unit in a CSV, JSON lines or JSON array file
    Tag {
        #[arg(long)]
        input: PathBuf,

        /// Write tagged units here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the keyword set
    Keywords,
    /// Print the multi-word phrases
    Phrases,
    /// Print every entity and category tag a run can emit
    Catalog,
    /// Build the dictionary and report on it
    Check,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = TaggerConfig::load(&cli.config)?;
    let dictionary = Dictionary::from_config(&config)
        .with_context(|| format!("Failed to build dictionary from {:?}", cli.config))?;

    match cli.command {
        Command::Tag { input, output } => run_tag(&dictionary, &input, output.as_deref())?,
        Command::Keywords => {
            for word in dictionary.keywords().sorted() {
                println!("{}", word);
            }
        }
        Command::Phrases => {
            for phrase in dictionary.phrases().iter() {
                println!("{}", phrase.joined());
            }
        }
        Command::Catalog => run_catalog(&dictionary),
        Command::Check => run_check(&dictionary),
    }

    Ok(())
}

fn run_tag(dictionary: &Dictionary, input: &Path, output: Option<&Path>) -> Result<()> {
    eprintln!("📂 Loading texts from {:?}...", input);
    let units = load_texts(input)?;
    eprintln!("✓ Loaded {} text units", units.len());

    let report = tag_batch(dictionary, &units);

    let written = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_tagged(BufWriter::new(file), &report.tagged)?
        }
        None => write_tagged(io::stdout().lock(), &report.tagged)?,
    };

    let summary = &report.summary;
    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("🏷️  Run {}", summary.run_id);
    eprintln!("✓ Units scanned:        {}", summary.units);
    eprintln!("✓ With keyword hits:    {}", summary.with_keywords);
    eprintln!("✓ With entity tags:     {}", summary.with_entities);
    eprintln!("✓ With category tags:   {}", summary.with_categories);
    eprintln!("✓ Tagged units written: {}", written);
    eprintln!("  Dictionary: {}", summary.dictionary_fingerprint);

    Ok(())
}

fn run_catalog(dictionary: &Dictionary) {
    let catalog = dictionary.catalog();

    println!("# entity tags ({})", catalog.entity_tags.len());
    for tag in &catalog.entity_tags {
        println!("{}", tag);
    }

    println!("\n# category tags ({})", catalog.category_tags.len());
    for tag in &catalog.category_tags {
        println!("{}", tag);
    }
}

fn run_check(dictionary: &Dictionary) {
    println!("📚 Dictionary check");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Keywords:            {}", dictionary.keywords().len());
    println!("✓ Phrases:             {}", dictionary.phrases().len());
    println!("✓ Entity surfaces:     {}", dictionary.entity_remap().len());
    println!("✓ Card surfaces:       {}", dictionary.card_remap().len());
    println!("✓ Category surfaces:   {}", dictionary.category_remap().len());
    println!("✓ Fingerprint:         {}", dictionary.fingerprint());

    let collisions = dictionary.collisions();
    if collisions.is_empty() {
        println!("\n✅ No alias collisions");
    } else {
        println!("\n⚠️  {} alias collision(s):", collisions.len());
        for collision in collisions {
            println!("   {}", collision);
        }
    }

    let unreachable = dictionary.unreachable_surfaces();
    if !unreachable.is_empty() {
        println!("\n⚠️  {} remap surface(s) never produced by the scanner:", unreachable.len());
        for (table, surface) in unreachable {
            println!("   [{}] {}", table, surface);
        }
    }
}
