/// Corpus Trainer — trains a Markov transition model from a text corpus.
///
/// Usage: corpus_trainer --input <file.txt> --output <model.ron> --order <k>
use clap::Parser;
use std::path::PathBuf;
use std::process;

use mimic::core::corpus;
use mimic::core::markov::{save_model, MarkovTrainer};

#[derive(Parser, Debug)]
#[command(version, about = "Train a Markov transition model and save it as RON")]
struct Args {
    /// Corpus text file
    #[arg(long)]
    input: PathBuf,

    /// Where to write the RON model
    #[arg(long)]
    output: PathBuf,

    /// Markov order (words per lookup key)
    #[arg(long, default_value_t = 2)]
    order: usize,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let text = corpus::load_corpus_text(&args.input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!(
        "Training order-{} model from '{}'...",
        args.order,
        args.input.display()
    );
    let tokens = corpus::normalize(&text);
    let model = MarkovTrainer::train(&tokens, args.order).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!(
        "Model trained: {} tokens, {} unique keys, {} transitions",
        tokens.len(),
        model.len(),
        model.transition_count()
    );

    save_model(&model, &args.output).unwrap_or_else(|e| {
        eprintln!("Error saving model to '{}': {}", args.output.display(), e);
        process::exit(1);
    });

    println!("Model saved to '{}'", args.output.display());
}
