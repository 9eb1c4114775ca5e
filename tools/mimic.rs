/// Mimic — generate text that imitates the style of a training corpus.
///
/// Usage: mimic --input-file <corpus.txt> [--length <n>] [--seed-words "<words>"] [options]
///        mimic --model <model.ron> [--input-file <corpus.txt>] [options]
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process;

use mimic::analysis::sentiment::{self, Lexicon, SentimentScore};
use mimic::analysis::similarity::check_similarity;
use mimic::completion::{CompletionRequest, CompletionResponse};
use mimic::config::MimicConfig;
use mimic::core::corpus::load_corpus_text;
use mimic::core::markov::{load_model, Generation, MarkovTrainer, TransitionModel};
use mimic::core::pipeline::{generate_from_model, join};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate random phrases that imitate the literary style of a training corpus"
)]
struct Cli {
    /// Training corpus (.txt)
    #[arg(short, long)]
    input_file: Option<PathBuf>,

    /// Model saved by corpus_trainer; skips training and uses the model's order
    #[arg(long)]
    model: Option<PathBuf>,

    /// RON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markov order (words per lookup key)
    #[arg(short, long)]
    order: Option<usize>,

    /// Number of words to generate
    #[arg(short, long)]
    length: Option<usize>,

    /// Completion token limit (used when larger than --length)
    #[arg(short, long)]
    max_tokens: Option<u32>,

    /// Words to start the walk from; kept even when absent from the corpus
    #[arg(short, long)]
    seed_words: Option<String>,

    /// Seed the random generator for reproducible output
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Print the raw Markov result even when a completion response is given
    #[arg(short, long)]
    raw_markov: bool,

    /// Score how closely the output copies the corpus
    #[arg(long)]
    similarity_check: bool,

    #[arg(long)]
    similarity_threshold: Option<f32>,

    /// Words per sliding window in the similarity check
    #[arg(long)]
    similarity_window: Option<usize>,

    /// Number of completion responses to request
    #[arg(short, long)]
    number_of_responses: Option<u32>,

    /// Completion temperature (0.0..2.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Score sentiment of the corpus and the output
    #[arg(long)]
    sentiment: bool,

    /// Sentiment lexicon (RON map of word → (polarity, subjectivity))
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Print the completion request body as JSON
    #[arg(long)]
    print_request: bool,

    /// Saved completion response (JSON) to post-process instead of the raw output
    #[arg(long)]
    completion_response: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging completely
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = build_config(&cli);

    let input_path = cli
        .input_file
        .clone()
        .or_else(|| config.training_corpus.clone());
    if input_path.is_none() && cli.model.is_none() {
        fail("no training corpus: pass --input-file, --model, or set training_corpus in the config");
    }

    let corpus_text = input_path.as_deref().map(|path| {
        log::info!("using training corpus '{}'", path.display());
        load_corpus_text(path).unwrap_or_else(|e| fail(&e.to_string()))
    });

    let model = build_model(&cli, &config, corpus_text.as_deref());
    let generation = run_generation(&cli, &config, &model);
    let sentence = join(&generation.words);
    report_recoveries(&generation);

    let request = CompletionRequest::for_sentence(&config, &sentence);
    if cli.print_request || cli.verbose {
        let json = request
            .to_json_pretty()
            .unwrap_or_else(|e| fail(&e.to_string()));
        println!("[COMPLETION REQUEST]\n{}\n", json);
    }

    let corrected = cli.completion_response.as_deref().map(|path| {
        let body = std::fs::read_to_string(path).unwrap_or_else(|e| {
            fail(&format!("Error reading completion response '{}': {}", path.display(), e))
        });
        CompletionResponse::from_json(&body)
            .unwrap_or_else(|e| fail(&e.to_string()))
            .corrected_text(config.num_responses as usize)
    });

    if cli.raw_markov || corrected.is_none() {
        println!("[RAW MARKOV]\n'{}'\n", sentence);
    }
    if let Some(ref corrected) = corrected {
        println!("{}", corrected);
    }

    let final_text = corrected.as_deref().unwrap_or(&sentence);

    let corpus = input_path.as_deref().zip(corpus_text.as_deref());

    if cli.similarity_check {
        match corpus {
            Some((_, corpus_text)) => print_similarity(&config, corpus_text, final_text),
            None => log::warn!("similarity check skipped: no corpus text to compare against"),
        }
    }

    if cli.sentiment {
        match load_lexicon(&cli, &config) {
            Some(lexicon) => {
                if let Some((path, corpus_text)) = corpus {
                    let corpus_score = sentiment::analyze_by_sentence(corpus_text, &lexicon);
                    print_sentiment(&format!("The training corpus {}", path.display()), corpus_score);
                }
                let output_score = sentiment::analyze_by_sentence(final_text, &lexicon);
                print_sentiment("The output text", output_score);
            }
            None => log::warn!("sentiment analysis skipped: no lexicon configured"),
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Off
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();
}

/// Config file (or defaults) with command-line overrides applied.
fn build_config(cli: &Cli) -> MimicConfig {
    let mut config = match cli.config.as_deref() {
        Some(path) => MimicConfig::load_from_ron(path).unwrap_or_else(|e| {
            fail(&format!("Error loading config '{}': {}", path.display(), e))
        }),
        None => MimicConfig::default(),
    };

    if let Some(order) = cli.order {
        config.order = order;
    }
    if let Some(length) = cli.length {
        config.length = length;
    }
    if cli.max_tokens.is_some() {
        config.max_tokens = cli.max_tokens;
    }
    if let Some(threshold) = cli.similarity_threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(window) = cli.similarity_window {
        config.similarity_window = window;
    }
    if let Some(n) = cli.number_of_responses {
        config.num_responses = n;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }
    if cli.lexicon.is_some() {
        config.lexicon = cli.lexicon.clone();
    }

    config.validate().unwrap_or_else(|e| fail(&e.to_string()));
    config
}

/// Load the saved model when one is given, otherwise train on the corpus.
fn build_model(cli: &Cli, config: &MimicConfig, corpus_text: Option<&str>) -> TransitionModel {
    if let Some(path) = cli.model.as_deref() {
        let model = load_model(path).unwrap_or_else(|e| {
            fail(&format!("Error loading model '{}': {}", path.display(), e))
        });
        if let Some(order) = cli.order.filter(|&order| order != model.order()) {
            log::warn!(
                "ignoring --order {}: model '{}' has order {}",
                order,
                path.display(),
                model.order()
            );
        }
        log::info!("loaded order-{} model with {} keys", model.order(), model.len());
        return model;
    }

    let Some(corpus_text) = corpus_text else {
        fail("no training corpus to train on");
    };
    MarkovTrainer::train_text(corpus_text, config.order).unwrap_or_else(|e| fail(&e.to_string()))
}

fn run_generation(cli: &Cli, config: &MimicConfig, model: &TransitionModel) -> Generation {
    let seed = cli.seed_words.as_deref();
    match cli.rng_seed {
        Some(rng_seed) => generate_from_model(
            model,
            config.length,
            seed,
            &mut StdRng::seed_from_u64(rng_seed),
        ),
        None => generate_from_model(model, config.length, seed, &mut rand::thread_rng()),
    }
}

/// A seed that is not a key misses at step 0; later misses are the walk
/// drifting onto a window with no recorded successor.
fn report_recoveries(generation: &Generation) {
    let mut drifted = 0;
    for recovery in &generation.recoveries {
        if recovery.is_seed_miss() {
            println!(
                "[!] Seed words '{}' not found in the corpus; started from '{}' instead.",
                recovery.missing_key.join(" "),
                recovery.reseeded_with.join(" ")
            );
        } else {
            drifted += 1;
        }
    }
    if drifted > 0 {
        println!(
            "[!] The walk reached a sequence with no recorded successor and restarted {} time(s).",
            drifted
        );
    }
}

fn load_lexicon(cli: &Cli, config: &MimicConfig) -> Option<Lexicon> {
    let path: &Path = cli.lexicon.as_deref().or(config.lexicon.as_deref())?;
    match Lexicon::load_from_ron(path) {
        Ok(lexicon) => Some(lexicon),
        Err(e) => {
            log::error!("could not load lexicon '{}': {}", path.display(), e);
            None
        }
    }
}

fn print_similarity(config: &MimicConfig, corpus_text: &str, output: &str) {
    let report = check_similarity(
        corpus_text,
        output,
        config.similarity_window,
        config.similarity_threshold,
    );

    println!("[SIMILARITY ANALYSIS]");
    println!("    Window size: {} words", config.similarity_window);
    println!("    Similarity threshold: {}", config.similarity_threshold);
    println!("    Average similarity score: {:.2}", report.average);
    println!("    Highest similarity score: {:.2}", report.highest);

    if report.too_similar {
        println!("    Output is too similar to these phrases:");
        for phrase in &report.similar_phrases {
            println!("        {}", phrase);
        }
    } else {
        println!("    Output is adequately dissimilar.");
    }
}

fn print_sentiment(subject: &str, score: SentimentScore) {
    println!("[SENTIMENT ANALYSIS]");
    println!(
        "    {} is {} and {}.",
        subject,
        sentiment::interpret_polarity(score.polarity),
        sentiment::interpret_subjectivity(score.subjectivity)
    );
    println!("    Sentiment Polarity: {:>10.4}", score.polarity);
    println!("    Sentiment Subjectivity: {:.4}", score.subjectivity);
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
