use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use weka_svm::io::load_dataset;
use weka_svm::metrics::{accuracy_percentage, balanced_classification_rate};
use weka_svm::{Dataset, ModelFactory, Row, WekaConfig};

/// Train a Weka SMO classifier on one CSV file and test it on another.
#[derive(Parser, Debug)]
#[command(name = "weka-svm", author, version, about)]
struct Cli {
    /// Headered CSV file with the training rows
    train_file: PathBuf,

    /// Headered CSV file with the test rows, same columns as the training file
    test_file: PathBuf,

    /// Column to predict
    #[arg(short, long)]
    response: String,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Java launcher
    #[arg(long)]
    java: Option<PathBuf>,

    /// Path to weka.jar
    #[arg(long, env = "WEKA_JAR")]
    weka_jar: Option<PathBuf>,

    /// Directory for ARFF, model and report files
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Remove generated files when done
    #[arg(long)]
    scratch: bool,

    /// SMO kernel specification passed to -K
    #[arg(short = 'K', long, conflicts_with = "linear")]
    kernel: Option<String>,

    /// Use Weka's default linear kernel
    #[arg(long)]
    linear: bool,

    /// Prefix for generated model file names
    #[arg(long, default_value = "")]
    name_prefix: String,

    /// Print the confusion matrix as JSON
    #[arg(long)]
    json: bool,

    /// Print the Weka commands without running them
    #[arg(long)]
    dry_run: bool,

    /// Quiet mode (no progress output)
    #[arg(short, long)]
    quiet: bool,

    /// Log every Weka command line
    #[arg(short, long)]
    verbose: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {}", message);
    process::exit(1);
}

fn resolve_config(cli: &Cli) -> WekaConfig {
    let mut config = match &cli.config {
        Some(path) => WekaConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => WekaConfig::default(),
    };
    if let Some(java) = &cli.java {
        config.java = java.clone();
    }
    if let Some(jar) = &cli.weka_jar {
        config.weka_jar = jar.clone();
    }
    if let Some(dir) = &cli.work_dir {
        config.work_dir = dir.clone();
    }
    if cli.scratch {
        config.keep_files = false;
    }
    if cli.linear {
        config.kernel = None;
    } else if let Some(kernel) = &cli.kernel {
        config.kernel = Some(kernel.clone());
    }
    config
}

fn load_or_exit(path: &Path) -> Dataset {
    load_dataset(path)
        .unwrap_or_else(|e| fail(format!("can't open input file {}: {}", path.display(), e)))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    if cli.quiet {
        weka_svm::set_quiet(true);
    }

    let config = resolve_config(&cli);
    let train = load_or_exit(&cli.train_file);
    let test = load_or_exit(&cli.test_file);

    if train.headers != test.headers {
        fail(format!(
            "column mismatch: {} has [{}], {} has [{}]",
            cli.train_file.display(),
            train.headers.join(","),
            cli.test_file.display(),
            test.headers.join(",")
        ));
    }

    let all: Vec<Row> = train.rows.iter().chain(test.rows.iter()).cloned().collect();
    let factory = ModelFactory::new(&all, &train.headers, &cli.response)
        .unwrap_or_else(|e| fail(e))
        .name_prefix(&cli.name_prefix)
        .config(config);

    if cli.dry_run {
        for command in factory.planned_commands() {
            println!("{}", command);
        }
        return;
    }

    let model = factory.build(&train.rows).unwrap_or_else(|e| fail(e));
    let matrix = model.test(&test.rows).unwrap_or_else(|e| fail(e));

    if cli.json {
        let text = serde_json::to_string_pretty(&matrix).unwrap_or_else(|e| fail(e));
        println!("{}", text);
        return;
    }

    print!("{}", matrix);
    println!(
        "Accuracy = {:.4}% ({}/{}) (classification)",
        accuracy_percentage(&matrix),
        matrix.correct(),
        matrix.total()
    );
    println!(
        "Balanced classification rate = {:.4}",
        balanced_classification_rate(&matrix)
    );
}
