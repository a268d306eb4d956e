use anyhow::Result;
use rhier::{DataRecord, DatasetWriter, VirtualDatasetReader};
use std::env;
use tracing::info;

struct Config {
    depth: usize,
    max_fanout: usize,
    seed: u64,
    /// Leave the value out of every Nth record.
    drop_values_every: Option<usize>,
    output_file: Option<String>,
    use_brotli: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            depth: 3,
            max_fanout: 5,
            seed: 42,
            drop_values_every: None,
            output_file: None,
            use_brotli: false,
        }
    }
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => anyhow::bail!("{} requires an argument", flag),
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-depth" => {
                config.depth = next_value(&args, &mut i, "-depth")?.parse()?;
                if config.depth == 0 {
                    anyhow::bail!("-depth must be at least 1");
                }
            }
            "-fanout" => {
                config.max_fanout = next_value(&args, &mut i, "-fanout")?.parse()?;
                if config.max_fanout == 0 {
                    anyhow::bail!("-fanout must be at least 1");
                }
            }
            "-seed" => {
                config.seed = next_value(&args, &mut i, "-seed")?.parse()?;
            }
            "-sparse" => {
                config.drop_values_every = Some(next_value(&args, &mut i, "-sparse")?.parse()?);
            }
            "-o" | "-out" => {
                config.output_file = Some(next_value(&args, &mut i, "-out")?.to_string());
            }
            "-brotli" => {
                config.use_brotli = true;
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Warning: Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Hierarchical Dataset Generator");
    println!("Usage: hier-datagen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -depth <N>             Levels below the root (default: 3)");
    println!("  -fanout <N>            Maximum children per node (default: 5)");
    println!("  -seed <N>              Random seed (default: 42)");
    println!("  -sparse <N>            Leave the value out of every Nth record");
    println!("  -o, -out <FILE>        Output file path (default: dataset.jsonl)");
    println!("  -brotli                Write compressed output (default path: dataset.jsonl.br)");
    println!("  -h, -help, --help      Show this help message");
}

fn main() -> Result<()> {
    rhier::logging::init_logging();
    let config = parse_args()?;

    let output_path = config.output_file.clone().unwrap_or_else(|| {
        if config.use_brotli {
            "dataset.jsonl.br".to_string()
        } else {
            "dataset.jsonl".to_string()
        }
    });

    let reader = VirtualDatasetReader::with_config(config.depth, config.max_fanout, config.seed);
    let records = reader.generate();

    let mut writer = DatasetWriter::new(&output_path)?;
    writer.write_header(
        "1.0",
        serde_json::json!({
            "tool": "hier-datagen v0.1",
            "depth": config.depth,
            "max_fanout": config.max_fanout,
            "seed": config.seed,
        }),
    )?;

    for (index, record) in records.iter().enumerate() {
        let sparse = config
            .drop_values_every
            .map_or(false, |n| n > 0 && (index + 1) % n == 0);
        if sparse {
            writer.write_data_record(&DataRecord { value: None, ..record.clone() })?;
        } else {
            writer.write_data_record(record)?;
        }
    }

    writer.write_footer()?;
    writer.flush()?;

    info!(path = %output_path, records = writer.record_count(), "dataset written");
    println!("Dataset written to: {} ({} records)", output_path, writer.record_count());

    Ok(())
}
