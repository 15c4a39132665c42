//! `tsrank` CLI: rank JSON documents against JSON queries.

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tsrank::{
    rank, rank_cd, CoverScanner, Error, Normalization, RankParams, TsQuery, TsVector, Weights,
};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about = "Postings ranking CLI", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Standard rank: term-weight aggregate score.
    Rank {
        /// Document postings file (JSON array of entries).
        #[arg(short, long)]
        vector: PathBuf,

        /// Query file (JSON postfix item array).
        #[arg(short, long)]
        query: PathBuf,

        /// Normalization bit-mask.
        #[arg(short, long, default_value_t = 0)]
        method: u32,

        /// Weight table as a flat JSON array `[w_D, w_C, w_B, w_A]`;
        /// negative entries fall back to the defaults.
        #[arg(short, long)]
        weights: Option<String>,
    },

    /// Cover-density rank: proximity score over minimal satisfying spans.
    RankCd {
        /// Document postings file (JSON array of entries).
        #[arg(short, long)]
        vector: PathBuf,

        /// Query file (JSON postfix item array).
        #[arg(short, long)]
        query: PathBuf,

        /// Normalization bit-mask.
        #[arg(short, long, default_value_t = 0)]
        method: u32,

        /// Weight table as a flat JSON array `[w_D, w_C, w_B, w_A]`.
        #[arg(short, long)]
        weights: Option<String>,
    },

    /// Dump the minimal covers the cover-density scan finds.
    Covers {
        /// Document postings file (JSON array of entries).
        #[arg(short, long)]
        vector: PathBuf,

        /// Query file (JSON postfix item array).
        #[arg(short, long)]
        query: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn load_vector(path: &PathBuf) -> Result<TsVector, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(feature = "cli")]
fn load_query(path: &PathBuf) -> Result<TsQuery, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Parse `--weights`: a flat JSON array whose elements are numbers or nulls.
#[cfg(feature = "cli")]
fn parse_weights(raw: Option<&str>) -> Result<Weights, Box<dyn std::error::Error>> {
    let Some(raw) = raw else {
        return Ok(Weights::default());
    };
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let serde_json::Value::Array(elements) = value else {
        return Err(Error::WeightArrayNotOneDimensional.to_string().into());
    };
    let mut nullable: Vec<Option<f32>> = Vec::with_capacity(elements.len());
    for element in &elements {
        match element {
            serde_json::Value::Null => nullable.push(None),
            serde_json::Value::Number(n) => nullable.push(n.as_f64().map(|f| f as f32)),
            _ => return Err(Error::WeightArrayNotOneDimensional.to_string().into()),
        }
    }
    Ok(Weights::try_from_nullable(&nullable).map_err(|e| e.to_string())?)
}

#[cfg(feature = "cli")]
fn params(weights: Option<&str>, method: u32) -> Result<RankParams, Box<dyn std::error::Error>> {
    Ok(RankParams {
        weights: parse_weights(weights)?,
        method: Normalization::from_bits_truncate(method),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "cli")]
    {
        let args = Args::parse();
        match args.command {
            Commands::Rank {
                vector,
                query,
                method,
                weights,
            } => {
                let t = load_vector(&vector)?;
                let q = load_query(&query)?;
                let score = rank(&t, &q, params(weights.as_deref(), method)?);
                println!("rank: {score:.6}");
            }
            Commands::RankCd {
                vector,
                query,
                method,
                weights,
            } => {
                let t = load_vector(&vector)?;
                let q = load_query(&query)?;
                let score = rank_cd(&t, &q, params(weights.as_deref(), method)?);
                println!("rank_cd: {score:.6}");
            }
            Commands::Covers { vector, query } => {
                let t = load_vector(&vector)?;
                let q = load_query(&query)?;
                let mut count = 0usize;
                if let Some(mut scanner) = CoverScanner::new(&t, &q) {
                    while let Some(cover) = scanner.next_cover() {
                        println!("cover: p={} q={} width={}", cover.p, cover.q, cover.width());
                        count += 1;
                    }
                }
                println!("ok: {count} covers");
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    println!("CLI feature is disabled. Build with --features cli to enable.");

    Ok(())
}
