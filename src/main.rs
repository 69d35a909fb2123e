//! Block Motion CLI
//!
//! Compares two frames of a planar YUV file (or a synthetic sequence),
//! estimates block motion between them and writes the diagnostic images.

use block_motion::{
    analysis::PairStatistics,
    config::FileConfig,
    metrics::{MetricsRegistry, MetricsSnapshot},
    motion::PairAnalyzer,
    output::{residual_magnitude, write_pgm, AnalysisReport},
    source::{ChromaFormat, FrameSource, SyntheticSource, YuvReader},
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "block-motion", version, about = "Block-matching motion estimation between two frames")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Planar YUV input file. A synthetic sequence is used when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Chroma layout (yuv420, yuv422, yuv444, mono).
    #[arg(long)]
    format: Option<ChromaFormat>,

    /// Index of the reference frame.
    #[arg(long)]
    reference: Option<u64>,

    /// Index of the current frame.
    #[arg(long)]
    current: Option<u64>,

    /// Block edge length in pixels.
    #[arg(short, long, allow_negative_numbers = true)]
    block_size: Option<i32>,

    /// Maximum displacement in each axis.
    #[arg(short, long, allow_negative_numbers = true)]
    search_radius: Option<i32>,

    /// Search blocks in parallel.
    #[arg(long)]
    parallel: bool,

    /// Directory for images and report.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print Prometheus metrics after the run.
    #[arg(long)]
    metrics: bool,
}

impl Cli {
    /// Loads the config file, if any, and applies flag overrides.
    fn into_config(self) -> Result<FileConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        let source = &mut config.source;
        if self.input.is_some() {
            source.path = self.input;
        }
        if let Some(width) = self.width {
            source.width = width;
        }
        if let Some(height) = self.height {
            source.height = height;
        }
        if let Some(format) = self.format {
            source.format = format;
        }
        if let Some(index) = self.reference {
            source.reference_index = index;
        }
        if let Some(index) = self.current {
            source.current_index = index;
        }

        let estimation = &mut config.estimation;
        if let Some(size) = self.block_size {
            estimation.block_size = size;
        }
        if let Some(radius) = self.search_radius {
            estimation.search_radius = radius;
        }
        estimation.parallel |= self.parallel;

        if self.output.is_some() {
            config.output.directory = self.output;
        }
        config.output.print_metrics |= self.metrics;

        config.validate()?;
        Ok(config)
    }
}

fn open_source(config: &FileConfig) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    let source = &config.source;
    match &source.path {
        Some(path) => Ok(Box::new(YuvReader::open(path, source.width, source.height, source.format)?)),
        None => {
            let synthetic = &source.synthetic;
            info!(
                "no input file, using synthetic sequence (seed {}, motion {},{})",
                synthetic.seed, synthetic.dy, synthetic.dx
            );
            Ok(Box::new(
                SyntheticSource::new(source.width, source.height, synthetic.seed)?
                    .with_motion(synthetic.dy, synthetic.dx)
                    .with_length(source.synthetic_length()),
            ))
        }
    }
}

fn run(config: FileConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = open_source(&config)?;
    let reference = source.frame_at(config.source.reference_index)?;
    let current = source.frame_at(config.source.current_index)?;

    let params = config.estimation.params();
    let analyzer = PairAnalyzer::new(params)?.with_parallelism(config.estimation.parallel);

    info!(
        "Estimating motion of frame {} against frame {} (block {}, radius {})",
        current.index(),
        reference.index(),
        params.block_size,
        params.search_radius
    );
    let analysis = analyzer.analyze(&current, &reference)?;
    let stats = PairStatistics::from_analysis(&analysis);

    info!(
        "{} blocks, {} non-zero vectors, mean magnitude {:.2}",
        stats.blocks, stats.nonzero_vectors, stats.mean_vector_magnitude
    );

    if let Some(dir) = &config.output.directory {
        std::fs::create_dir_all(dir)?;
        if config.output.write_images {
            write_pgm(dir.join("difference.pgm"), &analysis.difference)?;
            write_pgm(dir.join("residual.pgm"), &residual_magnitude(&analysis.residual))?;
            write_pgm(dir.join("compensated.pgm"), &analysis.compensated)?;
        }
        if config.output.write_report {
            AnalysisReport::new(&analysis, params).write(dir.join("report.toml"))?;
        }
        info!("Wrote output to {}", dir.display());
    }

    println!(
        "difference energy: {}  residual energy: {}  gain: {}",
        stats.difference.energy,
        stats.residual.energy,
        stats
            .gain
            .gain_db
            .map(|g| format!("{:.2} dB", g))
            .unwrap_or_else(|| "n/a".to_string())
    );

    if config.output.print_metrics {
        let registry = MetricsRegistry::new()?;
        registry.record(&MetricsSnapshot::from_statistics(&stats));
        print!("{}", registry.encode()?);
    }

    Ok(())
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Block Motion v{}", block_motion::VERSION);

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        eprintln!("Motion analysis failed: {}", e);
        std::process::exit(1);
    }
}
