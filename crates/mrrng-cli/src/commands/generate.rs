use std::time::Instant;

use log::info;
use mrrng_core::{
    DEFAULT_OUTPUT, DEFAULT_WORDS, Mrrng64, OsProbe, SystemProbe, generate_file, measure_stream,
};

pub struct GenerateConfig<'a> {
    pub output: &'a str,
    pub words: u64,
    pub seed: Option<u64>,
    pub report_entropy: bool,
}

impl Default for GenerateConfig<'_> {
    /// The reference run: 1 GiB to `RNG.dat`, then the entropy report.
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT,
            words: DEFAULT_WORDS,
            seed: None,
            report_entropy: true,
        }
    }
}

pub fn run(config: GenerateConfig<'_>) {
    let mut rng = Mrrng64::with_seed(config.seed.unwrap_or(0), OsProbe::new());
    if config.seed.is_some() {
        rng.init();
    }
    info!(
        "generating {} words to {} ({} probe)",
        config.words,
        config.output,
        rng.probe().backend()
    );

    println!("Starting random generation...");
    let start = Instant::now();

    let mut file = match generate_file(&mut rng, config.output, config.words) {
        Ok(file) => file,
        Err(e) => super::fail(&format!("writing {}", config.output), e),
    };

    println!("{:.6}", start.elapsed().as_secs_f64());

    if !config.report_entropy {
        return;
    }
    match measure_stream(&mut file) {
        Ok(report) => println!("{report}"),
        Err(e) => super::fail(&format!("reading back {}", config.output), e),
    }
}
