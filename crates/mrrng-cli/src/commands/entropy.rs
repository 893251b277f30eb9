use mrrng_core::measure_file;

pub fn run(path: &str) {
    let report = match measure_file(path) {
        Ok(report) => report,
        Err(e) => super::fail(&format!("reading {path}"), e),
    };

    println!("{report}");
    println!(
        "  {} bytes, {}/256 distinct values, {:.4} / 8.0 bits",
        report.bytes, report.distinct, report.entropy
    );
}
