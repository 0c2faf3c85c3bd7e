use hog::app::{config_from_args, init_tracing, run_extraction};

fn main() -> anyhow::Result<()> {
    let cfg = config_from_args(std::env::args().skip(1))?;
    init_tracing(cfg.log_level.as_deref())?;

    let dump = run_extraction(cfg)?;
    println!("image {}x{} pixels", dump.height, dump.width);
    println!("hog: {} features", dump.features.len());
    println!(" - gradient: {:5.2} ms", dump.gradient_ms);
    println!(" - histogram: {:5.2} ms", dump.histogram_ms);
    println!(" - normalize: {:5.2} ms", dump.normalize_ms);

    Ok(())
}
