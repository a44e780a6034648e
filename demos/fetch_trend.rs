use chrono::Utc;
use temptrend::{TemptrendError, TrendService};

#[tokio::main]
async fn main() -> Result<(), TemptrendError> {
    env_logger::init();

    let mut service = TrendService::builder().station_id("kvarnberget").build()?;
    let report = service.fetch_trend(false, Utc::now()).await?;

    if let Some(warning) = &report.warning {
        println!("warning: {}", warning);
    }

    println!(
        "{} ({}): {} readings, cached={}",
        report.output.station.title,
        report.output.station.id,
        report.output.series.len(),
        report.cached,
    );
    if let Some(last) = report.output.smoothed.last() {
        println!(
            "smoothed trend at {} {}: {}\u{b0}C",
            last.date_label, last.time_label, last.temperature
        );
    }
    println!(
        "season: {:?} ({})",
        report.output.verdict.season, report.output.verdict.message
    );

    Ok(())
}
