//! Show the effective (clamped) configuration.

use moodlens_analytics_core::chart_capacity;
use moodlens_common::config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load();
    let analysis = config.analysis.clone().clamped();

    println!("MoodLens configuration");
    println!("----------------------");
    println!("Capture interval:     {} ms", analysis.analysis_interval_ms);
    println!("Confidence threshold: {:.2}", analysis.confidence_threshold);
    println!("Chart time range:     {} s", analysis.time_range_seconds);
    println!(
        "Chart capacity:       {} points",
        chart_capacity(analysis.time_range_seconds, analysis.analysis_interval_ms)
    );
    println!("Insights enabled:     {}", analysis.show_insights);
    println!("History capacity:     {} samples", analysis.history_capacity);
    println!("Labels:               {}", analysis.labels.join(", "));
    println!("Log level:            {}", config.logging.level);

    Ok(())
}
