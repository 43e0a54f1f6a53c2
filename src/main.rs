//! # chatharvest CLI
//!
//! Command-line interface for the chatharvest library.

use std::process;

use clap::Parser as ClapParser;

use chatharvest::HarvestError;
use chatharvest::cli::Args;
use chatharvest::harvest::Harvester;
use chatharvest::logging::init_tracing;
use chatharvest::progress::format_duration;
use chatharvest::source::ExportSource;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), HarvestError> {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.log_file.as_deref())?;

    let exports = args.exports.clone();
    let config = args.into_config()?;

    // Print header
    println!("📦 chatharvest v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Exports:  {}", exports.display());
    println!("📡 Channels: {}", config.channels.join(", "));
    println!(
        "📅 Window:   {} .. {}",
        config.filter.window.min.format("%Y-%m-%d"),
        config.filter.window.max.format("%Y-%m-%d")
    );
    if let Some(keyword) = config.filter.search() {
        println!("🔍 Search:   {}", keyword);
    }
    println!("🎯 Quota:    {} posts", config.max_messages);
    println!("⏱️  Budget:   {}", format_duration(config.time_limit));
    println!("📄 Format:   {}", config.format);
    println!("💾 Output:   {}", config.output_dir.display());
    println!();

    let source = ExportSource::new(exports);
    let harvester = Harvester::with_file_output(source, config);

    let report = harvester.run().await?;

    println!();
    println!("✅ Done! Output saved to {}", report.output.display());

    // Summary
    println!();
    println!("📊 Summary:");
    for channel in &report.channels {
        println!(
            "   {:<24} {:>6} posts  ({})",
            channel.channel, channel.records, channel.end
        );
    }
    for channel in &report.not_attempted {
        println!("   {:<24} {:>6}        (not attempted)", channel, "-");
    }
    println!("   Total:       {} posts", report.total());
    println!("   Checkpoints: {}", report.checkpoints.len());
    println!("   Stopped:     {}", report.stop);

    // Performance stats
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {}", format_duration(report.elapsed));

    Ok(())
}
