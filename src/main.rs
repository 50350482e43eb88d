//! # chatmigrate CLI
//!
//! Command-line interface for the chatmigrate library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatmigrate::cli::Args;
use chatmigrate::core::{MigrationContext, migrate, write_import_dir};
use chatmigrate::parsers::{flowdock, slack};
use chatmigrate::MigrateError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<(), MigrateError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_logging(&args);

    let config = args.migration_config()?;

    // Print header
    println!("📦 chatmigrate v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Export:        {}", args.export_dir.display());
    println!("👥 Source users:  {}", args.source_users.display());
    println!("👥 Target users:  {}", args.target_users.display());
    println!("💾 Output:        {}", args.output.display());
    println!("✂️  Split at:      {} chars", config.max_message_chars);
    if !args.only.is_empty() {
        println!("🔍 Only:          {}", args.only.join(", "));
    }
    println!();

    // Step 1: Load
    println!("⏳ Loading export...");
    let load_start = Instant::now();
    let source_users = flowdock::parse_users(&args.source_users)?;
    let target_users = slack::parse_users(&args.target_users)?;
    let channels = args.select_channels(flowdock::load_export_dir(&args.export_dir)?);
    let source_user_count = source_users.len();
    println!(
        "   {} flows, {} source users, {} target users ({:.2}s)",
        channels.len(),
        source_user_count,
        target_users.len(),
        load_start.elapsed().as_secs_f64()
    );

    // Step 2: Migrate
    println!("🔀 Migrating...");
    let migrate_start = Instant::now();
    let ctx = MigrationContext::new(config, source_users, target_users)?;
    let report = migrate(&ctx, &channels)?;
    for export in &report.channels {
        println!(
            "   #{:<24} {:>6} events → {:>6} messages, {} threads",
            export.channel.name,
            export.stats.events_read,
            export.stats.messages_written,
            export.stats.threads
        );
    }
    println!("   Done in {:.2}s", migrate_start.elapsed().as_secs_f64());

    // Step 3: Write
    println!("💾 Writing import directory...");
    let write_start = Instant::now();
    let written = write_import_dir(&report, ctx.target_users(), &args.output)?;
    println!(
        "   {} day files in {:.2}s",
        written.day_files,
        write_start.elapsed().as_secs_f64()
    );

    println!();
    println!("✅ Done! Import saved to {}", args.output.display());

    // Summary
    let stats = &report.stats;
    println!();
    println!("📊 Summary:");
    println!("   Events:     {}", stats.events_read);
    println!("   Skipped:    {}", stats.skipped_events);
    println!("   Messages:   {}", stats.messages_written);
    println!("   Threads:    {}", stats.threads);
    println!("   Split:      {}", stats.split_messages);
    println!(
        "   Users:      {:.1}% resolved ({} unresolved)",
        stats.resolution_rate(source_user_count),
        stats.unresolved_users
    );
    if !report.warnings.is_empty() {
        println!("   Warnings:   {} (run with -v for details)", report.warnings.len());
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
