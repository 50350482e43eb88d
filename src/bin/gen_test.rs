//! Synthetic export generator for stress testing chatmigrate.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [events-per-flow] [flows] [output-dir]
//! Example: cargo run --features gen-test --bin gen_test -- 50000 4 heavy_export
//!
//! Writes `<out>/users.json` (source), `<out>/slack_users.json` (target) and
//! `<out>/export/<flow>/messages.json`. About a third of the source users have
//! no target account, and the logs mix threads, comments, file shares,
//! reactions, skipped event kinds and messages far over the split threshold.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

use chatmigrate::Result;
use chatmigrate::core::output::write_json;

const NICKS: &[&str] = &[
    "alice", "bob", "Иван", "мария", "村上", "محمد", "dev_ops", "QA-Team", "🔥fire", "zed",
    "yuki", "o'brien",
];

const EMOJI: &[&str] = &["+1", "thumbsup", ":tada:", "eyes", "heart", "rocket", "🙂"];

const FLOWS: &[&str] = &["main", "dev", "Random Stuff", "ops-alerts", "design", "sales", "support"];

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let per_flow: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let flows: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3)
        .clamp(1, FLOWS.len());
    let output = args.get(3).map_or("heavy_export", String::as_str);

    println!("🧪 Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Events/flow: {}", per_flow);
    println!("   Flows:       {}", flows);
    println!("   Output:      {}", output);
    println!();

    let start = Instant::now();
    let out = Path::new(output);
    fs::create_dir_all(out.join("export"))?;

    let mut rng = rand::thread_rng();
    write_users(out)?;

    let mut total = 0;
    for flow in &FLOWS[..flows] {
        let events = generate_flow(&mut rng, per_flow);
        total += events.len();
        let dir = out.join("export").join(flow);
        fs::create_dir_all(&dir)?;
        write_json(&events, dir.join("messages.json"))?;
        eprintln!("   Generated {} ({} events)", flow, events.len());
    }

    let elapsed = start.elapsed();
    println!("\n✅ Done!");
    println!("   Events: {}", total);
    println!("   Time:   {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

fn write_users(out: &Path) -> Result<()> {
    let source: Vec<Value> = NICKS
        .iter()
        .enumerate()
        .map(|(i, nick)| {
            json!({
                "id": i + 1,
                "email": format!("user{}@example.com", i + 1),
                "nick": nick,
                "name": format!("{} Example - Contractor", nick),
            })
        })
        .collect();

    // Every third user has no target account.
    let target: Vec<Value> = NICKS
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 2)
        .map(|(i, nick)| {
            json!({
                "id": format!("U{:04}", i + 1),
                "name": nick,
                "profile": {
                    "email": format!("user{}@example.com", i + 1),
                    "real_name": format!("{} Example", nick),
                    "display_name": nick,
                },
            })
        })
        .collect();

    write_json(&source, out.join("users.json"))?;
    write_json(&target, out.join("slack_users.json"))?;
    Ok(())
}

fn generate_flow(rng: &mut impl Rng, count: usize) -> Vec<Value> {
    let mut sent: i64 = 1_585_000_000_000;
    let mut open_threads: Vec<String> = Vec::new();

    (0..count)
        .map(|i| {
            // Occasional identical send times exercise ts de-duplication.
            if rng.gen_ratio(9, 10) {
                sent += rng.gen_range(1..60_000);
            }
            let user = rng.gen_range(1..=NICKS.len() + 2);

            let thread_id = match rng.gen_range(0..4) {
                0 => None,
                1 if !open_threads.is_empty() => open_threads.choose(rng).cloned(),
                _ => {
                    let id = format!("thread-{i}");
                    open_threads.push(id.clone());
                    Some(id)
                }
            };

            let mut event = match i % 25 {
                0 => json!({"event": "file", "content": {
                    "file_name": format!("report-{i}.pdf"),
                    "content_type": "application/pdf",
                    "file_size": rng.gen_range(1..5_000_000),
                }}),
                1 | 2 => json!({"event": "comment", "content": {
                    "title": "Discussion",
                    "text": format!("@{} what do you think? #{i}", NICKS.choose(rng).unwrap_or(&"all")),
                }}),
                3 => json!({"event": "action", "content": {"type": "join"}}),
                4 => json!({"event": "message", "content": giant_message(rng, i)}),
                5 => json!({"event": "tag-change", "content": {"add": ["#release"]}}),
                _ => json!({"event": "message", "content": format!("Message #{i} for @@team")}),
            };

            event["id"] = json!(i + 1);
            event["user"] = json!(user.to_string());
            event["sent"] = json!(sent);
            if let Some(thread_id) = thread_id {
                event["thread_id"] = json!(thread_id);
            }
            if rng.gen_ratio(1, 5) {
                let emoji = EMOJI.choose(rng).unwrap_or(&"+1");
                let reactors: Vec<usize> = (0..rng.gen_range(1..5))
                    .map(|_| rng.gen_range(1..=NICKS.len() + 2))
                    .collect();
                event["emojiReactions"] = json!({ (*emoji): reactors });
            }
            event
        })
        .collect()
}

fn giant_message(rng: &mut impl Rng, index: usize) -> String {
    let words = rng.gen_range(8_000..20_000);
    let mut text = format!("Giant message #{index}:");
    for w in 0..words {
        text.push(if w % 40 == 0 { '\n' } else { ' ' });
        text.push_str(NICKS[w % NICKS.len()]);
    }
    text
}
