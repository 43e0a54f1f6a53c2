//! Synthetic channel export generator for trying chatharvest end to end.
//!
//! Writes a Telegram Desktop style `result.json` with posts, reply threads,
//! reactions, media markers and hostile text (control characters, zalgo,
//! giant posts).
//!
//! Usage: cargo run --features gen-export --bin gen_export -- [posts] [output] [start-date]
//! Example: cargo run --features gen-export --bin gen_export -- 5000 exports/news.json 2024-01-01

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

const ZALGO_CHARS: &[char] = &[
    '\u{0300}', '\u{0301}', '\u{0302}', '\u{0303}', '\u{0304}', '\u{0305}', '\u{0306}', '\u{0307}',
    '\u{0308}', '\u{0309}', '\u{030A}', '\u{030B}', '\u{030C}', '\u{030D}', '\u{030E}', '\u{030F}',
    '\u{0316}', '\u{0317}', '\u{0318}', '\u{0319}', '\u{0327}', '\u{0328}', '\u{0334}', '\u{0335}',
];

const REACTIONS: &[&str] = &["👍", "❤️", "🔥", "😂", "😱", "🤔", "👎", "🏳️‍🌈", "🇰🇿"];

/// Seconds between two consecutive posts.
const POST_SPACING: i64 = 900;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("exports/synthetic.json");
    let start_date = args.get(3).map(|s| s.as_str()).unwrap_or("2024-01-01");

    let start_ts = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("bad start date: {}", e)))?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();

    println!("🧪 Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Posts:  {}", count);
    println!("   Output: {}", output);
    println!("   Start:  {}", start_date);
    println!();

    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let started = std::time::Instant::now();
    let mut rng = rand::thread_rng();
    let mut messages = Vec::new();
    let mut next_id: u64 = 1;
    let mut reply_count = 0usize;

    for i in 0..count {
        let post_ts = start_ts + i as i64 * POST_SPACING;
        let post_id = next_id;
        next_id += 1;
        messages.push(post(&mut rng, post_id, post_ts, i));

        for r in 0..rng.gen_range(0..=4) {
            let reply_ts = post_ts + 30 * (r + 1);
            messages.push(reply(&mut rng, next_id, post_id, reply_ts, i));
            next_id += 1;
            reply_count += 1;
        }

        if i % 97 == 13 {
            messages.push(json!({
                "id": next_id,
                "type": "service",
                "date_unixtime": post_ts.to_string(),
                "action": "pin_message",
                "text": ""
            }));
            next_id += 1;
        }
    }

    let export = json!({
        "name": "Synthetic Channel",
        "type": "public_channel",
        "id": 1_000_000_001_u64,
        "messages": messages,
    });

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.flush()?;

    let size = fs::metadata(output)?.len() as f64 / 1_000_000.0;

    println!("✅ Done!");
    println!("   Replies: {}", reply_count);
    println!("   Size:    {:.2} MB", size);
    println!("   Time:    {:.2}s", started.elapsed().as_secs_f64());

    Ok(())
}

fn post(rng: &mut impl Rng, id: u64, ts: i64, index: u64) -> Value {
    let mut msg = json!({
        "id": id,
        "type": "message",
        "date_unixtime": ts.to_string(),
        "from": "Synthetic Channel",
        "text": post_text(rng, index),
    });

    if index % 7 == 0 {
        msg["photo"] = json!(format!("photos/photo_{}.jpg", id));
    }
    if index % 3 == 0 {
        msg["reactions"] = reactions(rng);
    }
    msg
}

fn reply(rng: &mut impl Rng, id: u64, parent: u64, ts: i64, index: u64) -> Value {
    let text = match index % 5 {
        0 => "It's 'quoted' and that's fine".to_string(),
        1 => format!("Agreed with #{}", parent),
        2 => "Bell\u{7} and null\u{0} inside".to_string(),
        3 => String::new(),
        _ => "Нормальный комментарий 👍".to_string(),
    };
    let mut msg = json!({
        "id": id,
        "type": "message",
        "date_unixtime": ts.to_string(),
        "from": "Commenter",
        "reply_to_message_id": parent,
        "text": text,
    });
    if rng.gen_bool(0.1) {
        msg["media_type"] = json!("sticker");
    }
    if rng.gen_bool(0.3) {
        msg["reactions"] = reactions(rng);
    }
    msg
}

fn reactions(rng: &mut impl Rng) -> Value {
    let amount = rng.gen_range(1..=3);
    let picked: Vec<Value> = REACTIONS
        .choose_multiple(rng, amount)
        .map(|emoji| json!({"type": "emoji", "count": rng.gen_range(1..500), "emoji": emoji}))
        .collect();
    Value::Array(picked)
}

fn post_text(rng: &mut impl Rng, index: u64) -> Value {
    match index % 12 {
        0..=4 => json!(format!("Regular post #{} about the news of the day", index)),
        5 => json!([
            "Read more: ",
            {"type": "link", "text": "https://example.com/story"},
            format!(" #{}", index)
        ]),
        6 => json!(format!("Control chars: \u{1}\u{2}\u{b}\u{c} #{}", index)),
        7 => json!(zalgo("Breaking news", rng)),
        8 => json!(format!("Giant post #{}: {}", index, "X".repeat(40_000))),
        9 => json!(format!("Mixed scripts: Hello Привет 你好 مرحبا #{}", index)),
        10 => json!(format!("Surrogate-adjacent \u{FFFE}\u{FFFF} chars #{}", index)),
        _ => json!(format!("Election update #{}", index)),
    }
}

fn zalgo(text: &str, rng: &mut impl Rng) -> String {
    let mut result = String::new();
    for c in text.chars() {
        result.push(c);
        for _ in 0..rng.gen_range(1..=6) {
            result.push(ZALGO_CHARS[rng.gen_range(0..ZALGO_CHARS.len())]);
        }
    }
    result
}
