//! Prints the commands, dialogue and string table of an MSE script.
//!
//! ```text
//! cargo run --example dump_script -- path/to/scene.mse
//! RUST_LOG=trace cargo run --example dump_script -- path/to/scene.mse
//! ```

use std::path::PathBuf;

use mse_script::{Document, FileStore};

fn preview(text: &str) -> String {
    let shown: String = text.chars().take(60).collect();
    if text.chars().count() > 60 {
        format!("\"{}...\"", shown)
    } else {
        format!("\"{}\"", shown)
    }
}

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: dump_script <script.mse>");
        std::process::exit(2);
    };
    println!("Reading: {}", path.display());

    let doc = match Document::load(&FileStore, &path) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };

    println!("\n=== Header ===");
    println!("Magic: {:#010x}", doc.magic);
    println!("Raw payload: {} bytes", doc.raw.len());
    println!("Editable texts: {}", doc.text_count());

    println!("\n=== Titles ({}) ===", doc.titles.len());
    for title in &doc.titles {
        println!("  [{:#08x}] {} {:?}", title.byte_offset, title.label, title.parameters);
    }

    println!("\n=== Content ({} blocks, end {:?}) ===", doc.blocks.len(), doc.scenario_end);
    for (i, block) in doc.blocks.iter().enumerate().take(20) {
        println!("[{}] {} @ {:#x}", i, preview(&block.title.display()), block.offset);
        for line in block.lines.iter().take(5) {
            println!("      {}", preview(&line.display()));
        }
        if block.lines.len() > 5 {
            println!("      ... and {} more lines", block.lines.len() - 5);
        }
    }
    if doc.blocks.len() > 20 {
        println!("... and {} more blocks", doc.blocks.len() - 20);
    }

    println!("\n=== String Table ({}) ===", doc.strings.len());
    for (i, s) in doc.strings.iter().enumerate().take(20) {
        println!("  {:4} {}", i, preview(&s.display()));
    }
}
