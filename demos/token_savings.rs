//! Batch token savings with the `serde_toon` encoder.
//!
//! Run with: cargo run --example token_savings

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::error::Error;
use toon_savings::{
    counter_or_fallback, BatchInput, BatchOptions, BatchRunner, Delimiter, EncodeOptions, Encoding,
    Format, FormatComparison, ItemStatus, PricingModel, Result, TextStats, TokenCounter,
    TokenReport, Value,
};

/// Encodes with `serde_toon`, mapping the crate's options onto its own.
fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    let delimiter = match options.delimiter {
        Delimiter::Comma => serde_toon::Delimiter::Comma,
        Delimiter::Tab => serde_toon::Delimiter::Tab,
        Delimiter::Pipe => serde_toon::Delimiter::Pipe,
    };
    let mut toon_options = serde_toon::ToonOptions::new()
        .with_indent(options.indent)
        .with_delimiter(delimiter);
    if let Some(marker) = options.length_marker {
        toon_options = toon_options.with_length_marker(marker);
    }
    serde_toon::to_string_with_options(value, toon_options).map_err(toon_savings::Error::encode)
}

const USERS: &str = r#"{
  "users": [
    { "id": 1, "name": "Alice Johnson", "email": "alice@example.com", "active": true },
    { "id": 2, "name": "Bob Smith", "email": "bob@example.com", "active": true },
    { "id": 3, "name": "Carol White", "email": "carol@example.com", "active": false }
  ],
  "total": 3,
  "page": 1
}"#;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let pricing = PricingModel::builtin()?;
    let counter = counter_or_fallback(Encoding::O200kBase);
    println!(
        "Pricing {} (effective {}), tokenizer {}\n",
        pricing.version(),
        pricing.effective(),
        counter.scheme()
    );

    println!("=== Formats ===");
    let formats = FormatComparison::build(USERS, &encode, &counter)?;
    let lowest = formats.lowest().map(|r| r.label);
    for rendering in formats.renderings() {
        let marker = if Some(rendering.label) == lowest { " (lowest)" } else { "" };
        match &rendering.output {
            Ok(_) => println!(
                "{:<5} {:>4} tokens {:>5.1}%{}",
                rendering.label,
                rendering.tokens(),
                formats.share_of_max(rendering.label).unwrap_or(0.0),
                marker
            ),
            Err(e) => println!("{:<5} n/a ({})", rendering.label, e),
        }
    }
    println!("{}\n", formats.compact_savings(pricing.default_rate()));

    println!("=== Report ===");
    let stats = TextStats::measure(USERS, &counter);
    let report = TokenReport::new(stats, &pricing, pricing.default_tier())?
        .compare_json(USERS, &encode, &counter);
    println!("{}\n", report);

    println!("=== Batch ===");
    let inputs = vec![
        BatchInput::new("users.json", USERS),
        BatchInput::new("broken.json", "{\"users\": [1, 2"),
        BatchInput::new("config.yaml", "service:\n  name: api\n  port: 8080\nreplicas: 3\n"),
        BatchInput::new("people.csv", "id,name,role\n1,Ann,admin\n2,Bo,user\n"),
    ];
    let options = BatchOptions::new()
        .with_extension("yaml")
        .with_extension("csv")
        .with_rate(pricing.default_rate());
    let runner = BatchRunner::new(&encode, &counter).with_options(options);

    let batch = runner.run(inputs, &mut |batch: &toon_savings::Batch, index: usize| {
        let item = &batch.items()[index];
        if item.status() == ItemStatus::Processing {
            return;
        }
        match item.reduction_percentage() {
            Some(pct) => println!(
                "  {:<12} {} ({:.1}% saved)",
                item.identifier,
                item.status(),
                pct
            ),
            None => println!(
                "  {:<12} {}: {}",
                item.identifier,
                item.status(),
                item.error_message().unwrap_or_default()
            ),
        }
    });

    let summary = batch.summary();
    println!("{}", summary);
    println!("Estimated savings: ${:.6}", summary.estimated_cost_savings);

    for output in batch.outputs() {
        println!("\n--- {} ---\n{}", output.name, output.output);
    }

    println!("\n=== YAML of the first file ===");
    let value = Format::Json.parse(USERS)?.into_value();
    print!("{}", Format::Yaml.serialize(&value)?);

    Ok(())
}
