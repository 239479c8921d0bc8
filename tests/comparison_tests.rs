mod common;

use common::{CompactJson, Toon};
use toon_savings::{
    compare, compare_counts, counter_or_fallback, BatchInput, BatchOptions, BatchRunner,
    Comparator, Converter, EncodeOptions, Encoder, Encoding, Format, FormatComparison,
    NoopObserver, PricingModel, Rate, TextStats, TiktokenCounter, TokenCount, TokenCounter,
    TokenReport, WhitespaceCounter,
};

fn gpt5() -> Rate {
    PricingModel::builtin().unwrap().default_rate()
}

#[test]
fn test_thirteen_to_seven_tokens() {
    let result = compare_counts(TokenCount::new(13, 13), TokenCount::new(7, 7), gpt5());
    assert_eq!(result.baseline_tokens(), 13);
    assert_eq!(result.compact_tokens(), 7);
    assert_eq!(result.tokens_saved(), 6);
    assert_eq!(format!("{:.1}", result.reduction_percentage()), "46.2");
    assert!((result.estimated_cost_savings() - 6.0 * 1.25 / 1_000_000.0).abs() < 1e-15);
}

#[test]
fn test_both_empty() {
    let counter = TiktokenCounter::new(Encoding::O200kBase).unwrap();
    let result = compare(&counter, "", "", gpt5());
    assert_eq!(result.baseline_tokens(), 0);
    assert_eq!(result.compact_tokens(), 0);
    assert_eq!(result.tokens_saved(), 0);
    assert_eq!(result.reduction_percentage(), 0.0);
    assert_eq!(result.estimated_cost_savings(), 0.0);
}

#[test]
fn test_larger_compact_is_negative() {
    let counter = TiktokenCounter::new(Encoding::Cl100kBase).unwrap();

    let from_empty = compare(&counter, "", "x", gpt5());
    assert_eq!(from_empty.tokens_saved(), -1);
    assert!(from_empty.estimated_cost_savings() < 0.0);
    assert_eq!(from_empty.reduction_percentage(), 0.0);
    assert!(from_empty.reduction_percentage().is_finite());

    let grown = compare(&counter, "hello world", "Hello, world!", gpt5());
    assert_eq!(grown.tokens_saved(), -2);
    assert_eq!(grown.reduction_percentage(), -100.0);
}

#[test]
fn test_one_counter_for_both_sides() {
    let comparator = Comparator::new(counter_or_fallback(Encoding::Cl100kBase));
    let pretty = "{\n  \"id\": 1,\n  \"name\": \"Alice\"\n}";
    let result = comparator.compare(pretty, "id: 1\nname: Alice", gpt5());
    assert_eq!(result.baseline_tokens(), comparator.count(pretty).tokens);
    assert_eq!(
        result.tokens_saved(),
        comparator.count(pretty).tokens as i64
            - comparator.count("id: 1\nname: Alice").tokens as i64
    );
    assert_eq!(comparator.counter().scheme(), "cl100k_base");
}

#[test]
fn test_tier_rates_change_only_cost() {
    let pricing = PricingModel::builtin().unwrap();
    let comparator = Comparator::new(WhitespaceCounter);
    let baseline = "a b c d e f g h";
    let compact = "a b";

    let cheap = comparator
        .compare_with_tier(baseline, compact, &pricing, "openai-gpt5-nano")
        .unwrap();
    let dear = comparator
        .compare_with_tier(baseline, compact, &pricing, "openai-gpt4.1")
        .unwrap();
    assert_eq!(cheap.tokens_saved(), dear.tokens_saved());
    assert!(cheap.estimated_cost_savings() < dear.estimated_cost_savings());

    let table = pricing.cost_table(cheap.tokens_saved());
    assert_eq!(table.len(), 8);
    assert_eq!(table[0].tier, "openai-gpt5");
    assert!((table[0].cost - 6.0 * 1.25 / 1_000_000.0).abs() < 1e-15);
}

#[test]
fn test_converter_reports_savings() {
    let counter = WhitespaceCounter;
    let converter = Converter::new(&CompactJson, &counter, gpt5());

    let pretty = "{\n  \"id\": 1,\n  \"tags\": [\"a\", \"b\"]\n}";
    let encoded = converter.to_compact(Format::Json, pretty).unwrap();
    assert_eq!(encoded.output, r#"{"id":1,"tags":["a","b"]}"#);
    assert_eq!(encoded.comparison.baseline_tokens(), 7);
    assert_eq!(encoded.comparison.compact_tokens(), 1);

    let decoded = converter.from_compact(Format::Json, &encoded.output).unwrap();
    assert_eq!(decoded.output, "{\n  \"id\": 1,\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ]\n}");
    assert_eq!(decoded.comparison.compact_tokens(), 1);
    assert!(decoded.comparison.tokens_saved() > 0);
}

#[test]
fn test_playground_and_report_agree() {
    let json = r#"{"items": [{"sku": "A1", "qty": 2}, {"sku": "B2", "qty": 1}]}"#;
    let counter = WhitespaceCounter;

    let playground = FormatComparison::build(json, &CompactJson, &counter).unwrap();
    let savings = playground.compact_savings(gpt5());

    let pricing = PricingModel::builtin().unwrap();
    let report = TokenReport::new(TextStats::measure(json, &counter), &pricing, "openai-gpt5")
        .unwrap()
        .compare_json(json, &CompactJson, &counter);

    assert_eq!(report.comparison, Some(savings));
    assert_eq!(playground.lowest().map(|r| r.label), Some("TOON"));
}

#[test]
fn test_toon_codec_saves_tokens_on_a_flat_record() {
    let counter = TiktokenCounter::new(Encoding::O200kBase).unwrap();
    let value = Format::Json.parse(r#"{"a":1,"b":2}"#).unwrap().into_value();
    let toon = Toon.encode(&value, &EncodeOptions::default()).unwrap();
    assert_eq!(toon, "a: 1\nb: 2");

    let pretty = Format::Json.serialize(&value).unwrap();
    let result = compare(&counter, &pretty, &toon, gpt5());
    assert_eq!(
        result.tokens_saved(),
        counter.count(&pretty).tokens as i64 - counter.count(&toon).tokens as i64
    );
    assert!(result.tokens_saved() > 0);
    assert!(result.reduction_percentage() > 0.0);
    assert!(result.estimated_cost_savings() > 0.0);
}

#[test]
fn test_toon_codec_in_playground() {
    let json = r#"{
  "users": [
    { "id": 1, "name": "Alice", "role": "admin" },
    { "id": 2, "name": "Bob", "role": "user" }
  ]
}"#;
    let counter = TiktokenCounter::new(Encoding::O200kBase).unwrap();
    let playground = FormatComparison::build(json, &Toon, &counter).unwrap();

    let toon = playground.get("TOON").unwrap().output.as_deref().unwrap();
    assert!(toon.contains("[2]{"));
    assert!(toon.contains("1,Alice,admin"));
    assert!(playground.compact_savings(gpt5()).tokens_saved() > 0);
}

#[test]
fn test_csv_encodes_the_same_in_converter_and_batch() {
    let csv = "id,name\n1,Ann\n2,Bo\n";
    let counter = WhitespaceCounter;

    for encoder in [&Toon as &dyn Encoder, &CompactJson] {
        let converted = Converter::new(encoder, &counter, gpt5())
            .to_compact(Format::Csv, csv)
            .unwrap();

        let runner = BatchRunner::new(encoder, &counter)
            .with_options(BatchOptions::new().with_extension("csv"));
        let batch = runner.run(vec![BatchInput::new("people.csv", csv)], &mut NoopObserver);
        let item = &batch.items()[0];

        assert_eq!(item.output(), Some(converted.output.as_str()));
        assert_eq!(
            item.converted_tokens(),
            Some(converted.comparison.compact_tokens())
        );
    }
}
