// benches/extract_bench.rs
//! Benchmarks for record conversion and the two page projections.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notion_context::api::parser::convert_block;
use notion_context::extract::{extract_image_urls, extract_text, join_fragments, ImagePolicy};
use notion_context::Block;
use serde_json::json;

fn sample_record(i: usize, text_length: usize) -> serde_json::Value {
    let text = "a".repeat(text_length);
    match i % 4 {
        0 => json!({
            "object": "block",
            "id": format!("00000000-0000-4000-8000-{:012}", i),
            "type": "paragraph",
            "paragraph": {
                "rich_text": [
                    { "type": "text", "text": { "content": text, "link": null }, "plain_text": text },
                    { "type": "text", "text": { "content": " tail", "link": null }, "plain_text": " tail" }
                ],
                "color": "default"
            }
        }),
        1 => json!({
            "object": "block",
            "id": format!("00000000-0000-4000-8000-{:012}", i),
            "type": "code",
            "code": {
                "rich_text": [{ "type": "text", "text": { "content": text } }],
                "language": "rust"
            }
        }),
        2 => json!({
            "object": "block",
            "id": format!("00000000-0000-4000-8000-{:012}", i),
            "type": "image",
            "image": {
                "type": "file",
                "file": { "url": format!("https://files.notion.so/{}.png", i), "expiry_time": null }
            }
        }),
        _ => json!({
            "object": "block",
            "id": format!("00000000-0000-4000-8000-{:012}", i),
            "type": "divider",
            "divider": {}
        }),
    }
}

fn sample_blocks(count: usize) -> Vec<Block> {
    (0..count).map(|i| convert_block(sample_record(i, 200))).collect()
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_block");
    for text_length in [10, 1_000, 10_000] {
        let record = sample_record(0, text_length);
        group.bench_with_input(
            BenchmarkId::from_parameter(text_length),
            &record,
            |b, record| b.iter(|| convert_block(black_box(record.clone()))),
        );
    }
    group.finish();
}

fn bench_projections(c: &mut Criterion) {
    let mut group = c.benchmark_group("projections");
    for count in [100, 1_000, 10_000] {
        let blocks = sample_blocks(count);
        group.bench_with_input(BenchmarkId::new("text", count), &blocks, |b, blocks| {
            b.iter(|| join_fragments(&extract_text(black_box(blocks))))
        });
        group.bench_with_input(BenchmarkId::new("images", count), &blocks, |b, blocks| {
            b.iter(|| extract_image_urls(black_box(blocks), ImagePolicy::NotionHostedOnly))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert, bench_projections);
criterion_main!(benches);
