use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xfer_summary::summary::{aggregate, Reporter};
use xfer_summary::trace::event::{Category, TransferEvent};
use xfer_summary::trace::parse::{parse_record, read_trace};

const RECORD: &str = r#"{"category":"mram_read","start_ns":123456789,"end_ns":123499999,"size":2048,"rank_path":"/dev/dpu_rank3"}"#;

fn build_events(n: u64) -> Vec<TransferEvent> {
    (0..n)
        .map(|i| {
            let size = 8u64 << (i % 12);
            let start = i * 10_000;
            let end = start + 500 + (i % 97) * 13;
            TransferEvent::new(start, end, size, format!("/dev/dpu_rank{}", i % 8))
        })
        .collect()
}

fn build_trace(n: u64) -> String {
    let mut trace = String::new();
    for i in 0..n {
        trace.push_str(&format!(
            "{{\"category\":\"wram_write\",\"start_ns\":{},\"end_ns\":{},\"size\":{},\"rank_path\":\"/dev/dpu_rank{}\"}}\n",
            i * 1_000,
            i * 1_000 + 250,
            64u64 << (i % 6),
            i % 4,
        ));
    }
    trace
}

fn bench_parse(c: &mut Criterion) {
    let trace = build_trace(10_000);

    c.bench_function("parse/record", |b| {
        b.iter(|| parse_record(black_box(RECORD), 1).expect("parse record"))
    });

    c.bench_function("parse/trace_10k_lines", |b| {
        b.iter(|| {
            let set = read_trace(black_box(trace.as_bytes())).expect("parse trace");
            black_box(set.len())
        })
    });
}

fn bench_summary(c: &mut Criterion) {
    let events = build_events(50_000);
    let descriptor = Category::MramRead.descriptor();
    let reporter = Reporter::plain();

    c.bench_function("summary/aggregate_50k_events", |b| {
        b.iter(|| {
            let report = aggregate(descriptor, black_box(&events));
            black_box(report.len())
        })
    });

    let report = aggregate(descriptor, &events);
    c.bench_function("summary/render", |b| {
        b.iter(|| {
            let lines = reporter.render_lines(black_box(&report));
            black_box(lines.len())
        })
    });
}

fn bench_suite(c: &mut Criterion) {
    bench_parse(c);
    bench_summary(c);
}

criterion_group!(benches, bench_suite);
criterion_main!(benches);
