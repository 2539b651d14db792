//! Benchmarks for richblocks conversion performance.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use richblocks::{HtmlParser, ParseOptions};

/// Editor-style HTML with the given number of paragraphs and lists.
fn create_test_html(sections: usize) -> String {
    let mut html = String::new();
    for i in 0..sections {
        html.push_str(&format!(
            "<p>Section {} with <b>bold</b>, <i>italic</i> and \
             <a href=\"https://example.com/{}\">a <u>link</u></a>.</p>",
            i, i
        ));
        html.push_str(
            "<ul><li>first <code>item</code></li>\
             <li><span style=\"color: rgb(230, 0, 0);\">red</span> item</li>\
             <li><s>struck</s> item</li></ul>",
        );
    }
    html
}

/// Benchmark parsing at various sizes.
fn bench_html_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_parsing");
    let parser = HtmlParser::new();

    for sections in [1, 10, 100].iter() {
        let html = create_test_html(*sections);

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| parser.parse(black_box(&html)));
        });
    }

    group.finish();
}

/// Benchmark the full HTML to wire JSON path.
fn bench_wire_json(c: &mut Criterion) {
    let html = create_test_html(20);

    c.bench_function("wire_json_20_sections", |b| {
        b.iter(|| richblocks::to_json(black_box(&html), richblocks::JsonFormat::Compact).unwrap());
    });
}

/// Benchmark batch conversion, sequential against parallel.
fn bench_parse_many(c: &mut Criterion) {
    let documents: Vec<String> = (0..32).map(|_| create_test_html(5)).collect();
    let mut group = c.benchmark_group("parse_many");

    let parallel = HtmlParser::new();
    group.bench_function("parallel", |b| {
        b.iter(|| parallel.parse_many(black_box(&documents)));
    });

    let sequential = HtmlParser::with_options(ParseOptions::new().sequential());
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.parse_many(black_box(&documents)));
    });

    group.finish();
}

criterion_group!(benches, bench_html_parsing, bench_wire_json, bench_parse_many);
criterion_main!(benches);
