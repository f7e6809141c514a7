use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rfreader::document::build_document;
use rfreader::navigation::{NavigationPolicy, NavigationRequest};
use rfreader::progress::normalized_progress;
use rfreader::{Entry, EntryId, ScrollGeometry};
use url::Url;

// Navigation decisions sit on the surface's hot path: every link click and
// subframe load goes through them.
fn bench_decide_navigation(c: &mut Criterion) {
    let policy = NavigationPolicy::new(Url::parse("file:///app/content/").unwrap());
    let requests = [
        NavigationRequest::main_frame("file:///app/content/index.html#section-4"),
        NavigationRequest::main_frame("https://example.com/articles/2024/some-long-slug?ref=feed"),
        NavigationRequest::subframe("https://www.youtube.com/embed/abc"),
        NavigationRequest::main_frame("about:blank"),
    ];

    c.bench_function("decide_navigation", |b| {
        b.iter(|| {
            for r in &requests {
                black_box(policy.decide(black_box(r)));
            }
        })
    });
}

fn bench_progress(c: &mut Criterion) {
    c.bench_function("normalized_progress", |b| {
        b.iter(|| normalized_progress(black_box(ScrollGeometry::new(742.0, 800.0, 12_000.0))))
    });
}

fn bench_build_document(c: &mut Criterion) {
    let body = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit.</p>".repeat(400);
    let entry = Entry::new(EntryId::new("bench"), "A fairly long article title")
        .with_url("https://example.com/a")
        .with_content(body);

    c.bench_function("build_document", |b| {
        b.iter(|| build_document(black_box(&entry), true))
    });
}

criterion_group!(benches, bench_decide_navigation, bench_progress, bench_build_document);
criterion_main!(benches);
