use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use spamprep::features::{Stopwords, TfidfVectorizer};

fn fixture_dir(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("corpus")
        .join(name)
}

fn synthetic_documents(n: usize) -> Vec<String> {
    let words = [
        "meeting", "budget", "report", "free", "prize", "click", "offer", "lunch", "friday",
        "shipping", "invoice", "winner", "account", "schedule", "discount", "urgent",
    ];
    (0..n)
        .map(|i| {
            (0..40)
                .map(|j| words[(i * 7 + j * 3) % words.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_parse_fixture(c: &mut Criterion) {
    let path = fixture_dir("ham").join("002.eml");
    c.bench_function("parse_multipart_message", |b| {
        b.iter(|| spamprep::parser::parse_message(&path).unwrap())
    });
}

fn bench_normalize(c: &mut Criterion) {
    let text = "Re: FREE $$$ money!!! Click <here> to claim your prize, limited offer. ".repeat(50);
    c.bench_function("normalize_text", |b| {
        b.iter(|| spamprep::normalize::normalize_text(&text))
    });
}

fn bench_fit_transform(c: &mut Criterion) {
    let docs = synthetic_documents(1_000);
    c.bench_function("tfidf_fit_transform_1000", |b| {
        b.iter(|| {
            TfidfVectorizer::new()
                .with_max_features(100)
                .with_stop_words(Stopwords::english())
                .fit_transform(&docs)
                .unwrap()
        })
    });
}

fn bench_assemble_fixture(c: &mut Criterion) {
    let ham = fixture_dir("ham");
    let spam = fixture_dir("spam");
    c.bench_function("assemble_fixture_corpus", |b| {
        b.iter(|| {
            spamprep::corpus::assemble(
                &ham,
                &spam,
                spamprep::model::email::NormalizeMode::Labeled,
                None,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_parse_fixture,
    bench_normalize,
    bench_fit_transform,
    bench_assemble_fixture
);
criterion_main!(benches);
