use criterion::{criterion_group, criterion_main, Criterion};
use engine::{DocumentStatus, SearchServer};

fn build_corpus() -> SearchServer {
    let words = [
        "curly", "cat", "tail", "nasty", "rat", "funny", "pet", "hair", "dog", "collar",
        "white", "yellow", "hat", "big", "eyes", "pigeon", "john", "fancy", "sparrow", "city",
    ];
    let mut server = SearchServer::new(["and", "with", "in"]).expect("valid stop words");
    for id in 0..2000 {
        let mut text = String::new();
        for k in 0..12 {
            if k > 0 {
                text.push(' ');
            }
            text.push_str(words[(id as usize * 7 + k * 3) % words.len()]);
        }
        server
            .add_document(id, &text, DocumentStatus::Actual, &[1, 2, 3])
            .expect("valid document");
    }
    server
}

fn bench_find_top_documents(c: &mut Criterion) {
    let server = build_corpus();
    let query = "curly nasty cat -pigeon";
    c.bench_function("find_top_documents_seq", |b| {
        b.iter(|| server.find_top_documents(query).expect("valid query"))
    });
    c.bench_function("find_top_documents_par", |b| {
        b.iter(|| server.par_find_top_documents(query).expect("valid query"))
    });
}

criterion_group!(benches, bench_find_top_documents);
criterion_main!(benches);
