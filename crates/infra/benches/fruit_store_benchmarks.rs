use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use fruitstore_core::ExpectedVersion;
use fruitstore_infra::{
    DocumentFruitRepository, DocumentStore, DocumentUpdate, FruitDocument, FruitRepository,
    FruitService, InMemoryDocumentStore,
};
use fruitstore_inventory::{FruitAmount, FruitName, InventoryPolicy};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn document(name: String, limit: i64) -> FruitDocument {
    FruitDocument {
        description: format!("this is a {name}"),
        name,
        limit,
    }
}

/// Store then remove one unit: two full read-check-write sequences.
fn bench_adjust_latency(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("adjust_latency");
    group.sample_size(1000);

    let repo = DocumentFruitRepository::new(InMemoryDocumentStore::with_documents([document(
        "lemon".to_string(),
        500,
    )]));
    let name = FruitName::create("lemon").unwrap();
    let one = FruitAmount::create(1).unwrap();

    group.bench_function("repository_store_remove", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(repo.store(&name, one).await.unwrap());
                black_box(repo.remove(&name, one).await.unwrap());
            })
        })
    });

    // Same writes straight against the document store: cost of locking,
    // validation and mapping.
    let raw = InMemoryDocumentStore::with_documents([document("lemon".to_string(), 500)]);
    group.bench_function("document_store_update", |b| {
        b.iter(|| {
            rt.block_on(async {
                let stored = raw.find_one("lemon").await.unwrap().unwrap();
                let next = stored.document.limit + 1;
                black_box(
                    raw.update_one(
                        "lemon",
                        DocumentUpdate::limit(next),
                        ExpectedVersion::Exact(stored.version),
                    )
                    .await
                    .unwrap(),
                );
                let stored = raw.find_one("lemon").await.unwrap().unwrap();
                raw.update_one(
                    "lemon",
                    DocumentUpdate::limit(next - 1),
                    ExpectedVersion::Exact(stored.version),
                )
                .await
                .unwrap();
            })
        })
    });

    group.finish();
}

fn bench_find_all(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("find_all");

    for size in [10usize, 100, 1_000].iter() {
        let repo = DocumentFruitRepository::new(InMemoryDocumentStore::with_documents(
            (0..*size).map(|i| document(format!("fruit-{i:05}"), (i % 10) as i64)),
        ));
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| rt.block_on(async { black_box(repo.find_all().await.unwrap()) }))
        });
    }

    group.finish();
}

fn bench_service_create_delete(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("service_lifecycle");

    let policy = InventoryPolicy::default();
    let svc = FruitService::new(DocumentFruitRepository::with_policy(
        InMemoryDocumentStore::new(),
        policy,
    ));

    group.bench_function("create_then_forced_delete", |b| {
        b.iter(|| {
            rt.block_on(async {
                svc.create("lemon", "this is a lemon", 10).await.unwrap();
                black_box(svc.delete("lemon", true).await.unwrap());
            })
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_adjust_latency,
    bench_find_all,
    bench_service_create_delete
);
criterion_main!(benches);
