use criterion::{Criterion, criterion_group, criterion_main};
use std::path::Path;
use stylefit::{Algorithm, AssetStore, Measurements, Settings};

fn bench_predict_single(c: &mut Criterion) {
    let store = AssetStore::load(Settings::with_assets_dir(Path::new("assets")))
        .expect("artifacts in ./assets");
    let m = Measurements::new(70.0, 170.0, 25).unwrap();

    for alg in Algorithm::ALL {
        if !store.has_model(alg) {
            continue;
        }
        c.bench_function(&format!("predict 70kg/170cm/25y {}", alg.key()), |b| {
            b.iter(|| {
                let _ = store.predict(&m, alg);
            })
        });
    }
}

fn bench_bulk_prediction(c: &mut Criterion) {
    let store = AssetStore::load(Settings::with_assets_dir(Path::new("assets")))
        .expect("artifacts in ./assets");
    let rows: Vec<_> = (0..10_000)
        .map(|i| {
            Measurements::new(
                30.0 + (i % 121) as f64,
                100.0 + (i % 121) as f64,
                10 + (i % 91) as u32,
            )
            .unwrap()
        })
        .collect();
    let Ok(model) = store.model(Algorithm::RandomForest) else {
        return;
    };

    c.bench_function("bulk predict 10k rows random_forest", |b| {
        b.iter(|| {
            let _ =
                stylefit::pipeline::predict_sizes(store.scaler(), store.encoder(), model, &rows);
        });
    });
}

criterion_group!(benches, bench_predict_single, bench_bulk_prediction);
criterion_main!(benches);
