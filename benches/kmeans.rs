#[path = "../util/util.rs"]
mod util;

use util::bench_images;

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use swatchbook::{
    Backend, ClusterCount, Clusterer, DominantColors, KmeansOptions, PixelSet,
};

const SEED: u64 = 0;

fn bench(
    c: &mut Criterion,
    group: &str,
    images: &[(String, PixelSet)],
    mut f: impl FnMut(&mut Bencher<WallTime>, &(ClusterCount, &PixelSet)),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(20)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (k, secs) in [(256, 6), (64, 4), (32, 3), (10, 2), (4, 2)] {
        let k = ClusterCount::new(k).unwrap();
        group.measurement_time(Duration::from_secs(secs));
        for (name, pixels) in images {
            group.bench_with_input(BenchmarkId::new(k.to_string(), name), &(k, pixels), &mut f);
        }
    }
}

fn bench_backend(c: &mut Criterion, group: &str, backend: Backend) {
    let clusterer = Clusterer::new(backend);
    let options = KmeansOptions::new().seed(SEED);
    bench(c, group, bench_images(), |b, &(k, pixels)| {
        b.iter(|| clusterer.cluster(pixels, k, &options).unwrap())
    })
}

fn kmeans_standard(c: &mut Criterion) {
    bench_backend(c, "kmeans_standard", Backend::Standard);
}

fn kmeans_accelerated(c: &mut Criterion) {
    bench_backend(c, "kmeans_accelerated", Backend::Accelerated);
}

fn records_probed(c: &mut Criterion) {
    let backend = Backend::probe();
    bench(c, "records_probed", bench_images(), |b, &(k, pixels)| {
        b.iter(|| {
            DominantColors::new(pixels, backend)
                .num_colors(k)
                .options(KmeansOptions::new().seed(SEED))
                .records()
                .unwrap()
        })
    })
}

criterion_group!(benches, kmeans_standard, kmeans_accelerated, records_probed);
criterion_main!(benches);
