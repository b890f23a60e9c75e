// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;
use marlu::AzEl;

use mwa_lobe_finder::{
    catalog::{ProjectedCatalog, ProjectedSource},
    lobes::{lobe_subset, GrowthSettings, LobeFinder, LobeFinderSettings, LobeKind},
};

/// A dense cluster near zenith, a grating lobe and a sprinkling of sources
/// everywhere else.
fn synthetic_catalog(num_background: usize) -> ProjectedCatalog {
    let mut sources = vec![];
    let mut push = |azimuth: f64, radius: f64, flux: f64| {
        sources.push(ProjectedSource {
            ra: azimuth,
            dec: -0.47,
            flux,
            azimuth,
            radius,
            above_horizon: true,
        })
    };
    for i in 0..500 {
        let az = (i as f64 * 0.731).rem_euclid(std::f64::consts::TAU);
        push(az, 0.005 + 0.00015 * i as f64, 1.0);
    }
    for i in 0..200 {
        push(
            2.0 + (i % 20) as f64 * 0.004,
            0.7 + (i / 20) as f64 * 0.004,
            0.5,
        );
    }
    for i in 0..num_background {
        let az = (i as f64 * 2.399).rem_euclid(std::f64::consts::TAU);
        push(az, 0.3 + 0.6 * ((i * 7919) % 1000) as f64 / 1000.0, 0.05);
    }
    ProjectedCatalog::from_projected(sources)
}

fn growing_circle(c: &mut Criterion) {
    let catalog = synthetic_catalog(2000);
    let remaining: Vec<usize> = (0..catalog.len()).collect();
    let settings = GrowthSettings::default();

    c.bench_function("lobe_subset at zenith", |b| {
        b.iter(|| {
            lobe_subset(
                black_box(&catalog),
                black_box(&remaining),
                0.0,
                0.0,
                &settings,
                LobeKind::Primary,
            )
        })
    });
}

fn peel_lobes(c: &mut Criterion) {
    let mut group = c.benchmark_group("LobeFinder::run");
    for num_background in [1000, 10000] {
        let catalog = synthetic_catalog(num_background);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_background),
            &catalog,
            |b, catalog| {
                b.iter(|| {
                    LobeFinder::new(
                        black_box(catalog),
                        AzEl::from_degrees(0.0, 90.0),
                        LobeFinderSettings::default(),
                    )
                    .run()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, growing_circle, peel_lobes);
criterion_main!(benches);
