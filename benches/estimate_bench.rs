use criterion::{black_box, criterion_group, criterion_main, Criterion};
use co2gain::emissions::{compute_emissions, CalculationInput, EmissionFactors};
use co2gain::gain::resolve_gain;
use co2gain::reference::defaults::default_table;
use co2gain::session::Session;

fn bench_estimate(c: &mut Criterion) {
    let table = default_table();
    let factors = EmissionFactors::default();
    let input = CalculationInput::new(
        "Maison individuelle",
        "Chaudière gaz standard",
        "PAC hybride gaz/électrique",
        20000.0,
    )
    .with_green_gas_share(30.0)
    .with_hybrid_split(60.0);

    c.bench_function("resolve_and_compute", |b| {
        b.iter(|| {
            let gain = resolve_gain(
                black_box(&table),
                &input.category,
                &input.before_solution,
                &input.after_solution,
                0.0,
            );
            compute_emissions(black_box(&input), gain, &factors)
        })
    });

    let session = Session::new();
    c.bench_function("session_estimate", |b| {
        b.iter(|| session.estimate(black_box(&input)))
    });
}

criterion_group!(benches, bench_estimate);
criterion_main!(benches);
