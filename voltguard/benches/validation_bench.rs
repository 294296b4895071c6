use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voltguard::catalog::builtin;
use voltguard::dimensioning::dimension;
use voltguard::prelude::*;
use voltguard::Equipment;

fn sample_request(rooms: usize) -> ValidationRequest {
    let mut request = ValidationRequest {
        installation_id: "bench".into(),
        postal_code: Some("75001".into()),
        number_of_people: Some(4),
        rooms: Vec::new(),
        include_dimensioning: true,
    };
    for i in 0..rooms {
        request.rooms.push(
            Room::new(format!("room-{i}"), RoomType::Bedroom, 11.0)
                .with_equipment(Equipment::new("lighting_point", 1))
                .with_equipment(Equipment::new("socket_outlet", 3)),
        );
    }
    request
}

fn bench_evaluate(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let engine = Engine::new();
    let request = sample_request(12);

    c.bench_function("evaluate_12_rooms", |b| {
        b.iter(|| runtime.block_on(engine.evaluate(black_box(&request))));
    });
}

fn bench_dimension(c: &mut Criterion) {
    let config = builtin::dimensioning_config();
    let request = sample_request(12);

    c.bench_function("dimension_12_rooms", |b| {
        b.iter(|| dimension(black_box(&request.rooms), black_box(&config)));
    });
}

criterion_group!(benches, bench_evaluate, bench_dimension);
criterion_main!(benches);
