use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geo::{LineString, Point, Polygon};
use geoset::{Collection, Object};

fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Object {
    Object::from(Polygon::new(
        LineString::from(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ]),
        vec![],
    ))
}

fn populated(n: usize) -> Collection {
    let mut col = Collection::new();
    for i in 0..n {
        let x = (i % 100) as f64 * 0.01;
        let y = (i / 100) as f64 * 0.01;
        col.set(
            format!("pt:{i}"),
            Object::from(Point::new(x, y)),
            Some(&["speed"]),
            &[i as f64],
        )
        .unwrap();
    }
    col
}

fn benchmark_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");

    group.bench_function("set_point", |b| {
        let mut col = Collection::new();
        let mut counter = 0u64;
        b.iter(|| {
            let id = format!("pt:{counter}");
            counter += 1;
            col.set(
                black_box(id),
                Object::from(Point::new(0.001 * counter as f64, 0.0)),
                None,
                &[],
            )
            .unwrap()
        })
    });

    group.bench_function("set_string", |b| {
        let mut col = Collection::new();
        let mut counter = 0u64;
        b.iter(|| {
            let id = format!("str:{counter}");
            let value = format!("value:{counter}");
            counter += 1;
            col.set(black_box(id), Object::from(value), None, &[]).unwrap()
        })
    });

    group.bench_function("replace_point", |b| {
        let mut col = populated(1_000);
        let mut counter = 0u64;
        b.iter(|| {
            let id = format!("pt:{}", counter % 1_000);
            counter += 1;
            col.set(
                black_box(id),
                Object::from(Point::new(0.5, 0.5)),
                None,
                &[],
            )
            .unwrap()
        })
    });

    group.bench_function("set_field", |b| {
        let mut col = populated(1_000);
        let mut counter = 0u64;
        b.iter(|| {
            let id = format!("pt:{}", counter % 1_000);
            counter += 1;
            col.set_field(black_box(&id), "speed", counter as f64).unwrap()
        })
    });

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let col = populated(10_000);

    group.bench_function("get", |b| {
        b.iter(|| col.get(black_box("pt:5000")).unwrap())
    });

    group.bench_function("scan_all", |b| {
        b.iter(|| {
            let mut seen = 0usize;
            col.scan(false, None, None, |_, _, _| {
                seen += 1;
                true
            })
            .unwrap();
            black_box(seen)
        })
    });

    group.bench_function("within_small_rect", |b| {
        let query = square(0.2, 0.2, 0.3, 0.3);
        b.iter(|| {
            let mut seen = 0usize;
            col.within(black_box(&query), 0, None, None, |_, _, _| {
                seen += 1;
                true
            })
            .unwrap();
            black_box(seen)
        })
    });

    for sparse in [1u8, 4u8] {
        group.bench_with_input(
            BenchmarkId::new("intersects_sparse", sparse),
            &sparse,
            |b, &sparse| {
                let query = square(0.0, 0.0, 1.0, 1.0);
                b.iter(|| {
                    let mut seen = 0usize;
                    col.intersects(black_box(&query), sparse, None, None, |_, _, _| {
                        seen += 1;
                        true
                    })
                    .unwrap();
                    black_box(seen)
                })
            },
        );
    }

    group.bench_function("nearby_first_ten", |b| {
        let target = Object::from(Point::new(0.5, 0.5));
        b.iter(|| {
            let mut seen = 0usize;
            col.nearby(black_box(&target), None, None, |_, _, _| {
                seen += 1;
                seen < 10
            })
            .unwrap();
            black_box(seen)
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_mutations, benchmark_queries);
criterion_main!(benches);
