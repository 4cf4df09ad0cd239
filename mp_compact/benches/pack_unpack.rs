// benches/pack_unpack.rs

use std::collections::BTreeMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mp_compact::{Object, Packer, Unpacker, to_vec};

#[derive(Debug, Default, Clone)]
struct Point3D {
    x: f64,
    y: f64,
    z: f64,
    label: String,
}

fn point_object() -> Object<Point3D> {
    let mut o = Object::<Point3D>::new("Point3D");
    o.reg("x", |p| &p.x, |p| &mut p.x)
        .reg("y", |p| &p.y, |p| &mut p.y)
        .reg("z", |p| &p.z, |p| &mut p.z)
        .reg("label", |p| &p.label, |p| &mut p.label);
    o
}

fn create_points(size: usize) -> Vec<Point3D> {
    (0..size)
        .map(|i| Point3D {
            x: i as f64,
            y: (i * 2) as f64,
            z: (i * 3) as f64,
            label: format!("p{i}"),
        })
        .collect()
}

fn bench_integers(c: &mut Criterion) {
    let sizes = vec![100, 1_000, 10_000];

    let mut group = c.benchmark_group("integers");
    for size in sizes {
        let values: Vec<u64> = (0..size as u64).map(|i| i * i).collect();
        let bytes = to_vec(&values).unwrap();

        group.bench_with_input(BenchmarkId::new("pack", size), &size, |b, _| {
            let mut packer = Packer::with_capacity(bytes.len());
            b.iter(|| {
                packer.reset();
                packer.pack(black_box(&values)).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("unpack", size), &size, |b, _| {
            let mut target = Vec::<u64>::new();
            b.iter(|| {
                Unpacker::new(black_box(&bytes)).unpack(&mut target).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_binary_vs_array(c: &mut Criterion) {
    let sizes = vec![1_000, 100_000];

    let mut group = c.benchmark_group("binary_vs_array");
    for size in sizes {
        let bytes: Vec<u8> = (0..size).map(|i| i as u8).collect();
        let wide: Vec<u16> = bytes.iter().map(|&b| b as u16).collect();

        group.bench_with_input(BenchmarkId::new("u8_binary", size), &size, |b, _| {
            b.iter(|| to_vec(black_box(&bytes)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("u16_array", size), &size, |b, _| {
            b.iter(|| to_vec(black_box(&wide)).unwrap());
        });
    }
    group.finish();
}

fn bench_fixed_sink(c: &mut Criterion) {
    let values: Vec<i32> = (-500..500).collect();
    let len = to_vec(&values).unwrap().len();

    c.bench_function("fixed_sink_pack", |b| {
        let mut buf = vec![0u8; len];
        b.iter(|| {
            let mut packer = Packer::fixed(&mut buf);
            packer.pack(black_box(&values)).unwrap();
            packer.size()
        });
    });
}

fn bench_objects(c: &mut Criterion) {
    let sizes = vec![100, 1_000];
    let object = point_object();

    let mut group = c.benchmark_group("objects");
    for size in sizes {
        let points = create_points(size);

        group.bench_with_input(BenchmarkId::new("pack", size), &size, |b, _| {
            let mut packer = Packer::new();
            b.iter(|| {
                packer.reset();
                for p in &points {
                    object.pack(black_box(p), &mut packer).unwrap();
                }
            });
        });

        let mut packer = Packer::new();
        for p in &points {
            object.pack(p, &mut packer).unwrap();
        }
        let bytes = packer.into_vec();

        group.bench_with_input(BenchmarkId::new("unpack", size), &size, |b, _| {
            let mut target = Point3D::default();
            b.iter(|| {
                let mut u = Unpacker::new(black_box(&bytes));
                while !u.is_empty() {
                    object.unpack(&mut target, &mut u).unwrap();
                }
            });
        });
    }
    group.finish();
}

fn bench_maps(c: &mut Criterion) {
    let map: BTreeMap<String, u32> = (0..1_000).map(|i| (format!("key{i}"), i)).collect();
    let bytes = to_vec(&map).unwrap();

    c.bench_function("map_pack", |b| b.iter(|| to_vec(black_box(&map)).unwrap()));
    c.bench_function("map_unpack", |b| {
        b.iter(|| {
            let mut target = BTreeMap::<String, u32>::new();
            Unpacker::new(black_box(&bytes)).unpack(&mut target).unwrap();
            target
        })
    });
}

criterion_group!(
    benches,
    bench_integers,
    bench_binary_vs_array,
    bench_fixed_sink,
    bench_objects,
    bench_maps
);
criterion_main!(benches);
