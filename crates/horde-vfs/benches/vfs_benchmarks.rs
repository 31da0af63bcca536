//! Benchmarks for backend operations.
//!
//! Compares seeding and recursive listing across the in-memory and SQLite
//! backends for growing file counts.
//!
//! # Run Benchmarks
//!
//! ```bash
//! cargo bench --bench vfs_benchmarks
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use horde_vfs::{ListOptions, MemoryVfs, SqlVfs, Vfs, VfsBuilder, VfsPath};
use std::hint::black_box;

fn builder(file_count: usize) -> VfsBuilder {
    (0..file_count).fold(VfsBuilder::new(), |builder, i| {
        builder.add_file(
            format!("/users/user{}/prefs/file{i}.txt", i % 10),
            format!("preference value {i}"),
        )
    })
}

fn bench_populate(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate");
    for file_count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("memory", file_count), &file_count, |b, &n| {
            b.iter(|| builder(black_box(n)).build());
        });
        group.bench_with_input(BenchmarkId::new("sql", file_count), &file_count, |b, &n| {
            b.iter(|| {
                let Ok(mut vfs) = SqlVfs::open_in_memory() else {
                    return;
                };
                let _ = builder(black_box(n)).populate(&mut vfs);
            });
        });
    }
    group.finish();
}

fn bench_recursive_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_recursive");
    let options = ListOptions::everything();
    for file_count in [100, 500] {
        let Ok(memory) = builder(file_count).build() else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("memory", file_count), &memory, |b, vfs| {
            b.iter(|| vfs.list_folder(black_box(&VfsPath::root()), &options));
        });

        let Ok(mut sql) = SqlVfs::open_in_memory() else {
            continue;
        };
        if builder(file_count).populate(&mut sql).is_err() {
            continue;
        }
        group.bench_with_input(BenchmarkId::new("sql", file_count), &sql, |b, vfs| {
            b.iter(|| vfs.list_folder(black_box(&VfsPath::root()), &options));
        });
    }
    group.finish();
}

fn bench_memory_copy(c: &mut Criterion) {
    let Ok(seeded) = builder(100).build() else {
        return;
    };
    let (Ok(from), Ok(to)) = (VfsPath::new("/users"), VfsPath::new("/backup")) else {
        return;
    };
    c.bench_function("memory_copy_100", |b| {
        b.iter(|| {
            let mut vfs: MemoryVfs = seeded.clone();
            vfs.copy(black_box(&from), black_box(&to))
        });
    });
}

criterion_group!(benches, bench_populate, bench_recursive_listing, bench_memory_copy);
criterion_main!(benches);
