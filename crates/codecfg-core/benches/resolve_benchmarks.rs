use codecfg_core::{resolve_matrix, Resolver};
use codecfg_schema::{get_variant, BuiltinCatalog, Os, PlatformDescriptor};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_resolve(c: &mut Criterion) {
    let catalog = BuiltinCatalog::new();
    let resolver = Resolver::new(&catalog);
    let table = get_variant("v1").unwrap().parse().unwrap();
    let linux = PlatformDescriptor::new(Os::Linux);

    c.bench_function("resolve_v1_linux", |b| {
        b.iter(|| resolver.resolve_table(&table, &linux).unwrap());
    });
}

fn bench_parse_variant(c: &mut Criterion) {
    c.bench_function("parse_variant_v3", |b| {
        b.iter(|| get_variant("v3").unwrap().parse().unwrap());
    });
}

fn bench_matrix(c: &mut Criterion) {
    let catalog = BuiltinCatalog::new();
    let resolver = Resolver::new(&catalog);
    let table = get_variant("v1").unwrap().parse().unwrap();
    let platforms: Vec<_> = [Os::Windows, Os::Linux, Os::Macos, Os::Other]
        .into_iter()
        .map(PlatformDescriptor::new)
        .collect();

    c.bench_function("resolve_matrix_v1_4os", |b| {
        b.iter(|| resolve_matrix(&resolver, "ffmpeg", &platforms, &table.rules));
    });
}

criterion_group!(benches, bench_resolve, bench_parse_variant, bench_matrix);
criterion_main!(benches);
