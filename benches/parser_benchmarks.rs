use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use table_properties::{
    MapValueConverter, PropertiesParser, SeparatorDefaults, SegmentLexer, TableProperties,
};

/// Generate a flat properties line with the given number of segments
fn generate_flat_line(segments: usize) -> String {
    (0..segments)
        .map(|i| format!("key_{}= value {} ", i, i))
        .collect::<Vec<_>>()
        .join(",")
}

/// Generate a line whose single value nests groups to the given depth
fn generate_nested_line(depth: usize) -> String {
    let mut value = String::from("leaf=true");
    for i in 0..depth {
        value = format!("level_{}={{{}, sibling_{}=x\\, y}}", i, value, i);
    }
    format!("transformer=CUSTOM, tables={{{}}}", value)
}

/// Generate a line where every key carries a decorator chain
fn generate_decorated_line(segments: usize) -> String {
    (0..segments)
        .map(|i| format!("{{key_{}|uppercase|trim|lowercase}}=  Mixed Case {}  ", i, i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bench_segment_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_lexer");

    for size in [8, 64, 512] {
        let input = generate_flat_line(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("flat", size), &input, |b, input| {
            b.iter(|| SegmentLexer::new(black_box(input)).count())
        });
    }

    for depth in [2, 8, 32] {
        let input = generate_nested_line(depth);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("nested", depth), &input, |b, input| {
            b.iter(|| SegmentLexer::new(black_box(input)).count())
        });
    }

    group.finish();
}

fn bench_decorators(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorators");

    for size in [8, 64, 512] {
        let input = generate_decorated_line(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("chained", size), &input, |b, input| {
            b.iter(|| PropertiesParser::new(black_box(input)).collect_properties())
        });
    }

    group.finish();
}

fn bench_table_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_properties");
    let header = "ignorableSeparator=!--,headerSeparator=!,valueSeparator=!,\
                  commentSeparator=#,trim=false,metaByRow=true,transformer=CUSTOM_TRANSFORMER";
    let defaults = SeparatorDefaults::new("|", "|", "|--");

    group.bench_function("typical_header", |b| {
        b.iter(|| TableProperties::with_defaults(black_box(header), &defaults))
    });

    let mut converter = MapValueConverter::new();
    converter.insert("CUSTOM_TRANSFORMER", "FROM_LANDSCAPE");
    group.bench_function("typical_header_with_converter", |b| {
        b.iter(|| TableProperties::with_converter(black_box(header), &defaults, &converter))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_segment_lexer,
    bench_decorators,
    bench_table_properties
);
criterion_main!(benches);
