use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use geofeedcheck::engine::{Config, Engine};
use geofeedcheck::network::GeoNetwork;
use geofeedcheck::overlap::{find_overlaps, AccumulatedNetwork};

// Generate a synthetic feed with valid, disjoint IPv4 /24s
fn generate_v4_feed(count: usize) -> String {
    let mut feed = String::from("# synthetic feed\n");
    for i in 0..count {
        feed.push_str(&format!(
            "10.{}.{}.0/24,US,US-NY,New York\n",
            (i / 256) % 256,
            i % 256
        ));
    }
    feed
}

// Generate a mixed feed, one IPv6 /48 for every IPv4 /24
fn generate_mixed_feed(count: usize) -> String {
    let mut feed = String::new();
    for i in 0..count {
        if i % 2 == 0 {
            feed.push_str(&format!("10.{}.{}.0/24,US\n", (i / 256) % 256, i % 256));
        } else {
            feed.push_str(&format!("2001:db8:{:x}::/48,SE\n", i % 65536));
        }
    }
    feed
}

// Benchmark CIDR canonicalization alone
fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    group.bench_function("v4", |b| {
        b.iter(|| GeoNetwork::parse(black_box("192.0.2.0/24")).unwrap());
    });

    group.bench_function("v6", |b| {
        b.iter(|| GeoNetwork::parse(black_box("2001:db8::/32")).unwrap());
    });

    group.bench_function("reject_host_bits", |b| {
        b.iter(|| GeoNetwork::parse(black_box("192.0.2.1/24")).unwrap_err());
    });

    group.finish();
}

// Benchmark a full validation run over a realistic feed
fn bench_validate_feed(c: &mut Criterion) {
    let feed = generate_mixed_feed(1000);
    let mut group = c.benchmark_group("validate_feed");
    group.throughput(Throughput::Bytes(feed.len() as u64));

    group.bench_function("mixed_1000", |b| {
        b.iter(|| {
            let lines = feed.lines().map(|l| Ok(l.to_string()));
            let report = Engine::new(Config::default())
                .validate_lines(black_box(lines))
                .unwrap();
            black_box(report);
        });
    });

    let no_overlap = Config {
        overlap_check_enabled: false,
        ..Config::default()
    };
    group.bench_function("mixed_1000_no_overlap", |b| {
        b.iter(|| {
            let lines = feed.lines().map(|l| Ok(l.to_string()));
            let report = Engine::new(no_overlap.clone())
                .validate_lines(black_box(lines))
                .unwrap();
            black_box(report);
        });
    });

    group.finish();
}

// Benchmark the sorted adjacent-pair overlap scan in isolation
fn bench_overlap_scan(c: &mut Criterion) {
    let feed = generate_v4_feed(1000);
    let networks: Vec<AccumulatedNetwork> = feed
        .lines()
        .skip(1)
        .enumerate()
        .map(|(i, line)| AccumulatedNetwork {
            net: GeoNetwork::parse(line.split(',').next().unwrap()).unwrap(),
            line_number: i + 2,
            raw_text: line.to_string(),
        })
        .collect();

    let mut group = c.benchmark_group("overlap_scan");
    group.throughput(Throughput::Elements(networks.len() as u64));

    group.bench_function("disjoint_1000", |b| {
        b.iter(|| {
            let warnings = find_overlaps(black_box(&networks));
            black_box(warnings);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_canonicalize,
    bench_validate_feed,
    bench_overlap_scan
);
criterion_main!(benches);
