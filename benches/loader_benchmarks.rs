use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use plrailmap_tools::loader::load_str;
use std::fmt::Write;
use std::hint::black_box;

/// Generate a document with `stations` stations, each with two platforms,
/// two stop positions and a bus stop, all anchored to one rail line
fn generate_network(stations: usize) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<osm version=\"0.6\">\n");
    let mut node_id = 1u64;
    let mut anchored = Vec::new();

    for i in 0..stations {
        let lat = 50.0 + (i as f64) * 0.01;
        let lon = 20.0 + (i as f64) * 0.01;
        let code = 10_000 + i;

        let _ = write!(
            doc,
            "  <node id=\"{node_id}\" lat=\"{lat}\" lon=\"{lon}\">\n    <tag k=\"railway\" v=\"station\"/>\n    <tag k=\"name\" v=\"Station {i}\"/>\n    <tag k=\"ref\" v=\"{code}\"/>\n    <tag k=\"wheelchair\" v=\"yes\"/>\n  </node>\n"
        );
        anchored.push(node_id);
        node_id += 1;

        for (platform, direction) in [("1", "N"), ("2", "S")] {
            let _ = write!(
                doc,
                "  <node id=\"{node_id}\" lat=\"{lat}\" lon=\"{lon}\">\n    <tag k=\"public_transport\" v=\"platform\"/>\n    <tag k=\"name\" v=\"{platform}\"/>\n    <tag k=\"ref:station\" v=\"{code}\"/>\n    <tag k=\"direction\" v=\"{direction}\"/>\n  </node>\n"
            );
            node_id += 1;
        }

        for towards in ["fallback", ""] {
            let _ = write!(
                doc,
                "  <node id=\"{node_id}\" lat=\"{lat}\" lon=\"{lon}\">\n    <tag k=\"public_transport\" v=\"stop_position\"/>\n    <tag k=\"ref:station\" v=\"{code}\"/>\n    <tag k=\"towards\" v=\"{towards}\"/>\n    <tag k=\"platforms\" v=\"1;2\"/>\n  </node>\n"
            );
            anchored.push(node_id);
            node_id += 1;
        }

        let _ = write!(
            doc,
            "  <node id=\"{node_id}\" lat=\"{lat}\" lon=\"{lon}\">\n    <tag k=\"highway\" v=\"bus_stop\"/>\n    <tag k=\"ref:station\" v=\"{code}\"/>\n  </node>\n"
        );
        node_id += 1;
    }

    doc.push_str("  <way id=\"1\">\n");
    for id in anchored {
        let _ = writeln!(doc, "    <nd ref=\"{id}\"/>");
    }
    doc.push_str("    <tag k=\"railway\" v=\"rail\"/>\n  </way>\n</osm>\n");
    doc
}

fn bench_load_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_scalability");

    for &stations in &[100, 1_000, 5_000] {
        let document = generate_network(stations);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("stations", stations),
            &document,
            |b, document| {
                b.iter(|| {
                    let dataset = load_str(black_box(document)).expect("valid document");
                    black_box(dataset)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_load_scalability);
criterion_main!(benches);
