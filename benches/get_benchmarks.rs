//! Query engine performance benchmarks
//!
//! Plain timing runs over a synthetic catalog document:
//! - scalar lookup (zero-copy fast path)
//! - deep single-index descent
//! - filter scan over a long array
//! - element-span extraction

use std::time::Instant;

use sliq::{get, get_array_elements};

fn build_catalog(items: usize) -> Vec<u8> {
    let mut doc = String::from(r#"{"meta":{"version":3},"sku":["#);
    for n in 0..items {
        if n > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"id":{n},"name":"item-{n}","price":{},"tags":["a","b"]}}"#,
            (n * 7) % 400
        ));
    }
    doc.push_str("]}");
    doc.into_bytes()
}

fn main() {
    println!("sliq query benchmarks\n");

    let doc = build_catalog(1_000);
    println!("document: {} bytes, 1000 elements\n", doc.len());

    bench("scalar lookup ($.meta.version)", &doc, |d| {
        let v = get(d, "$.meta.version").expect("lookup");
        assert_eq!(v.as_ref(), b"3");
    });

    bench("indexed descent ($.sku[500].name)", &doc, |d| {
        let v = get(d, "$.sku[500].name").expect("lookup");
        assert_eq!(v.as_ref(), b"\"item-500\"");
    });

    bench("filter scan ($.sku[?(@.price > 350)].id)", &doc, |d| {
        let v = get(d, "$.sku[?(@.price > 350)].id").expect("filter");
        assert!(v.starts_with(b"["));
    });

    bench("element spans ($.sku)", &doc, |d| {
        let elems = get_array_elements(d, "$.sku", 1_000).expect("elements");
        assert_eq!(elems.len(), 1_000);
    });
}

fn bench(label: &str, doc: &[u8], run: impl Fn(&[u8])) {
    let iterations = 500;

    // warmup
    for _ in 0..10 {
        run(doc);
    }

    let start = Instant::now();
    for _ in 0..iterations {
        run(doc);
    }
    let elapsed = start.elapsed();

    let per_iter = elapsed / iterations;
    let mb_s = doc.len() as f64 * iterations as f64 / elapsed.as_secs_f64() / 1e6;
    println!("{label}\n  {per_iter:?}/query, {mb_s:.0} MB/s scanned\n");
}
