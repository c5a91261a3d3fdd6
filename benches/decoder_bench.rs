// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kalamari_xhr::dom::HtmlDocumentParser;
use kalamari_xhr::xhr::ResponseDecoder;
use kalamari_xhr::ResponseType;

fn text_decoding_benchmark(c: &mut Criterion) {
    let parser = HtmlDocumentParser::new();
    let decoder = ResponseDecoder::new(&parser);
    let utf8 = Bytes::from("caf\u{e9} ".repeat(4096));
    let latin1 = Bytes::from(b"caf\xe9 ".repeat(4096));

    c.bench_function("decode_text_utf8", |b| {
        b.iter(|| {
            decoder.decode(
                black_box(utf8.clone()),
                ResponseType::Text,
                Some("text/plain; charset=utf-8"),
                None,
            )
        })
    });

    c.bench_function("decode_text_latin1", |b| {
        b.iter(|| {
            decoder.decode(
                black_box(latin1.clone()),
                ResponseType::Text,
                Some("text/plain; charset=iso-8859-1"),
                None,
            )
        })
    });
}

fn structured_decoding_benchmark(c: &mut Criterion) {
    let parser = HtmlDocumentParser::new();
    let decoder = ResponseDecoder::new(&parser);

    let items: Vec<String> = (0..500)
        .map(|i| format!(r#"{{"id":{},"name":"item {}","tags":["a","b"]}}"#, i, i))
        .collect();
    let json = Bytes::from(format!("[{}]", items.join(",")));

    let rows: String = (0..500)
        .map(|i| format!("<row id=\"{}\"><name>item {}</name></row>", i, i))
        .collect();
    let xml = Bytes::from(format!("<rows>{}</rows>", rows));

    c.bench_function("decode_json", |b| {
        b.iter(|| decoder.decode(black_box(json.clone()), ResponseType::Json, None, None))
    });

    c.bench_function("decode_document", |b| {
        b.iter(|| {
            decoder.decode(
                black_box(xml.clone()),
                ResponseType::Document,
                Some("text/xml"),
                None,
            )
        })
    });
}

criterion_group!(benches, text_decoding_benchmark, structured_decoding_benchmark);
criterion_main!(benches);
