use capi_param_builder::builder::request::RequestView;
use capi_param_builder::builder::ParamBuilder;
use capi_param_builder::token::appendix::{appendix_for_version, ChangeKind};
use capi_param_builder::token::codec::parse;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_token_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_codec");

    // Mix of shapes seen in real cookie jars
    let values = vec![
        "fb.1.1554763741205.IwAR2F4cEacTkkLSeQbBDhZbwMKSsKDtI",
        "fb.1.1554763741205.IwAR2F4cEacTkkLSeQbBDhZbwMKSsKDtI.AQgCAQAB",
        "fb.2.1554763741205.987654321.Bg",
        "fb.1.123.abc.invalid",
        "not a token at all",
    ];

    group.bench_function("parse_1000_mixed_values", |b| {
        b.iter(|| {
            for _ in 0..200 {
                for value in &values {
                    black_box(parse(value).ok());
                }
            }
        });
    });

    group.bench_function("pack_appendix", |b| {
        b.iter(|| {
            black_box(appendix_for_version("1.15.24", ChangeKind::NetNew).ok());
        });
    });

    group.finish();
}

fn bench_process_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_request");

    // Steady state: valid cookies come back, same click id, nothing
    // to write. This is the per-request hot path of a deployed site.
    let mut builder = ParamBuilder::with_domain_list(["example.com"]);
    let warmup = RequestView::new("shop.example.com").query_param("fbclid", "IwAR2F4cEacT");
    let writes = builder.process_request(&warmup);
    let mut steady = RequestView::new("shop.example.com").query_param("fbclid", "IwAR2F4cEacT");
    for write in &writes {
        steady = steady.cookie(write.name.clone(), write.value.clone());
    }

    group.bench_function("steady_state", |b| {
        b.iter(|| {
            black_box(builder.process_request(&steady));
        });
    });

    group.bench_function("first_visit", |b| {
        let mut fresh = ParamBuilder::with_domain_list(["example.com"]);
        let request = RequestView::new("shop.example.com").query_param("fbclid", "IwAR2F4cEacT");
        b.iter(|| {
            black_box(fresh.process_request(&request));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_token_codec, bench_process_request);
criterion_main!(benches);
