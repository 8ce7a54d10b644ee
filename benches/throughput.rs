use criterion::{criterion_group, criterion_main, Criterion};
use isoview::router::{PathRouter, PatternRouter};
use isoview::server::{Pipeline, ServerRequest};
use isoview::view::TemplateViews;
use isoview::ViewRouter;
use std::hint::black_box;
use std::sync::Arc;

const PATTERNS: [&str; 9] = [
    "/",
    "/zoo/animals",
    "/zoo/animals/:id",
    "/zoo/animals/{id}/toys/{toy_id}",
    "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id",
    "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id",
    "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i",
    "/zoo/health",
    "/assets/*",
];

fn bench_pattern_recognize(c: &mut Criterion) {
    let Ok(router) = PathRouter::new(PATTERNS) else {
        return;
    };
    c.bench_function("pattern_recognize", |b| {
        let test_paths = [
            "/zoo/animals/123",
            "/zoo/animals/123/toys/456",
            "/zoo/cats/animals/123/habitats/88/sections/5",
            "/inventory/1/feeds/2/items/3/batches/4",
            "/complex/1/2/3/4/5/6/7/8/9",
            "/assets/css/site.css?v=3",
            "/does/not/exist",
        ];
        b.iter(|| {
            for path in test_paths.iter() {
                black_box(router.recognize(path));
            }
        })
    });
}

fn bench_server_dispatch(c: &mut Criterion) {
    may::config().set_stack_size(0x8000);
    let Ok(views) = TemplateViews::from_sources([
        ("animals/show", "<p>{{ id }}</p>"),
        ("layout", "<html><body>{{ body }}</body></html>"),
    ]) else {
        return;
    };
    let Ok(router) = ViewRouter::server()
        .views(Arc::new(views))
        .routes(|r| {
            r.register("/zoo/animals/:id", |params, done| {
                done.render("animals/show", serde_json::json!({ "id": params.get("id") }));
            });
        })
        .build()
    else {
        return;
    };
    let router = Arc::new(router);
    let Ok(middleware) = router.middleware() else {
        return;
    };
    let pipeline = Pipeline::new().with(Arc::new(middleware));
    let req = ServerRequest::new(http::Method::GET, "/zoo/animals/123");

    c.bench_function("server_dispatch", |b| {
        b.iter(|| black_box(pipeline.handle(&req)))
    });
}

criterion_group!(benches, bench_pattern_recognize, bench_server_dispatch);
criterion_main!(benches);
