#![allow(clippy::expect_used, reason = "Fine in benchmarks")]
use std::{fmt::Write, hint::black_box};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use navdoc_transform::{NavDocTransformer, RawDocument};

/// Build a package page with `sections` `<h2>` blocks, each holding a few
/// `<h3>` entries and some prose.
fn package_page(sections: usize) -> String {
  let mut page = String::from("<!-- title Package bench -->\n");
  for section in 0..sections {
    writeln!(page, "<h2>Section {section}</h2>").expect("write to String");
    for item in 0..4 {
      writeln!(
        page,
        "<h3 id=\"T{section}.{item}\">func (t *T) Method{item}() error</h3>"
      )
      .expect("write to String");
      page.push_str("<p>Lorem ipsum dolor sit amet, consectetur.</p>\n");
      page.push_str("<pre>if err != nil {\n\treturn err\n}</pre>\n");
    }
  }
  page
}

fn bench_transform(c: &mut Criterion) {
  let transformer = NavDocTransformer::new();
  let mut group = c.benchmark_group("transform");

  for sections in [1, 16, 256] {
    let raw = RawDocument::from(package_page(sections).as_str());
    group.bench_with_input(
      BenchmarkId::from_parameter(sections),
      &raw,
      |b, raw| b.iter(|| transformer.transform(black_box(raw))),
    );
  }

  group.finish();
}

fn bench_nav_markup(c: &mut Criterion) {
  let result = NavDocTransformer::new()
    .transform(&RawDocument::from(package_page(64).as_str()));
  c.bench_function("nav_markup", |b| b.iter(|| black_box(&result).nav()));
}

criterion_group!(benches, bench_transform, bench_nav_markup);
criterion_main!(benches);
