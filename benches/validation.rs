//! Benchmarks for schema parsing and document validation

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use yamlator::{parse_schema, YamlatorSchema};

const SCHEMA: &str = "schema {
    people list(Person) required
}

ruleset Person {
    name str required
    age int required
    role Role required
}

enum Role {
    ADMIN = \"admin\"
    USER = \"user\"
}
";

fn document(people: usize) -> serde_yaml::Value {
    let mut text = String::from("people:\n");
    for idx in 0..people {
        text.push_str(&format!(
            "  - name: person-{}\n    age: {}\n    role: user\n",
            idx,
            idx % 80
        ));
    }
    serde_yaml::from_str(&text).unwrap()
}

fn bench_parse_schema(c: &mut Criterion) {
    c.bench_function("parse_schema", |b| {
        b.iter(|| parse_schema(black_box(SCHEMA)).unwrap())
    });
}

fn bench_validate(c: &mut Criterion) {
    let schema = YamlatorSchema::from_string(SCHEMA).unwrap();
    let small = document(10);
    let large = document(1000);

    let mut group = c.benchmark_group("validate");
    group.bench_function("10_people", |b| {
        b.iter(|| schema.validate(black_box(&small)))
    });
    group.bench_function("1000_people", |b| {
        b.iter(|| schema.validate(black_box(&large)))
    });
    group.finish();
}

criterion_group!(benches, bench_parse_schema, bench_validate);
criterion_main!(benches);
