use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cueform::{decode, encode, from_str, to_string, Sheet, Workbook};

/// Builds a form with `groups` groups of ten questions each, half of them
/// selecting from a shared list.
fn workbook(groups: usize) -> Workbook {
    let mut survey = Sheet::new();
    survey.push_row(
        ["type", "name", "label::English (en)", "label::French (fr)", "relevant"]
            .map(String::from)
            .to_vec(),
    );
    for g in 0..groups {
        survey.push_row(vec![
            "begin_group".to_string(),
            format!("group_{}", g),
            format!("Group {}", g),
            format!("Groupe {}", g),
            String::new(),
        ]);
        for q in 0..10 {
            let question_type = if q % 2 == 0 { "integer" } else { "select_one yes_no" };
            survey.push_row(vec![
                question_type.to_string(),
                format!("q_{}_{}", g, q),
                format!("Question {} of group {}", q, g),
                format!("Question {} du groupe {}", q, g),
                if q > 0 { format!("${{q_{}_0}} > 1", g) } else { String::new() },
            ]);
        }
        survey.push_row(vec!["end_group".to_string()]);
    }

    let mut choices = Sheet::new();
    for row in [
        ["list_name", "name", "label::English (en)", "label::French (fr)"],
        ["yes_no", "yes", "Yes", "Oui"],
        ["yes_no", "no", "No", "Non"],
    ] {
        choices.push_row(row.map(String::from).to_vec());
    }

    let mut workbook = Workbook::new();
    workbook.insert_sheet("survey", survey);
    workbook.insert_sheet("choices", choices);
    workbook
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for size in [1, 10, 100].iter() {
        let workbook = workbook(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &workbook, |b, workbook| {
            b.iter(|| decode(black_box(workbook)))
        });
    }
    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for size in [1, 10, 100].iter() {
        let document = decode(&workbook(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &document, |b, document| {
            b.iter(|| encode(black_box(document)))
        });
    }
    group.finish();
}

fn benchmark_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_text");
    let workbook = workbook(10);
    let text = to_string(&workbook).unwrap();

    group.bench_function("to_string", |b| b.iter(|| to_string(black_box(&workbook))));
    group.bench_function("from_str", |b| b.iter(|| from_str(black_box(&text))));
    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let workbook = workbook(10);
    c.bench_function("roundtrip", |b| {
        b.iter(|| {
            let text = to_string(black_box(&workbook)).unwrap();
            from_str(&text).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_encode,
    benchmark_text,
    benchmark_roundtrip
);
criterion_main!(benches);
