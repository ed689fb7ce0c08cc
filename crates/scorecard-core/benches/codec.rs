use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scorecard_core::codec::{decode, encode_report};
use scorecard_core::lz::{compress_to_encoded_uri_component, decompress_from_encoded_uri_component};
use scorecard_core::model::{Exam, StudentInput};
use scorecard_core::setup::QuestionEdit;

fn filled() -> (Exam, StudentInput) {
    let mut exam = Exam::default();
    let mut student = StudentInput::new("김민지");
    let ids: Vec<String> = exam.questions().iter().map(|q| q.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        let key = ((i % 5) + 1).to_string();
        exam.update_question(id, QuestionEdit::CorrectAnswer(key.clone()))
            .ok();
        student.answers.insert(id.clone(), key);
    }
    (exam, student)
}

fn bench_lz(c: &mut Criterion) {
    let mut group = c.benchmark_group("lz");
    let text = "김민지~독해,28,0;문법,22,1~일반 독해,문장 형식~".repeat(20);
    let compressed = compress_to_encoded_uri_component(&text);

    group.bench_function("compress", |b| {
        b.iter(|| compress_to_encoded_uri_component(black_box(&text)))
    });
    group.bench_function("decompress", |b| {
        b.iter(|| decompress_from_encoded_uri_component(black_box(&compressed)))
    });
    group.finish();
}

fn bench_share_token(c: &mut Criterion) {
    let mut group = c.benchmark_group("share_token");
    let (exam, student) = filled();
    let token = encode_report(&exam, &student).unwrap_or_default();

    group.bench_function("encode_default_exam", |b| {
        b.iter(|| encode_report(black_box(&exam), black_box(&student)))
    });
    group.bench_function("decode_default_exam", |b| {
        b.iter(|| decode(black_box(&token)))
    });
    group.finish();
}

criterion_group!(benches, bench_lz, bench_share_token);
criterion_main!(benches);
