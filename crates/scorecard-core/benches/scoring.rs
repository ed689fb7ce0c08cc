use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scorecard_core::model::{Exam, StudentInput};
use scorecard_core::scoring::{evaluate, scaled_score, section_scores};
use scorecard_core::setup::QuestionEdit;

fn keyed_exam(extra_sections: usize) -> Exam {
    let mut exam = Exam::default();
    for _ in 0..extra_sections {
        let id = exam.add_section();
        exam.resize_section(&id, 40).ok();
    }
    let ids: Vec<String> = exam.questions().iter().map(|q| q.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        let key = ["1", "2", "3", "4", "5"][i % 5];
        exam.update_question(id, QuestionEdit::CorrectAnswer(key.into()))
            .ok();
        exam.update_question(id, QuestionEdit::Category(format!("유형 {}", i % 7)))
            .ok();
    }
    exam
}

fn student_for(exam: &Exam) -> StudentInput {
    let mut student = StudentInput::new("bench");
    for (i, q) in exam.questions().iter().enumerate() {
        let answer = if i % 3 == 0 { "9" } else { q.correct_answer.as_str() };
        student.answers.insert(q.id.clone(), answer.to_string());
    }
    student
}

fn bench_scaled_score(c: &mut Criterion) {
    c.bench_function("scaled_score", |b| {
        b.iter(|| scaled_score(black_box(37.0), black_box(21.0), black_box(28.0)))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let exam = keyed_exam(0);
    let student = student_for(&exam);
    group.bench_function("default_50_questions", |b| {
        b.iter(|| evaluate(black_box(exam.sections()), black_box(exam.questions()), &student))
    });

    let large = keyed_exam(10);
    let large_student = student_for(&large);
    group.bench_function("12_sections_450_questions", |b| {
        b.iter(|| {
            evaluate(
                black_box(large.sections()),
                black_box(large.questions()),
                &large_student,
            )
        })
    });

    group.bench_function("section_scores_450_questions", |b| {
        b.iter(|| {
            section_scores(
                black_box(large.sections()),
                black_box(large.questions()),
                &large_student,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scaled_score, bench_evaluate);
criterion_main!(benches);
