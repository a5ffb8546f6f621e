//! Shared fixtures for integration tests

#![allow(dead_code)]

use polars::prelude::*;
use resume_scorer::utils::data_loader::save_csv;
use std::path::{Path, PathBuf};

/// Deterministic résumé rows. The score rises with experience and projects
/// and gets a bonus for Python skills.
pub fn resume_frame(n: usize) -> DataFrame {
    let skill_sets = [
        "Python, Machine Learning, SQL",
        "Java, Spring, SQL",
        "React, JavaScript",
        "Python, TensorFlow, NLP",
        "Cybersecurity, Networking",
    ];
    let degrees = ["B.Tech", "M.Tech", "MBA", "B.Sc", "PhD"];
    let certs = [Some("AWS Certified"), None, Some("Google ML"), Some("Deep Learning Specialization")];

    let mut skills = Vec::with_capacity(n);
    let mut experience = Vec::with_capacity(n);
    let mut education = Vec::with_capacity(n);
    let mut certifications = Vec::with_capacity(n);
    let mut projects = Vec::with_capacity(n);
    let mut salary = Vec::with_capacity(n);
    let mut score = Vec::with_capacity(n);

    for i in 0..n {
        let exp = (i % 10) as i64;
        let proj = (i % 7) as i64;
        let skill = skill_sets[i % skill_sets.len()];
        skills.push(skill);
        experience.push(exp);
        education.push(degrees[i % degrees.len()]);
        certifications.push(certs[i % certs.len()]);
        projects.push(proj);
        salary.push(40_000.0 + 1_000.0 * (i % 30) as f64);
        let bonus = if skill.contains("Python") { 10.0 } else { 0.0 };
        score.push(30.0 + 4.0 * exp as f64 + 3.0 * proj as f64 + bonus);
    }

    df!(
        "Skills" => &skills,
        "Experience (Years)" => &experience,
        "Education" => &education,
        "Certifications" => &certifications,
        "Projects Count" => &projects,
        "Salary Expectation ($)" => &salary,
        "AI Score (0-100)" => &score
    )
    .unwrap()
}

/// Write `resume_frame(n)` as CSV under `dir`
pub fn write_resume_csv(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("AI_Resume_Screening.csv");
    let mut df = resume_frame(n);
    df.with_column(Column::new(
        "Name".into(),
        (0..n).map(|i| format!("Candidate {}", i)).collect::<Vec<_>>(),
    ))
    .unwrap();
    save_csv(&mut df, &path).unwrap();
    path
}
