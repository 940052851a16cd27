//! Interview question generation from a candidate's skill gaps and strengths.

/// At most this many gap questions, taken from the front of `missing_skills`.
pub const MAX_GAP_QUESTIONS: usize = 5;
/// At most this many deep-dive questions, taken from the front of `found_skills`.
pub const MAX_STRENGTH_QUESTIONS: usize = 3;

/// Question always asked last.
pub const INCIDENT_QUESTION: &str =
    "Tell me about a time you dealt with a production issue or critical bug.";

/// Builds the question list: gap questions, then deep-dive questions, then
/// exactly two generic closers. Length is `min(missing, 5) + min(found, 3) + 2`.
pub fn generate_questions(
    missing_skills: &[String],
    found_skills: &[String],
    job_title: &str,
) -> Vec<String> {
    let gaps = missing_skills.iter().take(MAX_GAP_QUESTIONS).map(|skill| {
        format!(
            "Can you walk me through any experience you have with {skill}, \
             or how you would learn it quickly?"
        )
    });

    let strengths = found_skills
        .iter()
        .take(MAX_STRENGTH_QUESTIONS)
        .map(|skill| format!("Can you describe a project where you used {skill} end-to-end?"));

    gaps.chain(strengths)
        .chain([
            contribution_question(job_title),
            INCIDENT_QUESTION.to_string(),
        ])
        .collect()
}

fn contribution_question(job_title: &str) -> String {
    format!("What do you consider your strongest contribution as a {job_title} so far?")
}
