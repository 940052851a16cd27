// LLM prompt constants for delegated scoring.

/// Role line for the scoring system prompt; combined with `JSON_ONLY_SYSTEM`.
pub const SCORING_ROLE: &str = "You are an expert recruiter scorer.";

/// Scoring prompt template. Replace `{job_description}` and `{resume_text}` before sending.
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Read the resume text and the job description below and score how well the candidate fits.

Return a JSON object with this EXACT schema (no extra fields):
{
  "base_score": 5,
  "skill_score": 6,
  "penalty": 0,
  "total_score": 11,
  "missing_skills": ["kubernetes"],
  "found_skills": ["python", "sql", "docker"]
}

Rules:
- All scores are integers.
- total_score = base_score + skill_score - penalty.
- found_skills lists skills the job asks for that the resume demonstrates.
- missing_skills lists skills the job asks for that the resume does not show.
- Skills are short lower-case tokens, each listed once.

Job description:
{job_description}

Resume text:
{resume_text}
"#;
