// Prompt templates for the job-description optimizer.

pub const OPTIMIZER_ROLE: &str = "You are a senior HR writer who specialises in inclusive, \
    precise job postings that attract qualified applicants.";

/// Template for rewriting a job description.
/// Placeholder: {job_description}
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Rewrite and optimize the job description below.

Goals:
- Clearer structure: role summary, responsibilities, requirements, nice-to-haves.
- Remove biased or exclusionary wording (gendered terms, age signals, unnecessary degree gates).
- Keep every concrete requirement, technology and location detail that is already there.
- Do not invent benefits, salary figures or company facts.

Job description:
{job_description}"#;
