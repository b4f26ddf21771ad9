// Prompt text for the Fit Summarizer.

/// Role framing and output instructions placed ahead of the job and resume text.
pub const FIT_SUMMARY_INSTRUCTIONS: &str = "\
You're a hiring assistant. Given a job description and a candidate's resume, \
write a brief, enthusiastic summary explaining why this person is a strong match for the role.

Be specific about:
- Relevant technical skills or experiences
- Impactful projects or roles
- Alignment with the job's responsibilities

Use 2-3 short paragraphs only. Be concise and persuasive.";

/// Builds the full summary prompt. `resume_excerpt` must already be truncated.
pub fn build_fit_summary_prompt(job_text: &str, resume_excerpt: &str) -> String {
    format!(
        "{FIT_SUMMARY_INSTRUCTIONS}\n\n\
         Job Description:\n{job}\n\n\
         Candidate Resume:\n{resume}\n\n\
         Summary:",
        job = job_text.trim(),
        resume = resume_excerpt.trim(),
    )
}
