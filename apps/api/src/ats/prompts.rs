// Instruction templates for the ATS analyzer.
// Reuses the structured-block fragment from llm_client::prompts.

use crate::llm_client::prompts::STRUCTURED_BLOCK_INSTRUCTION;

/// Qualitative hire / no-hire review of a resume against a job description.
pub const EVALUATION_INSTRUCTION: &str = "You are an experienced Technical Human Resource Manager. \
    Your task is to review the provided resume against the job description. \
    Please share your professional evaluation on whether the candidate's profile aligns with the role. \
    Highlight the strengths and weaknesses of the applicant in relation to the specified job requirements.";

/// ATS scoring instruction. Replace `{structured_block_instruction}` before sending.
pub const ATS_SCORE_TEMPLATE: &str = "You are a highly skilled ATS system. \
    Analyze the following resume against the provided job description. \
    Please share your professional evaluation with a percentage score (for example \"Match: 72%\") \
    and provide insights into the resume's strengths and weaknesses. \
    State the percentage score before any other percentage in your reply.

The structured output must include:
- match_score: A percentage indicating the overall fit.
- missing_skills: A list of skills the candidate lacks according to the job description.
- present_skills: A list of skills the candidate possesses.
- keyword_match: A dictionary showing the keywords from the job description matched in the resume along with their counts.
- experience_timeline: A timeline of relevant experience related to the job description, keyed by year.
- competencies: Scores from 1 to 5 for Communication, Technical Skills, Teamwork, Problem Solving and Creativity.

{structured_block_instruction}";

pub fn ats_score_instruction() -> String {
    ATS_SCORE_TEMPLATE.replace("{structured_block_instruction}", STRUCTURED_BLOCK_INSTRUCTION)
}
