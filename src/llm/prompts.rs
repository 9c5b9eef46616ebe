// README generation prompt

/// Fixed task description appended after the repository material.
pub const README_INSTRUCTIONS: &str = r#"Generate a detailed README in markdown format that includes:
1. Project Title and Description
2. Key Features and Capabilities
3. Technologies and Dependencies Used (no need to mention all, just the key ones)
4. Setup Instructions
5. Usage Guide
6. Contribution Guidelines
7. Add emojis to make it more engaging
8. Also refer the previous readme for more information (IF EXISTS)
9. Also mention IF there are any additional notes or tips for the users
10. Don't give any false information

Important Notes:
- Keep it clean and professional
- Make sure you understand the project well
- Focus on technical accuracy
- Don't mention anything about previous readme, your output will be the only readme
- Don't add any metadata sections
- Don't add repository stats
- Use clear and concise language
- Don't mention anything you are not sure about
- Your output will be directly used as the README.md file so make sure it's perfect!
Remember: ONLY GENERATE THE FINAL README FILE IN MARKDOWN FORMAT"#;

/// Composes the single prompt sent to the completion endpoint.
///
/// Pure and size-agnostic: an oversized prompt is the endpoint's problem.
pub fn assemble_prompt(repo_url: &str, summary: &str, tree: &str, content: &str) -> String {
    format!(
        r#"Imagine you are a Senior Developer, expert in writing Readme.md. Analyze this GitHub repository and create a comprehensive README.

Repository URL: {repo_url}

Repository Overview:
{summary}

File Structure:
{tree}

Code Analysis:
{content}

{instructions}"#,
        instructions = README_INSTRUCTIONS,
    )
}
