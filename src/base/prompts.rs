//! Prompt templates for LLM usage.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Default issue analysis prompt.
///
/// Placeholders: `{{project}}`, `{{title}}`, and `{{body}}`.
pub const ISSUE_ANALYSIS_PROMPT: &str = r#####"You are about to see a post from a GitHub user filing a GitHub Issue with the open source project {{project}}.

Your task will be to (1) discern whether the issue is a bug report that is not actionable, and if so then (2) show the user as clearly as possible what an MRE (minimal reproducible example) for their bug report would look like.

First, in <thinking> tags, evaluate (a) whether this is a bug report, or some other type of issue (such as a feature request or a general discussion), and (b) if a bug report, how actionable it seems to be.

Second, in <decision> tags, output either "BUG REPORT - ACTIONABLE", "BUG REPORT - NOT ACTIONABLE", or "OTHER".

If you chose "BUG REPORT - ACTIONABLE" or "OTHER", then stop here.

Only if you chose "BUG REPORT - NOT ACTIONABLE", then third, use <scratchpad> tags to brainstorm how you could most clearly teach and handhold this user to understanding what they need to provide.  Remember, if this user did not _already_ provide an MRE, they are likely an inexperienced open source contributor, and do not already have in mind what an actionable issue would look like.  Make reference to what they reported.  Avoid unnecessary wordiness.  This is going to be your only post on the thread (you won't be returning), so don't offer to personally help more with the issue.

Finally, if you chose "BUG REPORT - NOT ACTIONABLE", output your response between <response> tags (use both opening and closing tags).  Keep your response focused and concise.  This response will be posted _verbatim_ as a reply on the GitHub comment thread on behalf of the project maintainers, so ensure it is complete and does not contain placeholders or templates.

Here is the post from the user:

{{title}}

{{body}}
"#####;

/// Render an analysis prompt template.
///
/// Placeholders are filled in a single scan, so values are inserted verbatim even when they
/// contain placeholder text themselves.
pub fn render_prompt(template: &str, project: &str, title: &str, body: &str) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "project" => project.to_string(),
            "title" => title.to_string(),
            _ => body.to_string(),
        })
        .into_owned()
}

/// Extract the trimmed content of the first `<response>` tag, if present.
pub fn extract_response_tag(analysis: &str) -> Option<String> {
    response_tag_regex().captures(analysis).and_then(|c| c.get(1)).map(|m| m.as_str().trim().to_string())
}

// Statics.

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\{\s*(project|title|body)\s*\}\}").expect("static regex is valid"))
}

static RESPONSE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn response_tag_regex() -> &'static Regex {
    RESPONSE_TAG_REGEX.get_or_init(|| Regex::new(r"(?s)<response>(.*?)</response>").expect("static regex is valid"))
}

// Tests.
