//! Markdown rendering of a score, for humans rather than API clients.

use std::fmt::Write;

use super::ResumeScore;

pub fn render_report(result: &ResumeScore) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "## Resume Score: {}/100", result.score);
    push_section(&mut out, "Strengths", &result.feedback.strengths);
    push_section(&mut out, "Areas for Improvement", &result.feedback.weaknesses);
    push_section(&mut out, "Specific Recommendations", &result.feedback.improvements);
    out
}

fn push_section(out: &mut String, title: &str, items: &[String]) {
    let _ = write!(out, "\n### {title}:\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{MockResumeScorer, ScoreFeedback};

    #[test]
    fn test_render_report_mock() {
        let report = render_report(&MockResumeScorer::fixed_result());
        let expected = "\
## Resume Score: 75/100

### Strengths:
- Strong education section
- Good experience details

### Areas for Improvement:
- Missing quantifiable achievements
- Too verbose

### Specific Recommendations:
- Add metrics to achievements
- Be more concise
- Consider adding skills section
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_render_report_empty_sections() {
        let report = render_report(&ResumeScore {
            score: 40,
            feedback: ScoreFeedback {
                strengths: vec![],
                weaknesses: vec!["Typos".into()],
                improvements: vec![],
            },
        });
        assert!(report.contains("### Strengths:\n\n### Areas for Improvement:\n- Typos\n"));
        assert!(report.ends_with("### Specific Recommendations:\n"));
    }
}
