/*
[INPUT]:  Collected answers, generation date, downloaded report bytes
[OUTPUT]: Plain-text summary document, export file names, files on disk
[POS]:    Export layer - local summary and report download targets
[UPDATE]: When analysis rules or export naming change
*/

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::answers::Answers;

const HIGH: u8 = 4;
const LOW: u8 = 2;

fn level(answers: &Answers, id: &str) -> Option<u8> {
    answers.scale(id).map(|level| level.get())
}

fn is_high(answers: &Answers, id: &str) -> bool {
    level(answers, id).is_some_and(|value| value >= HIGH)
}

fn is_low(answers: &Answers, id: &str) -> bool {
    level(answers, id).is_some_and(|value| value <= LOW)
}

pub fn emotional_findings(answers: &Answers) -> Vec<&'static str> {
    let mut findings = Vec::new();
    if is_high(answers, "joy_frequency") {
        findings.push(
            "The child shows a high level of positive emotions, a favourable sign of emotional development.",
        );
    } else if is_low(answers, "joy_frequency") {
        findings.push(
            "Joy and pleasure are shown rarely. Pay attention to the child's emotional state.",
        );
    }
    if is_high(answers, "sadness_frequency") || is_high(answers, "anger_without_reason") {
        findings.push(
            "Frequent negative emotions may indicate a need for additional psychological support.",
        );
    }
    findings
}

pub fn social_findings(answers: &Answers) -> Vec<&'static str> {
    let mut findings = Vec::new();
    if is_high(answers, "makes_friends_easily") {
        findings.push("The child has good social skills and easily makes contact with peers.");
    } else if is_low(answers, "makes_friends_easily") {
        findings.push(
            "The child finds it hard to make social contacts. Work on communication skills is recommended.",
        );
    }
    if is_high(answers, "avoids_playing_with_children") {
        findings.push(
            "The child prefers playing alone, which may point to introversion or social difficulties.",
        );
    }
    findings
}

pub fn self_regulation_findings(answers: &Answers) -> Vec<&'static str> {
    let mut findings = Vec::new();
    if is_high(answers, "follows_rules") {
        findings.push("The child self-regulates well and is able to follow rules.");
    } else if is_low(answers, "follows_rules") {
        findings.push(
            "The child struggles to follow rules and instructions. Work on self-control is recommended.",
        );
    }
    if is_high(answers, "impulse_control_difficulty") {
        findings.push("High impulsivity needs particular attention and possibly corrective work.");
    }
    findings
}

pub fn recommendations(answers: &Answers) -> Vec<&'static str> {
    let mut items = vec![
        "Regular play and creative activities to develop the emotional sphere.",
        "Encourage social interaction through group activities.",
        "Set clear but fair rules and boundaries.",
        "Develop emotional regulation by teaching self-soothing techniques.",
    ];
    let has_concerns = answers
        .text("development_concerns")
        .is_some_and(|text| !text.trim().is_empty());
    if has_concerns {
        items.push("Consult a child psychologist for a more detailed look at development.");
    }
    items
}

fn push_section(out: &mut String, title: &str, findings: &[&str]) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
    if findings.is_empty() {
        let _ = writeln!(out, "No notable findings.");
    }
    for finding in findings {
        let _ = writeln!(out, "{finding}");
    }
    let _ = writeln!(out);
}

/// Render the local summary document
pub fn render_summary(answers: &Answers, generated_on: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Psychological analysis of children's drawings");
    let _ = writeln!(out, "Report date: {}", generated_on.format("%d.%m.%Y"));
    let _ = writeln!(out);

    let not_specified = "Not specified".to_string();
    let field = |id: &str| {
        answers
            .get(id)
            .map(ToString::to_string)
            .unwrap_or_else(|| not_specified.clone())
    };
    let _ = writeln!(out, "General information");
    let _ = writeln!(out, "-------------------");
    let _ = writeln!(out, "Child's name: {}", field("child_name"));
    let _ = writeln!(out, "Date of birth: {}", field("birth_date"));
    let _ = writeln!(out, "Gender: {}", field("gender"));
    let _ = writeln!(out, "Parent/guardian: {}", field("guardian_name"));
    let _ = writeln!(out);

    push_section(&mut out, "Emotional sphere", &emotional_findings(answers));
    push_section(&mut out, "Social interaction", &social_findings(answers));
    push_section(
        &mut out,
        "Self-regulation and behaviour",
        &self_regulation_findings(answers),
    );

    let _ = writeln!(out, "Recommendations");
    let _ = writeln!(out, "---------------");
    for (index, item) in recommendations(answers).iter().enumerate() {
        let _ = writeln!(out, "{}. {item}", index + 1);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "This analysis is advisory. For professional help, contact a qualified child psychologist."
    );
    out
}

fn file_stem(answers: &Answers, date: NaiveDate) -> String {
    let child = answers
        .text("child_name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("child");
    let child: String = child
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("Psychological_analysis_{child}_{}", date.format("%d_%m_%Y"))
}

pub fn summary_file_name(answers: &Answers, date: NaiveDate) -> String {
    format!("{}.txt", file_stem(answers, date))
}

pub fn report_file_name(answers: &Answers, date: NaiveDate) -> String {
    format!("{}.pdf", file_stem(answers, date))
}

/// Write the summary into `dir`, creating it when missing
pub async fn write_summary(dir: &Path, answers: &Answers, date: NaiveDate) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(summary_file_name(answers, date));
    tokio::fs::write(&path, render_summary(answers, date)).await?;
    tracing::info!(path = %path.display(), "summary exported");
    Ok(path)
}

/// Save downloaded report bytes into `dir`
pub async fn save_report(
    dir: &Path,
    answers: &Answers,
    date: NaiveDate,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(answers, date));
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{AnswerValue, ScaleLevel};
    use crate::test_support::complete_answers;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).expect("date")
    }

    fn with_level(id: &str, level: u8) -> Answers {
        let mut answers = complete_answers();
        answers.set(id, AnswerValue::Scale(ScaleLevel::new(level).expect("level")));
        answers
    }

    #[test]
    fn test_middle_answers_have_no_findings() {
        let answers = complete_answers();
        assert!(emotional_findings(&answers).is_empty());
        assert!(social_findings(&answers).is_empty());
        assert!(self_regulation_findings(&answers).is_empty());
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(emotional_findings(&with_level("joy_frequency", 4)).len(), 1);
        assert_eq!(emotional_findings(&with_level("joy_frequency", 2)).len(), 1);
        assert_eq!(emotional_findings(&with_level("anger_without_reason", 5)).len(), 1);
        assert_eq!(social_findings(&with_level("makes_friends_easily", 1)).len(), 1);
        assert_eq!(
            self_regulation_findings(&with_level("impulse_control_difficulty", 4)).len(),
            1
        );
    }

    #[test]
    fn test_missing_scale_gives_no_finding() {
        let mut answers = complete_answers();
        answers.remove("joy_frequency");
        assert!(emotional_findings(&answers).is_empty());
    }

    #[test]
    fn test_concerns_add_recommendation() {
        let mut answers = complete_answers();
        assert_eq!(recommendations(&answers).len(), 4);
        answers.set("development_concerns", AnswerValue::Text("speech delay".into()));
        assert_eq!(recommendations(&answers).len(), 5);
    }

    #[test]
    fn test_render_summary() {
        let summary = render_summary(&complete_answers(), date());
        assert!(summary.contains("Report date: 15.10.2026"));
        assert!(summary.contains("Child's name: Masha"));
        assert!(summary.contains("Date of birth: 05.03.2018"));
        assert!(summary.contains("4. Develop emotional regulation"));
    }

    #[test]
    fn test_file_names() {
        let answers = complete_answers();
        assert_eq!(
            summary_file_name(&answers, date()),
            "Psychological_analysis_Masha_15_10_2026.txt"
        );
        assert_eq!(
            report_file_name(&Answers::new(), date()),
            "Psychological_analysis_child_15_10_2026.pdf"
        );

        let mut odd = Answers::new();
        odd.set("child_name", AnswerValue::Text("Ann/Marie Lee".into()));
        assert_eq!(
            summary_file_name(&odd, date()),
            "Psychological_analysis_Ann_Marie_Lee_15_10_2026.txt"
        );
    }

    #[tokio::test]
    async fn test_write_summary_creates_file() {
        let dir = std::env::temp_dir().join(format!("drawtest-export-{}", uuid::Uuid::new_v4()));

        let path = write_summary(&dir, &complete_answers(), date())
            .await
            .expect("write summary");

        let content = tokio::fs::read_to_string(&path).await.expect("read back");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        assert!(content.starts_with("Psychological analysis"));
    }
}
