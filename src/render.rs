//! Turns an `AnalysisResponse` into an ordered report.
//!
//! Every front end (TUI, one-shot CLI, chat) draws from the same `Report`, so
//! section order and line formats only live here.

use crate::analysis::{AnalysisResponse, SimilarStatement};
use colored::Colorize;

/// Shown on the results view when nothing was carried over
pub const NO_RESULT_MESSAGE: &str = "No result found. Please submit some text first.";

/// Lead-in printed above the prediction
pub const PREDICTION_LEAD: &str = "Your mental health category might be:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Tips,
    Books,
    Videos,
    Quote,
    SimilarStatements,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Tips => "Tips",
            SectionKind::Books => "Books",
            SectionKind::Videos => "Videos",
            SectionKind::Quote => "Quote",
            SectionKind::SimilarStatements => "Similar Experiences",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SectionKind::Tips => "💡",
            SectionKind::Books => "📘",
            SectionKind::Videos => "🎥",
            SectionKind::Quote => "💬",
            SectionKind::SimilarStatements => "🧑‍🤝‍🧑",
        }
    }

    /// Whether items are bullets (`•`) or already carry their own prefix
    pub fn bulleted(&self) -> bool {
        matches!(
            self,
            SectionKind::Tips | SectionKind::Books | SectionKind::Videos
        )
    }
}

/// One labeled block of the report
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub items: Vec<String>,
}

/// Display model for one analysis result
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub prediction: String,
    pub sections: Vec<Section>,
}

impl Report {
    /// Build the report, omitting every empty optional section
    pub fn from_response(response: &AnalysisResponse) -> Self {
        let mut sections = Vec::new();

        let mut push = |kind: SectionKind, items: Vec<String>| {
            if !items.is_empty() {
                sections.push(Section { kind, items });
            }
        };

        push(SectionKind::Tips, response.tips.clone());
        push(SectionKind::Books, response.books.clone());
        push(SectionKind::Videos, response.videos.clone());
        push(
            SectionKind::Quote,
            response
                .quote()
                .map(|q| vec![format!("\"{}\"", q)])
                .unwrap_or_default(),
        );
        push(
            SectionKind::SimilarStatements,
            response
                .similar_statements
                .iter()
                .enumerate()
                .map(|(idx, s)| similar_statement_line(idx + 1, s))
                .collect(),
        );

        Self {
            prediction: response.prediction.clone(),
            sections,
        }
    }

    /// Find a section by kind
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Plain multi-line text under the standard lead line
    pub fn to_plain_text(&self) -> String {
        self.to_text_with_lead(PREDICTION_LEAD)
    }

    /// Plain multi-line text with a caller-chosen lead line
    pub fn to_text_with_lead(&self, lead: &str) -> String {
        let mut out = format!("{}\n{}\n", lead, self.prediction);
        for section in &self.sections {
            out.push_str(&format!("\n{} {}:\n", section.kind.icon(), section.kind.title()));
            for item in &section.items {
                out.push_str(&format_item(section.kind, item));
                out.push('\n');
            }
        }
        out
    }

    /// Print to stdout with terminal colors
    pub fn print(&self) {
        println!("{}", PREDICTION_LEAD);
        println!("  {}", self.prediction.bold().cyan());

        for section in &self.sections {
            println!("\n{} {}:", section.kind.icon(), section.kind.title().bold());
            for item in &section.items {
                println!("{}", format_item(section.kind, item));
            }
        }
    }
}

/// `1. "I feel low" (Depression, Score: 0.87)`
pub fn similar_statement_line(position: usize, similar: &SimilarStatement) -> String {
    // Ties round up (0.125 -> 0.13)
    let score = (similar.score * 100.0).round() / 100.0;
    format!(
        "{}. \"{}\" ({}, Score: {:.2})",
        position, similar.statement, similar.category, score
    )
}

/// Indented item line, bulleted for plain lists
pub fn format_item(kind: SectionKind, item: &str) -> String {
    if kind.bulleted() {
        format!("  • {}", item)
    } else {
        format!("  {}", item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn similar(statement: &str, category: &str, score: f64) -> SimilarStatement {
        SimilarStatement {
            statement: statement.to_string(),
            category: category.to_string(),
            score,
        }
    }

    #[test]
    fn prediction_only_has_no_sections() {
        let report = Report::from_response(&AnalysisResponse::new("Anxiety"));
        assert_eq!(report.prediction, "Anxiety");
        assert!(report.sections.is_empty());

        let text = report.to_plain_text();
        assert!(text.contains("Anxiety"));
        assert!(!text.contains("Tips"));
        assert!(!text.contains("Similar Experiences"));
    }

    #[test]
    fn tips_keep_their_order() {
        let mut response = AnalysisResponse::new("stress");
        response.tips = vec!["Breathe deeply".into(), "Talk to someone".into()];

        let report = Report::from_response(&response);
        let tips = report.section(SectionKind::Tips).unwrap();
        assert_eq!(tips.items, vec!["Breathe deeply", "Talk to someone"]);

        let text = report.to_plain_text();
        let first = text.find("Breathe deeply").unwrap();
        let second = text.find("Talk to someone").unwrap();
        assert!(first < second);
        assert!(text.contains("  • Breathe deeply"));
    }

    #[test]
    fn similar_statement_score_has_two_decimals() {
        let mut response = AnalysisResponse::new("depression");
        response.similar_statements = vec![similar("I feel low", "Depression", 0.873)];

        let report = Report::from_response(&response);
        let section = report.section(SectionKind::SimilarStatements).unwrap();
        assert_eq!(section.items, vec![r#"1. "I feel low" (Depression, Score: 0.87)"#]);
    }

    #[test]
    fn similar_statements_are_one_indexed() {
        assert_eq!(
            similar_statement_line(2, &similar("Can't sleep", "Stress", 0.5)),
            r#"2. "Can't sleep" (Stress, Score: 0.50)"#
        );
        assert_eq!(
            similar_statement_line(3, &similar("ok", "Normal", 1.0)),
            r#"3. "ok" (Normal, Score: 1.00)"#
        );
    }

    #[test]
    fn score_ties_round_up() {
        assert_eq!(
            similar_statement_line(1, &similar("a", "Stress", 0.125)),
            r#"1. "a" (Stress, Score: 0.13)"#
        );
        assert_eq!(
            similar_statement_line(1, &similar("a", "Stress", 0.625)),
            r#"1. "a" (Stress, Score: 0.63)"#
        );
    }

    #[test]
    fn custom_lead_replaces_standard_one() {
        let report = Report::from_response(&AnalysisResponse::new("stress"));
        let text = report.to_text_with_lead("Lead:");
        assert!(text.starts_with("Lead:\nstress\n"));
        assert!(!text.contains(PREDICTION_LEAD));
    }

    #[test]
    fn only_first_quote_is_shown() {
        let mut response = AnalysisResponse::new("normal");
        response.quotes = vec!["Keep going.".into(), "Never shown.".into()];

        let report = Report::from_response(&response);
        let quote = report.section(SectionKind::Quote).unwrap();
        assert_eq!(quote.items, vec!["\"Keep going.\""]);
        assert!(!report.to_plain_text().contains("Never shown."));
    }

    #[test]
    fn sections_follow_fixed_order() {
        let mut response = AnalysisResponse::new("anxiety");
        response.similar_statements = vec![similar("a", "b", 0.1)];
        response.videos = vec!["v".into()];
        response.tips = vec!["t".into()];
        response.books = vec!["b".into()];
        response.quotes = vec!["q".into()];

        let kinds: Vec<_> = Report::from_response(&response)
            .sections
            .iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Tips,
                SectionKind::Books,
                SectionKind::Videos,
                SectionKind::Quote,
                SectionKind::SimilarStatements,
            ]
        );
    }
}
