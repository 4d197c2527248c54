//! Output formatters for console, JSON and Markdown

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::FitReport;
use crate::processing::reconciler::FitLabel;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn label_color(label: FitLabel) -> Color {
    match label {
        FitLabel::GoodFit => Color::Green,
        FitLabel::AverageFit => Color::Yellow,
        FitLabel::PoorFit => Color::Red,
    }
}

fn join_or_none(skills: &[String]) -> String {
    if skills.is_empty() {
        "(none)".to_string()
    } else {
        skills.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.color(Color::Blue).bold())
        } else {
            format!("\n{}\n{}\n", title, "=".repeat(title.chars().count()))
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        let assessment = &report.assessment;
        let explanation = &assessment.explanation;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME FIT ASSESSMENT"));

        let verdict = self.colorize(&report.verdict(), label_color(assessment.final_label()));
        output.push_str(&format!("Predicted fit: {}\n", verdict));
        output.push_str(&format!("Skill coverage: {}\n", report.coverage_display()));
        output.push_str(&format!(
            "Matched skills: {}\n",
            self.colorize(&join_or_none(&explanation.matched), Color::Green)
        ));
        output.push_str(&format!(
            "Missing skills: {}\n",
            self.colorize(&join_or_none(&explanation.missing), Color::Red)
        ));
        output.push_str(&format!("Match percentage: {:.2}%\n", assessment.lexical_match_percentage));
        output.push_str(&format!("Predictor: {}\n", assessment.predictor));

        if self.detailed {
            output.push_str(&self.format_header("Details"));
            output.push_str(&format!("Similarity: {:.4}\n", assessment.similarity));
            output.push_str(&format!("Model prediction: {}\n", assessment.predicted));
            for label in FitLabel::ALL {
                output.push_str(&format!(
                    "  P({}) = {:.3}\n",
                    label,
                    assessment.probabilities[label.index()]
                ));
            }
            output.push_str(&format!(
                "Resume skills ({}): {}\n",
                explanation.resume_skills.len(),
                join_or_none(&explanation.resume_skills.to_vec())
            ));
            output.push_str(&format!(
                "Job skills ({}): {}\n",
                explanation.job_skills.len(),
                join_or_none(&explanation.job_skills.to_vec())
            ));
            output.push_str(&format!(
                "Resume: {} | Job: {}\n",
                report.metadata.resume_source, report.metadata.job_source
            ));
            output.push_str(&format!(
                "Generated: {} | Processing time: {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                assessment.processing_time_ms
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn skill_list(skills: &[String]) -> String {
        if skills.is_empty() {
            return "_None_\n".to_string();
        }
        skills.iter().map(|s| format!("- {}\n", s)).collect()
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        let assessment = &report.assessment;
        let mut output = String::new();

        output.push_str("# Resume Fit Assessment\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Version:** {}\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                report.metadata.resume_source, report.metadata.job_source
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Predicted fit | {} |\n", report.verdict()));
        output.push_str(&format!("| Skill coverage | {} |\n", report.coverage_display()));
        output.push_str(&format!("| Match percentage | {:.2}% |\n", assessment.lexical_match_percentage));
        output.push_str(&format!("| Similarity | {:.4} |\n", assessment.similarity));
        output.push_str(&format!("| Predictor | {} |\n\n", assessment.predictor));

        output.push_str("## Matched Skills\n\n");
        output.push_str(&Self::skill_list(&assessment.explanation.matched));
        output.push_str("\n## Missing Skills\n\n");
        output.push_str(&Self::skill_list(&assessment.explanation.missing));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn from_config(config: &OutputConfig, detailed: bool) -> Self {
        Self::with_options(config.color_output, config.detailed || detailed, true, true)
    }

    pub fn generate_report(&self, report: &FitReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty() && !stem.starts_with('<'))
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_fit{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::input::InputSource;
    use crate::processing::analyzer::FitAnalyzer;
    use std::path::PathBuf;

    fn report() -> FitReport {
        let analyzer = FitAnalyzer::lexical(&Config::default()).unwrap();
        let assessment = analyzer
            .analyze("Python and SQL developer", "Python, SQL and Kafka engineer")
            .unwrap();
        FitReport::new(
            assessment,
            &InputSource::File(PathBuf::from("cv.txt")),
            &InputSource::Inline("job".to_string()),
        )
    }

    #[test]
    fn test_console_plain_output() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();
        assert!(output.contains("RESUME FIT ASSESSMENT"));
        assert!(output.contains("Skill coverage: 66.7%"));
        assert!(output.contains("Matched skills: python, sql"));
        assert!(output.contains("Missing skills: kafka"));
        assert!(output.contains("Resume: cv.txt | Job: <inline text>"));
    }

    #[test]
    fn test_console_summary_names_predictor() {
        let output = ConsoleFormatter::new(false, false).format_report(&report()).unwrap();
        assert!(output.contains("Predictor: TF-IDF similarity (lexical)"));
        assert!(!output.contains("Details"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["assessment"]["explanation"]["missing"][0], "kafka");
        assert_eq!(value["metadata"]["resume_source"], "cv.txt");
    }

    #[test]
    fn test_markdown_output() {
        let output = MarkdownFormatter::new(true).format_report(&report()).unwrap();
        assert!(output.starts_with("# Resume Fit Assessment"));
        assert!(output.contains("## Missing Skills\n\n- kafka\n"));
        assert!(output.contains("**Resume:** `cv.txt`"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, false);
        let report = report();
        assert!(generator.generate_report(&report, OutputFormat::Json).unwrap().contains("\"assessment\""));
        assert!(generator
            .generate_report(&report, OutputFormat::Markdown)
            .unwrap()
            .contains("## Summary"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "docs/cv.pdf", false), "cv_fit.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "<inline text>", false), "resume_fit.md");
        assert!(suggest_filename(OutputFormat::Console, "cv.txt", true).starts_with("cv_fit_"));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}
