//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::humanize::HumanizeReport;
use crate::{DetectionResult, FileReport, RiskLevel};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report one scored text. `source` is a file path, "stdin" or "text".
    pub fn report(&self, source: &str, result: &DetectionResult) {
        self.print_header(source, result);
        self.print_score(result);

        if !result.flags.is_empty() {
            self.print_flags(result);
        }
        if self.verbose {
            self.print_metrics(result);
        }

        self.print_recommendations(result);
        println!();
    }

    pub fn report_file(&self, report: &FileReport) {
        self.report(&report.file_path.display().to_string(), &report.result);
    }

    /// Report multiple files with summary
    pub fn report_many(&self, reports: &[FileReport], stats: &AggregateStats) {
        for report in reports {
            self.report_file(report);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score and level)
    pub fn report_quiet(&self, source: &str, result: &DetectionResult, suffix: &str) {
        println!(
            "{}: {} ({}){}",
            source,
            result.risk_score,
            self.colorize_level(result.risk_level),
            suffix
        );
    }

    /// Before/after comparison for a rewrite
    pub fn report_humanize(&self, report: &HumanizeReport) {
        println!();
        println!("{}", "Rewrite".bold());
        println!("{}", "═".repeat(60));
        println!("{}", report.rewritten);
        println!("{}", "═".repeat(60));
        println!(
            "   Before: {} {}",
            self.create_score_bar(report.before.risk_score),
            self.colorize_level(report.before.risk_level)
        );
        println!(
            "   After:  {} {}",
            self.create_score_bar(report.after.risk_score),
            self.colorize_level(report.after.risk_level)
        );
        let change = match report.improvement {
            d if d > 0 => format!("{} points less AI-sounding", d).green(),
            0 => "no change".to_string().yellow(),
            d => format!("{} points more AI-sounding", -d).red(),
        };
        println!("   {}", change);
        if self.verbose && !report.after.flags.is_empty() {
            println!();
            println!("   {}", "Still flagged:".bold());
            for flag in &report.after.flags {
                println!("   {} {}", "⚠".yellow(), flag);
            }
        }
        println!();
    }

    fn print_header(&self, source: &str, result: &DetectionResult) {
        println!();
        println!("{}", format!("AI Detection Check: {}", source).bold());
        println!(
            "   Words: {} | Sentences: {} | Avg sentence: {:.1} words",
            result.metrics.word_count,
            result.metrics.sentence_count,
            result.metrics.average_sentence_length
        );
        println!();
    }

    fn print_score(&self, result: &DetectionResult) {
        let level = self.colorize_level(result.risk_level);
        let bar = self.create_score_bar(result.risk_score);
        let verdict = if result.passed {
            "PASS".green().bold()
        } else {
            "FLAGGED".red().bold()
        };

        println!("   Risk: {} {} {}", bar, level.bold(), verdict);
        println!(
            "   {}",
            ScoreCalculator::level_description(result.risk_level).dimmed()
        );
        println!();
    }

    fn print_flags(&self, result: &DetectionResult) {
        println!("   {}", "Flags:".bold());
        match (&result.breakdown, self.verbose) {
            (Some(breakdown), true) => {
                for c in breakdown {
                    let points = format!("{:+}", c.points);
                    let points = if c.points < 0 {
                        points.green()
                    } else {
                        points.red()
                    };
                    println!(
                        "   {} {:>4} [{}] {}",
                        self.flag_icon(c.points),
                        points,
                        c.rule.to_string().dimmed(),
                        c.flag
                    );
                }
            }
            _ => {
                for flag in &result.flags {
                    println!("   {} {}", "⚠".yellow(), flag);
                }
            }
        }
        println!();
    }

    fn flag_icon(&self, points: i32) -> colored::ColoredString {
        if points < 0 {
            "✓".green()
        } else {
            "⚠".yellow()
        }
    }

    fn print_metrics(&self, result: &DetectionResult) {
        let m = &result.metrics;
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        println!("   {}", "Signals:".bold());
        println!("   Personal pronouns:    {}", yes_no(m.has_personal_pronouns));
        println!("   Contractions:         {}", yes_no(m.has_contractions));
        println!("   Buzzwords:            {}", m.buzzword_count);
        println!("   Complex punctuation:  {}", yes_no(m.has_complex_punctuation));
        println!(
            "   Parallel bullets:     {}",
            yes_no(m.has_perfect_parallel_structure)
        );
        println!("   Generic opening:      {}", m.generic_opening_count);
        println!(
            "   Excess exclamations:  {}",
            yes_no(m.has_excessive_exclamations)
        );
        println!("   Emoji:                {}", yes_no(m.has_emoji));
        println!("   Fragment signals:     {}", m.fragment_signals);
        println!();
    }

    fn print_recommendations(&self, result: &DetectionResult) {
        if result.recommendations.is_empty() {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        let shown = if self.verbose {
            result.recommendations.len()
        } else {
            3
        };
        for rec in result.recommendations.iter().take(shown) {
            println!("   {} {}", "→".cyan(), rec);
        }
        if result.recommendations.len() > shown {
            println!(
                "   {} {} more (use --verbose to show)",
                "ℹ".blue(),
                result.recommendations.len() - shown
            );
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!("   Files checked:  {}", stats.files_scored.to_string().bold());
        println!(
            "   Average risk:   {} ({})",
            stats.average_risk.to_string().bold(),
            self.colorize_level(stats.average_level)
        );
        println!(
            "   Passed:         {}/{}",
            stats.passed, stats.files_scored
        );
        println!("   Total flags:    {}", stats.total_flags);
        println!();
    }

    fn colorize_level(&self, level: RiskLevel) -> colored::ColoredString {
        let s = level.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match level {
            RiskLevel::Minimal => s.green().bold(),
            RiskLevel::Low => s.green(),
            RiskLevel::Medium => s.yellow(),
            RiskLevel::High => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score.min(100) as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score < 20 {
                bar.green().to_string()
            } else if score < 40 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
