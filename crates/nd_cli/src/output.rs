use nd_core::{AnalysisResult, Article};

pub fn article_line(index: usize, article: &Article) -> String {
    let mut line = format!("{:>2}. {}", index + 1, article.title);
    line.push_str(&format!("\n    {} · {}", article.source.name, article.published_display()));
    if let Some(description) = article.description.as_deref().filter(|d| !d.trim().is_empty()) {
        line.push_str(&format!("\n    {}", description.trim()));
    }
    line.push_str(&format!("\n    {}", article.url));
    line
}

pub fn analysis_line(result: &AnalysisResult) -> String {
    if result.is_degraded() {
        return format!("    [{}] {}", result.emotion, result.explanation);
    }
    let mut line = format!(
        "    [{}] truth {:.0}% · {}",
        result.emotion, result.truth_percentage, result.explanation
    );
    if let Some(summary) = &result.summary {
        line.push_str(&format!("\n    summary: {}", summary));
    }
    line
}
