//! CLI subcommand handlers.

use evidex_core::config::EvidexConfig;
use evidex_core::{
    Dashboard, SearchCompletion, SearchResult, SortDirection, SortKey, SortSpec, Study,
    create_service,
};
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Run one search and print the result.
pub async fn run_search(
    config: &EvidexConfig,
    query: &str,
    sort: SortKey,
    ascending: bool,
    json: bool,
) -> anyhow::Result<()> {
    let service = create_service(&config.service)?;
    let mut dashboard = Dashboard::new(config.session.clone());
    let direction = if ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    dashboard.set_sort(SortSpec::new(sort, direction));

    match dashboard.submit(service.as_ref(), query).await {
        None => anyhow::bail!("Search query is empty"),
        Some(SearchCompletion::Failed(failure)) => anyhow::bail!("{failure}"),
        Some(SearchCompletion::Replaced | SearchCompletion::Discarded) => {}
    }
    let Some(result) = dashboard.result() else {
        anyhow::bail!("The evidence service returned no result");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!(
            "{}",
            format_result(result, &dashboard.sorted_studies(), dashboard.sort_spec())
        );
    }
    Ok(())
}

/// Print the resolved configuration as TOML.
pub fn show_config(config: &EvidexConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write a default configuration file into the workspace.
pub fn init_config(workspace: &Path) -> anyhow::Result<()> {
    let config_dir = workspace.join(".evidex");
    std::fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        println!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        return Ok(());
    }

    let toml_str = EvidexConfig::default().to_toml()?;
    std::fs::write(&config_path, &toml_str)?;
    println!(
        "Created default configuration at: {}",
        config_path.display()
    );
    Ok(())
}

const COLUMN_WIDTHS: [usize; 5] = [6, 18, 28, 28, 12];

/// Plain-text rendering of a result: answer, takeaways and the sorted matrix.
pub fn format_result(result: &SearchResult, studies: &[&Study], sort: SortSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", result.query));
    if !result.summary.is_empty() {
        out.push_str(&format!("{}\n\n", result.summary));
    }
    push_list(&mut out, "Key takeaways", &result.key_takeaways);
    push_list(&mut out, "Limitations", &result.limitations);
    push_list(&mut out, "Recommendations", &result.recommendations);

    out.push_str(&format!("Evidence matrix ({} studies)\n", studies.len()));
    let headers: Vec<String> = SortKey::ALL
        .iter()
        .map(|key| {
            if *key == sort.key {
                format!("{} {}", key.header(), sort.direction.arrow())
            } else {
                key.header().to_string()
            }
        })
        .collect();
    out.push_str(&row(&headers));
    out.push_str(&format!(
        "{}\n",
        "-".repeat(COLUMN_WIDTHS.iter().sum::<usize>() + COLUMN_WIDTHS.len() * 2)
    ));
    for study in studies {
        out.push_str(&row(&[
            study.year.to_string(),
            study.study_type.label().to_string(),
            study.population.clone(),
            study.outcome.clone(),
            study.grade.label().to_string(),
        ]));
        out.push_str(&format!("        {}\n", study.title));
    }
    out
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{title}:\n"));
    for item in items {
        out.push_str(&format!("  - {item}\n"));
    }
    out.push('\n');
}

fn row(cells: &[String]) -> String {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        line.push_str(&fit(cell, width));
        line.push_str("  ");
    }
    format!("{}\n", line.trim_end())
}

/// Pad or truncate `text` to exactly `width` display columns.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{text}{}", " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use evidex_core::{EvidenceGrade, StudyType, sort_studies};

    fn result() -> SearchResult {
        let mut a = Study::new("s1", "Older trial", 2018, StudyType::Rct, EvidenceGrade::Strong);
        a.population = "Adults with type 2 diabetes".into();
        let b = Study::new(
            "s2",
            "Newer cohort",
            2022,
            StudyType::Observational,
            EvidenceGrade::Weak,
        );
        let mut result = SearchResult::with_studies("metformin", vec![a, b]);
        result.summary = "Modest benefit.".into();
        result.key_takeaways = vec!["Mostly observational".into()];
        result
    }

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit("RCT", 6), "RCT   ");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        let fitted = fit("Adults with type 2 diabetes", 10);
        assert_eq!(fitted.width(), 10);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn test_fit_wide_characters() {
        let fitted = fit("糖尿病患者の成人", 7);
        assert!(fitted.width() <= 7);
    }

    #[test]
    fn test_format_result_orders_matrix() {
        let result = result();
        let spec = SortSpec::default();
        let studies = sort_studies(&result.evidence_matrix, spec);
        let text = format_result(&result, &studies, spec);

        assert!(text.starts_with("metformin\n"));
        assert!(text.contains("Key takeaways:\n  - Mostly observational"));
        assert!(text.contains("Year ↓"));
        let newer = text.find("Newer cohort").unwrap();
        let older = text.find("Older trial").unwrap();
        assert!(newer < older);
        assert!(!text.contains("Limitations"));
    }

    #[test]
    fn test_init_config_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path()).unwrap();
        let path = dir.path().join(".evidex").join("config.toml");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[session]"));

        // A second run leaves the file alone.
        std::fs::write(&path, "# custom\n").unwrap();
        init_config(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# custom\n");
    }

    #[tokio::test]
    async fn test_run_search_against_demo_backend() {
        let mut config = EvidexConfig::default();
        config.service.backend = evidex_core::ServiceBackend::Mock;
        run_search(&config, "metformin", SortKey::Grade, true, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_search_rejects_blank_query() {
        let mut config = EvidexConfig::default();
        config.service.backend = evidex_core::ServiceBackend::Mock;
        assert!(
            run_search(&config, "  ", SortKey::Year, false, true)
                .await
                .is_err()
        );
    }
}
