use anyhow::Context;
use kairos::{CandidateResult, SccSummary};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

fn to_jsonl(rows: &[CandidateResult]) -> anyhow::Result<String> {
    let mut out = String::new();
    for r in rows {
        out.push_str(&serde_json::to_string(r)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn write_results_jsonl(path: &Path, rows: &[CandidateResult]) -> anyhow::Result<()> {
    fs::write(path, to_jsonl(rows)?).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn print_results_jsonl(rows: &[CandidateResult]) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(to_jsonl(rows)?.as_bytes())
        .context("Failed to write results to stdout")?;
    Ok(())
}

pub fn print_summary(rows: &[CandidateResult]) {
    let valid = rows.iter().filter(|r| r.is_valid).count();
    eprintln!("[kairos] rows={} valid={}", rows.len(), valid);

    let Some(summary) = SccSummary::from_scores(rows.iter().filter_map(|r| r.contextual.as_ref()))
    else {
        eprintln!("[kairos] no scored candidates");
        return;
    };
    eprintln!(
        "[kairos] scc mean={:.1} max={:.1} min={:.1} recommended={}/{}",
        summary.mean, summary.max, summary.min, summary.recommended, summary.count
    );
    for (category, count) in &summary.categories {
        eprintln!("[kairos]   {:<40} {}", category.description(), count);
    }
    if let Some(best) = rows
        .iter()
        .filter(|r| r.is_valid)
        .max_by(|a, b| a.scc().total_cmp(&b.scc()))
    {
        eprintln!(
            "[kairos] best: {} scc={:.1} total={:.1} hybrid={:.1} ({:?}, {} stars)",
            best.instant,
            best.scc(),
            best.score_total,
            best.hybrid.score,
            best.hybrid.label,
            best.hybrid.stars
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use kairos::{EngineConfig, EqualHouses, GeoLocation, MeanMotionEphemeris, SearchOrchestrator, SearchRequest};

    #[test]
    fn test_jsonl_has_one_line_per_row() {
        let search =
            SearchOrchestrator::new(MeanMotionEphemeris::new(), EqualHouses, EngineConfig::default())
                .unwrap();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let request = SearchRequest::new(start, start + Duration::hours(6), GeoLocation { lat: 0.0, lon: 0.0 })
            .with_return_all(true);
        let rows = search.find(&request).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        write_results_jsonl(&path, &rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 6);
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert!(first.get("score_total").is_some());
        assert!(first.get("flags").is_some());
    }
}
