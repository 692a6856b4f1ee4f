mod output;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use kairos::{
    CandidateResult, EngineConfig, EphemerisProvider, EqualHouses, GeoLocation, HouseProvider,
    MeanMotionEphemeris, NatalReference, SearchOrchestrator, SearchRequest, Strategy,
};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// One batch over the whole grid.
    Vectorized,
    /// Two-phase search on the coarse grid with worker pools.
    CoarseToFine,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Vectorized => Strategy::Vectorized,
            StrategyArg::CoarseToFine => Strategy::CoarseToFine,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Provider {
    /// Deterministic mean-motion sky with equal houses (offline).
    MeanMotion,
    /// Swiss Ephemeris (needs a `swiss` build and data files).
    Swiss,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Search a date range for favourable election instants")]
struct Args {
    /// Range start: RFC 3339 instant or YYYY-MM-DD (midnight UTC).
    #[arg(long)]
    start: String,

    /// Range end (exclusive for the vectorized strategy).
    #[arg(long)]
    end: String,

    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Topic key or English alias (trabajo, amor, dinero, travel, ...).
    #[arg(long, default_value = "trabajo")]
    topic: String,

    /// Grid step in minutes (vectorized strategy).
    #[arg(long, default_value_t = 60)]
    step: i64,

    /// Emit rejected instants too, with their flags and scores.
    #[arg(long)]
    return_all: bool,

    #[arg(long, value_enum, default_value_t = StrategyArg::Vectorized)]
    strategy: StrategyArg,

    #[arg(long, value_enum, default_value_t = Provider::MeanMotion)]
    provider: Provider,

    /// Natal reference JSON: {"points": {"sun": 12.5, "asc": 100.0}, "cusps": [...]}.
    #[arg(long)]
    natal: Option<PathBuf>,

    /// Engine config TOML (default: configs/kairos.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only the best N rows by contextual score (0 = all, in search order).
    #[arg(long, default_value_t = 0)]
    top: usize,

    /// Write JSON lines here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_instant(text: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected RFC 3339 or YYYY-MM-DD)", text))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date '{}'", text))?;
    Ok(midnight.and_utc())
}

fn load_natal(path: &Path) -> anyhow::Result<NatalReference> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read natal file {}", path.display()))?;
    NatalReference::from_json_str(&text)
        .with_context(|| format!("Invalid natal file {}", path.display()))
}

fn search<E: EphemerisProvider, H: HouseProvider>(
    ephemeris: E,
    houses: H,
    config: EngineConfig,
    request: &SearchRequest,
) -> anyhow::Result<Vec<CandidateResult>> {
    let orchestrator = SearchOrchestrator::new(ephemeris, houses, config)?;
    Ok(orchestrator.find(request)?)
}

#[cfg(feature = "swiss")]
fn search_swiss(
    config_path: Option<&Path>,
    config: EngineConfig,
    request: &SearchRequest,
) -> anyhow::Result<Vec<CandidateResult>> {
    use kairos::SwissEphemerisAdapter;
    let settings = kairos_config::load_ephemeris_settings(config_path)?;
    // one adapter for both roles: its lock must cover every call into the C library
    let adapter = SwissEphemerisAdapter::new(settings.path)?;
    search(&adapter, &adapter, config, request)
}

#[cfg(not(feature = "swiss"))]
fn search_swiss(
    _config_path: Option<&Path>,
    _config: EngineConfig,
    _request: &SearchRequest,
) -> anyhow::Result<Vec<CandidateResult>> {
    anyhow::bail!("--provider swiss needs a build with the `swiss` feature");
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = kairos_config::load_engine_config(args.config.as_deref())?;
    let start = parse_instant(&args.start)?;
    let end = parse_instant(&args.end)?;

    let mut request = SearchRequest::new(start, end, GeoLocation { lat: args.lat, lon: args.lon })
        .with_topic(&args.topic)
        .with_step(args.step)
        .with_strategy(args.strategy.into())
        .with_return_all(args.return_all);
    if let Some(path) = &args.natal {
        request = request.with_natal(load_natal(path)?);
    }

    eprintln!(
        "[kairos] {} -> {} at ({:.4}, {:.4}) topic={} strategy={:?} provider={:?}",
        start, end, args.lat, args.lon, args.topic, args.strategy, args.provider
    );

    let mut rows = match args.provider {
        Provider::MeanMotion => search(MeanMotionEphemeris::new(), EqualHouses, config, &request)?,
        Provider::Swiss => search_swiss(args.config.as_deref(), config, &request)?,
    };
    if args.top > 0 {
        kairos::search::rank(&mut rows);
        rows.truncate(args.top);
    }

    match &args.out {
        Some(path) => {
            output::write_results_jsonl(path, &rows)?;
            eprintln!("[kairos] wrote {} rows -> {}", rows.len(), path.display());
        }
        None => output::print_results_jsonl(&rows)?,
    }
    output::print_summary(&rows);
    Ok(())
}
