use anyhow::{anyhow, bail, Context, Result};
use markmap::{
    group_by_map, EngineOptions, HttpMarkedMapStore, MarkClusterer, MarkSet, MarkedMapRecord,
    MarkedMapStore,
};
use serde::Serialize;
use std::path::Path;

/// Clustered marks for one map, as printed by `combine` and `fetch`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CombinedMap {
    map_id: String,
    map_name: String,
    image_url: String,
    saved_count: usize,
    marks: MarkSet,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let options = load_options()?;

    match args.get(1).map(|s| s.as_str()) {
        Some("summary") => {
            let records = read_records(args.get(2).context("usage: markmap-app summary <records.json>")?)?;
            print_json(&group_by_map(&records))
        }
        Some("combine") => {
            let path = args
                .get(2)
                .context("usage: markmap-app combine <records.json> [mapId]")?;
            let records = read_records(path)?;
            let clusterer = MarkClusterer::new(options.clustering.clone());
            let mut combined = combine(&clusterer, &records);
            if let Some(map_id) = args.get(3) {
                combined.retain(|map| &map.map_id == map_id);
            }
            print_json(&combined)
        }
        Some("fetch") => {
            let map_id = args.get(2).context("usage: markmap-app fetch <mapId>")?;
            let store = HttpMarkedMapStore::new(&options.api).map_err(|e| anyhow!(e))?;
            let records = store.for_map(map_id).await.map_err(|e| anyhow!(e))?;
            let clusterer = MarkClusterer::new(options.clustering.clone());
            print_json(&combine(&clusterer, &records))
        }
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(other) => {
            print_help();
            bail!("unknown command: {other}")
        }
    }
}

/// Options from `MARKMAP_CONFIG` (if set) with `MARKMAP_*` env overrides
fn load_options() -> Result<EngineOptions> {
    let base = match std::env::var("MARKMAP_CONFIG") {
        Ok(path) => EngineOptions::from_json_file(&path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("loading config from {path}"))?,
        Err(_) => EngineOptions::default(),
    };
    base.with_env_overrides().map_err(|e| anyhow!(e))
}

fn read_records(path: impl AsRef<Path>) -> Result<Vec<MarkedMapRecord>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<MarkedMapRecord> =
        serde_json::from_str(&raw).with_context(|| format!("parsing records in {}", path.display()))?;
    log::info!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// One combined view per map, in first-seen map order
fn combine(clusterer: &MarkClusterer, records: &[MarkedMapRecord]) -> Vec<CombinedMap> {
    group_by_map(records)
        .into_iter()
        .map(|summary| {
            let same_map: Vec<MarkedMapRecord> = records
                .iter()
                .filter(|record| record.map_id == summary.map_id)
                .cloned()
                .collect();
            CombinedMap {
                marks: clusterer.combine_records(&same_map),
                map_id: summary.map_id,
                map_name: summary.map_name,
                image_url: summary.image_url,
                saved_count: summary.saved_count,
            }
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_help() {
    println!("markmap-app <command>");
    println!();
    println!("  summary <records.json>           maps with saved marks and their counts");
    println!("  combine <records.json> [mapId]   clustered marks per map");
    println!("  fetch <mapId>                    fetch records from the API and cluster them");
    println!();
    println!("Environment: MARKMAP_CONFIG, MARKMAP_API_URL, MARKMAP_DEBOUNCE_MS, MARKMAP_HIT_RADIUS_PX, RUST_LOG");
}
