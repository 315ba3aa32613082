// Per-Epoch JSONL Time Series Writer
// One EpochResult per line, plus the supply after that epoch

use gate_engine::EpochResult;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct EpochSnapshot<'a> {
    #[serde(flatten)]
    pub result: &'a EpochResult,
    pub supply: Decimal,
}

/// Write `results` as JSONL. `supply_at` maps an epoch to the supply in
/// effect once that epoch's rebase (if any) was applied.
pub fn write_jsonl(
    path: &std::path::Path,
    results: &[EpochResult],
    supply_at: impl Fn(u64) -> Decimal,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for result in results {
        let snapshot = EpochSnapshot { result, supply: supply_at(result.epoch) };
        let line = serde_json::to_string(&snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(file, "{}", line)?;
    }
    file.flush()
}
