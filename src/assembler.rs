//! Normalizes raw provider records into leaderboard assets

use crate::{
    error::RecordError,
    score::pain_score,
    types::{is_present, Asset, RawAssetRecord},
};

/// Lowercases a name and replaces spaces with hyphens
///
/// Punctuation is left alone, so `"USD Coin (Bridged)"` becomes `"usd-coin-(bridged)"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Builds the stable asset id, e.g. `bitcoin-cash-bch`
pub fn asset_id(name: &str, symbol: &str) -> String {
    format!("{}-{}", slugify(name), symbol.to_lowercase())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    match value {
        Some(v) if is_present(Some(v.as_str())) => Ok(v),
        _ => Err(RecordError::MissingField(field)),
    }
}

/// Turns a raw record into an unranked asset (rank 0)
pub fn assemble(record: RawAssetRecord) -> Result<Asset, RecordError> {
    let name = required(record.name, "name")?;
    let symbol = required(record.symbol, "symbol")?;
    let quote = record.quote.unwrap_or_default();

    Ok(Asset {
        rank: 0,
        id: asset_id(&name, &symbol),
        name,
        symbol,
        price: quote.price,
        percent_from_ath: quote.percent_change_24h,
        pain_score: pain_score(&quote),
        logo_url: record.logo_url.unwrap_or_default(),
    })
}

/// Assembles a batch, dropping malformed records and keeping provider order
pub fn assemble_all(records: Vec<RawAssetRecord>) -> Vec<Asset> {
    let total = records.len();
    let assets: Vec<Asset> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let source_id = record.source_id.clone();
            match assemble(record) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    tracing::warn!(index, source_id = ?source_id, error = %e, "Dropping record");
                    None
                }
            }
        })
        .collect();

    if assets.len() < total {
        tracing::debug!(
            kept = assets.len(),
            dropped = total - assets.len(),
            "Assembled provider batch"
        );
    }

    assets
}
