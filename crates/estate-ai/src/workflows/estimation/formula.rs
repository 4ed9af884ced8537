use std::collections::HashMap;
use std::sync::OnceLock;

/// Unit price applied when a region has no entry in the table, in yen per
/// square meter.
pub const DEFAULT_UNIT_PRICE: u64 = 100_000;

static UNIT_PRICE_PER_SQM: OnceLock<HashMap<&'static str, u64>> = OnceLock::new();

fn unit_price_table() -> &'static HashMap<&'static str, u64> {
    UNIT_PRICE_PER_SQM.get_or_init(|| {
        // Yen per square meter of residential land, keyed by prefecture.
        // Regions outside the table fall back to DEFAULT_UNIT_PRICE.
        const REGION_UNIT_PRICES: &[(&str, u64)] = &[
            ("東京都", 350_000),
            ("神奈川県", 240_000),
            ("大阪府", 220_000),
            ("京都府", 200_000),
            ("愛知県", 180_000),
            ("埼玉県", 160_000),
            ("千葉県", 150_000),
            ("兵庫県", 140_000),
            ("福岡県", 130_000),
            ("広島県", 120_000),
            ("沖縄県", 110_000),
            ("北海道", 80_000),
        ];

        REGION_UNIT_PRICES.iter().copied().collect()
    })
}

pub fn unit_price_for(region: &str) -> u64 {
    unit_price_table()
        .get(region.trim())
        .copied()
        .unwrap_or(DEFAULT_UNIT_PRICE)
}

/// The local strategy: unit price times land size, rounded to the nearest
/// yen. Infallible and free of I/O. A non-finite or negative product clamps
/// to zero so the result is always a valid price.
pub fn estimate(region: &str, land_size: f64) -> u64 {
    let price = unit_price_for(region) as f64 * land_size;
    if price.is_finite() && price > 0.0 {
        price.round() as u64
    } else {
        0
    }
}
