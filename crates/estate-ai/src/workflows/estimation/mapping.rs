use std::collections::HashMap;
use std::sync::OnceLock;

static CITY_CODE_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Resolves a locality (city/ward) name to the opaque code the inference
/// service keys its models by. Localities without an entry have no trained
/// model and must be reported as unresolvable before any network call.
pub fn locality_code_for(locality: &str) -> Option<&'static str> {
    city_code_map().get(locality.trim()).copied()
}

fn city_code_map() -> &'static HashMap<&'static str, &'static str> {
    CITY_CODE_MAP.get_or_init(|| {
        // JIS X 0402 municipality codes for the localities with trained
        // price models.
        const LOCALITY_TO_CODE: &[(&str, &str)] = &[
            // 東京都
            ("千代田区", "13101"),
            ("中央区", "13102"),
            ("港区", "13103"),
            ("新宿区", "13104"),
            ("世田谷区", "13112"),
            ("渋谷区", "13113"),
            // 神奈川県
            ("横浜市中区", "14104"),
            ("川崎市中原区", "14133"),
            // 大阪府
            ("大阪市北区", "27127"),
            ("大阪市中央区", "27128"),
            // 愛知県
            ("名古屋市中区", "23106"),
            // 京都府
            ("京都市中京区", "26104"),
            // 兵庫県
            ("神戸市中央区", "28110"),
            // 広島県
            ("広島市中区", "34101"),
            ("広島市東区", "34102"),
            ("広島市南区", "34103"),
            ("広島市西区", "34104"),
            ("広島市安佐南区", "34105"),
            ("呉市", "34202"),
            ("福山市", "34207"),
            ("東広島市", "34212"),
            ("廿日市市", "34213"),
            // 福岡県
            ("福岡市中央区", "40133"),
            // 北海道
            ("札幌市中央区", "01101"),
        ];

        LOCALITY_TO_CODE.iter().copied().collect()
    })
}
