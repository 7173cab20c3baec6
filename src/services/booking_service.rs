//! 旅行预订服务
//!
//! 计算车费、随机分配助手，并把模型回复解析为推荐景点。

use rand::Rng;
use serde_json::Value;
use tracing::warn;

use super::reply_parser::extract_json_array;
use crate::models::{AssignedHelper, RecommendedPlace};

/// 固定的预订状态
pub const BOOKING_STATUS: &str = "Confirmed";

/// 基础车费
const BASE_FARE: i64 = 50;

/// 每公斤行李的费用
const FARE_PER_KG: i64 = 10;

/// 助手评分区间
const MIN_RATING: f64 = 3.8;
const MAX_RATING: f64 = 5.0;

/// 助手名单
pub const HELPER_ROSTER: [&str; 8] = [
    "Ravi Kumar",
    "Sita Ram",
    "Anjali Sharma",
    "Manoj Verma",
    "Deepak Yadav",
    "Kiran Singh",
    "Vikram Das",
    "Priya Nair",
];

/// 解析失败时的占位景点
pub fn fallback_places() -> Vec<RecommendedPlace> {
    vec![RecommendedPlace {
        place: "Unknown".to_string(),
        tagline: "Unable to fetch places.".to_string(),
    }]
}

/// 解析字符串开头的整数
///
/// 跳过前导空白，接受可选的正负号，读取到第一个非数字字符为止；没有数字时返回 None。
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// 行李重量（公斤），无法解析时为 0
pub fn parse_luggage_weight(luggage: &Value) -> i64 {
    match luggage {
        Value::String(s) => parse_leading_int(s).unwrap_or(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// 预估车费：基础费 + 每公斤费用
pub fn estimate_fare(luggage_weight: i64) -> i64 {
    BASE_FARE.saturating_add(luggage_weight.saturating_mul(FARE_PER_KG))
}

/// 从名单中均匀随机选一位助手，评分保留一位小数
pub fn assign_helper<R: Rng + ?Sized>(rng: &mut R) -> AssignedHelper {
    let name = HELPER_ROSTER[rng.random_range(0..HELPER_ROSTER.len())];
    let rating = rng.random_range(MIN_RATING..=MAX_RATING);
    AssignedHelper {
        name: name.to_string(),
        rating: (rating * 10.0).round() / 10.0,
    }
}

/// 把模型回复解析为推荐景点，失败时返回占位列表
pub fn places_from_reply(reply: &str) -> Vec<RecommendedPlace> {
    match extract_json_array(reply) {
        Ok(places) => places,
        Err(e) => {
            warn!("Could not parse recommended places: {}", e);
            fallback_places()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_parse_luggage_weight_strings() {
        assert_eq!(parse_luggage_weight(&json!("15")), 15);
        assert_eq!(parse_luggage_weight(&json!("  20")), 20);
        assert_eq!(parse_luggage_weight(&json!("15.7")), 15);
        assert_eq!(parse_luggage_weight(&json!("12kg")), 12);
        assert_eq!(parse_luggage_weight(&json!("-3")), -3);
        assert_eq!(parse_luggage_weight(&json!("abc")), 0);
        assert_eq!(parse_luggage_weight(&json!("")), 0);
        assert_eq!(parse_luggage_weight(&json!("-")), 0);
    }

    #[test]
    fn test_parse_luggage_weight_other_types() {
        assert_eq!(parse_luggage_weight(&json!(8)), 8);
        assert_eq!(parse_luggage_weight(&json!(8.9)), 8);
        assert_eq!(parse_luggage_weight(&json!(true)), 0);
        assert_eq!(parse_luggage_weight(&json!(null)), 0);
    }

    #[test]
    fn test_estimate_fare() {
        assert_eq!(estimate_fare(0), 50);
        assert_eq!(estimate_fare(15), 200);
        assert_eq!(estimate_fare(parse_luggage_weight(&json!("abc"))), 50);
        assert_eq!(estimate_fare(i64::MAX), i64::MAX);
    }

    #[test]
    fn test_assign_helper_in_roster_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let helper = assign_helper(&mut rng);
            assert!(HELPER_ROSTER.contains(&helper.name.as_str()));
            assert!((MIN_RATING..=MAX_RATING).contains(&helper.rating));
            assert_eq!((helper.rating * 10.0).round() / 10.0, helper.rating);
        }
    }

    #[test]
    fn test_assign_helper_covers_roster() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(assign_helper(&mut rng).name);
        }
        assert_eq!(seen.len(), HELPER_ROSTER.len());
    }

    #[test]
    fn test_places_from_reply() {
        let reply = r#"[{"place": "Amber Fort", "tagline": "Rajput grandeur"}, {"place": "Jal Mahal", "tagline": "A palace afloat"}, {"place": "City Palace", "tagline": "Royal heart of Jaipur"}]"#;
        let places = places_from_reply(reply);
        assert_eq!(places.len(), 3);
        assert_eq!(places[2].place, "City Palace");
    }

    #[test]
    fn test_places_fallback() {
        assert_eq!(places_from_reply("I cannot help with that."), fallback_places());
        assert_eq!(places_from_reply("[not json]"), fallback_places());
        assert!(places_from_reply("[]").is_empty());
    }
}
