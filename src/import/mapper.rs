//! 上游记录到 `NewProject` 的确定性映射。
//!
//! 价格区间、状态和可信度都是启发式占位规则，常量集中在 `MappingConfig` 里。

use crate::import::feed::RawListing;
use crate::storage::entity::{
    Media, MediaType, NewProject, PriceBand, ProjectStatus, MAX_CREDIBILITY_SCORE,
};
use regex::Regex;
use std::sync::OnceLock;

const CRORE: i64 = 10_000_000;
const ON_REQUEST: &str = "On Request";

#[derive(Clone, Debug)]
pub struct MappingConfig {
    pub id_prefix: String,
    pub media_base: String,
    pub source_label: String,
    pub unknown_builder: String,
    pub on_request_band: (i64, i64),
    pub fallback_band: (i64, i64),
    /// 解析出的价格乘以该百分比得到区间下限/上限
    pub spread_low_pct: i64,
    pub spread_high_pct: i64,
    pub base_score: u32,
    pub rera_bonus: u32,
    pub media_bonus: u32,
    pub media_min_images: usize,
    pub price_bonus: u32,
    pub builder_bonus: u32,
    pub max_highlights: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            id_prefix: "mt_".to_string(),
            media_base: "https://moneytreerealty.in/".to_string(),
            source_label: "MoneyTree Feed".to_string(),
            unknown_builder: "Unknown Builder".to_string(),
            on_request_band: (5 * CRORE, 20 * CRORE),
            fallback_band: (3 * CRORE, 15 * CRORE),
            spread_low_pct: 90,
            spread_high_pct: 130,
            base_score: 60,
            rera_bonus: 20,
            media_bonus: 10,
            media_min_images: 3,
            price_bonus: 5,
            builder_bonus: 5,
            max_highlights: 4,
        }
    }
}

impl MappingConfig {
    pub fn project_id(&self, raw_id: &str) -> String {
        format!("{}{}", self.id_prefix, raw_id.trim())
    }

    pub fn builder_name<'a>(&'a self, raw: &'a RawListing) -> &'a str {
        let name = raw.builder.trim();
        if name.is_empty() {
            &self.unknown_builder
        } else {
            name
        }
    }
}

const HIGHLIGHT_VOCABULARY: &[(&str, &str)] = &[
    ("luxury", "Luxury Project"),
    ("rera", "RERA Approved"),
    ("premium", "Premium Location"),
    ("modern", "Modern Amenities"),
    ("family", "Family-Friendly"),
    ("new launch", "New Launch"),
    ("ready", "Ready to Move"),
];

const CITY_STATES: &[(&str, &str)] = &[
    ("Mumbai", "Maharashtra"),
    ("Pune", "Maharashtra"),
    ("Gurugram", "Haryana"),
    ("Gurgaon", "Haryana"),
    ("Delhi", "Delhi"),
    ("Noida", "Uttar Pradesh"),
    ("Bengaluru", "Karnataka"),
    ("Bangalore", "Karnataka"),
    ("Chennai", "Tamil Nadu"),
    ("Hyderabad", "Telangana"),
];

fn price_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:Rs\.|₹)\s*(\d+(?:\.\d+)?)\s*Cr").ok())
        .as_ref()
}

fn year_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"20\d{2}").ok()).as_ref()
}

/// "2.5" 这样的十进制文本换算成以卢比计的整数（1 Cr = 10^7），不经过浮点
fn crore_to_rupees(text: &str) -> Option<i64> {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let whole: i64 = int_part.parse().ok()?;
    let mut frac: String = frac_part.chars().take(7).collect();
    while frac.len() < 7 {
        frac.push('0');
    }
    let frac: i64 = frac.parse().ok()?;
    whole.checked_mul(CRORE)?.checked_add(frac)
}

pub fn parse_price_band(price: &str, cfg: &MappingConfig) -> PriceBand {
    let price = price.trim();
    if price == ON_REQUEST {
        return PriceBand::inr(cfg.on_request_band.0, cfg.on_request_band.1);
    }
    let spread = |v: i64, pct: i64| v.checked_mul(pct).map(|x| x / 100);
    // 溢出与无法解析一样回落到默认区间
    price_re()
        .and_then(|re| re.captures(price))
        .and_then(|c| c.get(1))
        .and_then(|m| crore_to_rupees(m.as_str()))
        .and_then(|v| Some((spread(v, cfg.spread_low_pct)?, spread(v, cfg.spread_high_pct)?)))
        .map(|(min, max)| PriceBand::inr(min, max))
        .unwrap_or_else(|| PriceBand::inr(cfg.fallback_band.0, cfg.fallback_band.1))
}

/// 以交付文本中第一个 20xx 年份对比当前年份
pub fn derive_status(possession: &str, current_year: i32) -> ProjectStatus {
    let year = year_re()
        .and_then(|re| re.find(possession))
        .and_then(|m| m.as_str().parse::<i32>().ok());
    match year {
        None => ProjectStatus::UnderConstruction,
        Some(y) if y < current_year => ProjectStatus::Ready,
        Some(y) if y == current_year => ProjectStatus::NearingCompletion,
        Some(y) if y == current_year + 1 => ProjectStatus::UnderConstruction,
        Some(_) => ProjectStatus::Launched,
    }
}

/// "#" 与空串是上游的未登记占位
pub fn real_rera_id(raw: &RawListing) -> Option<&str> {
    raw.rera
        .first()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "#")
}

pub fn credibility_score(raw: &RawListing, cfg: &MappingConfig) -> u32 {
    let mut score = cfg.base_score;
    if real_rera_id(raw).is_some() {
        score += cfg.rera_bonus;
    }
    if raw.images.len() >= cfg.media_min_images {
        score += cfg.media_bonus;
    }
    if raw.price.trim() != ON_REQUEST {
        score += cfg.price_bonus;
    }
    if !raw.builder.trim().is_empty() {
        score += cfg.builder_bonus;
    }
    score.min(MAX_CREDIBILITY_SCORE)
}

pub fn extract_highlights(keywords: &str, cfg: &MappingConfig) -> Vec<String> {
    let lower = keywords.to_lowercase();
    HIGHLIGHT_VOCABULARY
        .iter()
        .filter(|(kw, _)| lower.contains(kw))
        .take(cfg.max_highlights)
        .map(|(_, label)| label.to_string())
        .collect()
}

pub fn state_for_city(city: &str) -> &'static str {
    CITY_STATES
        .iter()
        .find(|(c, _)| *c == city.trim())
        .map(|(_, s)| *s)
        .unwrap_or("Unknown")
}

/// 户型文本里第一个 1–5 BHK
pub fn bhk_count(detail: &str) -> Option<u32> {
    (1..=5u32).find(|n| detail.contains(&format!("{n} BHK")))
}

pub fn parse_unit_type(detail: &str) -> String {
    format!("{}BHK", bhk_count(detail).unwrap_or(2))
}

pub fn map_listing(
    raw: &RawListing,
    builder_id: &str,
    current_year: i32,
    cfg: &MappingConfig,
) -> NewProject {
    let name = raw.name.trim();
    let city = raw.location(0).unwrap_or("Unknown");
    let builder_name = cfg.builder_name(raw);

    let mut new = NewProject::new(
        name,
        builder_id,
        city,
        raw.location(1).unwrap_or_default(),
        derive_status(&raw.possession, current_year),
        parse_price_band(&raw.price, cfg),
    );
    new.state = Some(state_for_city(city).to_string());
    new.pincode = raw.location(2).map(str::to_string);
    new.address = raw.location(3).map(str::to_string);
    new.rera_id = real_rera_id(raw).map(str::to_string);
    new.rera_link = raw
        .rera
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    new.possession_timeline = Some(if raw.possession.trim().is_empty() {
        "Under Construction".to_string()
    } else {
        raw.possession.trim().to_string()
    });

    let description = raw
        .short_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let kinds = if raw.type_detail.is_empty() {
                "residential".to_string()
            } else {
                raw.type_detail.join(" & ")
            };
            format!("Premium {kinds} project by {builder_name}")
        });
    new.description = Some(description);

    new.media = Some(
        raw.images
            .iter()
            .filter(|img| !img.trim().is_empty())
            .map(|img| Media {
                url: format!("{}{}", cfg.media_base, img.trim()),
                media_type: MediaType::Image,
                verified: false,
                score: 0,
                caption: Some(format!("{name} - Gallery")),
            })
            .collect(),
    );
    new.highlights = Some(extract_highlights(&raw.keywords, cfg));
    new.credibility_score = Some(credibility_score(raw, cfg));
    new.sources = Some(vec![cfg.source_label.clone()]);
    new.unit_types = Some(raw.type_detail.clone());
    new.approved = Some(true);
    new
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> RawListing {
        RawListing {
            id: "101".to_string(),
            name: "Skyline Residences".to_string(),
            builder: "Acme".to_string(),
            location: vec![
                "Pune".to_string(),
                "Baner".to_string(),
                "411045".to_string(),
                String::new(),
            ],
            images: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into(), "d.jpg".into()],
            price: "Rs. 1 Cr".to_string(),
            possession: "Dec 2027".to_string(),
            type_detail: vec!["2 BHK".into(), "3 BHK".into()],
            rera: vec!["RERA123".into(), "http://rera.example/123".into()],
            keywords: "Luxury, RERA, premium, modern, family homes".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn price_spread_in_integer_rupees() {
        let cfg = MappingConfig::default();
        assert_eq!(
            parse_price_band("Rs. 2.5 Cr", &cfg),
            PriceBand::inr(22_500_000, 32_500_000)
        );
        assert_eq!(
            parse_price_band("₹ 1.25 Cr onwards", &cfg),
            PriceBand::inr(11_250_000, 16_250_000)
        );
        assert_eq!(
            parse_price_band("₹3Cr", &cfg),
            PriceBand::inr(27_000_000, 39_000_000)
        );
    }

    #[test]
    fn price_defaults() {
        let cfg = MappingConfig::default();
        assert_eq!(
            parse_price_band("On Request", &cfg),
            PriceBand::inr(50_000_000, 200_000_000)
        );
        assert_eq!(
            parse_price_band("85 Lakh", &cfg),
            PriceBand::inr(30_000_000, 150_000_000)
        );
        assert_eq!(
            parse_price_band("", &cfg),
            PriceBand::inr(30_000_000, 150_000_000)
        );
    }

    #[test]
    fn oversized_price_falls_back_instead_of_overflowing() {
        let cfg = MappingConfig::default();
        let fallback = PriceBand::inr(30_000_000, 150_000_000);
        // 换算成卢比仍在 i64 内，乘上浮动比例才溢出
        assert_eq!(parse_price_band("Rs. 900000000000 Cr", &cfg), fallback);
        assert_eq!(
            parse_price_band("Rs. 99999999999999999999 Cr", &cfg),
            fallback
        );
    }

    #[test]
    fn status_relative_to_current_year() {
        assert_eq!(derive_status("Mar 2024", 2026), ProjectStatus::Ready);
        assert_eq!(derive_status("Dec 2026", 2026), ProjectStatus::NearingCompletion);
        assert_eq!(derive_status("2027", 2026), ProjectStatus::UnderConstruction);
        assert_eq!(derive_status("June 2029", 2026), ProjectStatus::Launched);
        assert_eq!(derive_status("Ready To Move", 2026), ProjectStatus::UnderConstruction);
        assert_eq!(derive_status("2024 - 2030", 2026), ProjectStatus::Ready);
    }

    #[test]
    fn full_marks_are_capped() {
        let cfg = MappingConfig::default();
        assert_eq!(credibility_score(&listing(), &cfg), 100);
    }

    #[test]
    fn placeholder_rera_earns_nothing() {
        let cfg = MappingConfig::default();
        let mut raw = listing();
        raw.rera = vec!["#".into(), String::new()];
        raw.images.truncate(2);
        raw.price = "On Request".into();
        raw.builder = String::new();
        assert_eq!(credibility_score(&raw, &cfg), 60);
        assert_eq!(real_rera_id(&raw), None);
    }

    #[test]
    fn highlights_keep_vocabulary_order_and_cap() {
        let cfg = MappingConfig::default();
        assert_eq!(
            extract_highlights("Ready possession, LUXURY towers", &cfg),
            ["Luxury Project", "Ready to Move"]
        );
        assert_eq!(
            extract_highlights(&listing().keywords, &cfg),
            [
                "Luxury Project",
                "RERA Approved",
                "Premium Location",
                "Modern Amenities"
            ]
        );
        assert!(extract_highlights("", &cfg).is_empty());
    }

    #[test]
    fn states_and_unit_types() {
        assert_eq!(state_for_city("Gurgaon"), "Haryana");
        assert_eq!(state_for_city("Bengaluru"), "Karnataka");
        assert_eq!(state_for_city("Kochi"), "Unknown");
        assert_eq!(parse_unit_type("3 BHK Apartment"), "3BHK");
        assert_eq!(parse_unit_type("Penthouse"), "2BHK");
        assert_eq!(bhk_count("Studio"), None);
    }

    #[test]
    fn maps_listing_fields() {
        let cfg = MappingConfig::default();
        let p = map_listing(&listing(), "builder-1", 2026, &cfg);
        assert_eq!(p.name, "Skyline Residences");
        assert_eq!(p.city, "Pune");
        assert_eq!(p.locality, "Baner");
        assert_eq!(p.state.as_deref(), Some("Maharashtra"));
        assert_eq!(p.pincode.as_deref(), Some("411045"));
        assert_eq!(p.address, None);
        assert_eq!(p.status, ProjectStatus::UnderConstruction);
        assert_eq!(p.rera_id.as_deref(), Some("RERA123"));
        assert_eq!(p.rera_link.as_deref(), Some("http://rera.example/123"));
        assert_eq!(
            p.description.as_deref(),
            Some("Premium 2 BHK & 3 BHK project by Acme")
        );
        let media = p.media.unwrap();
        assert_eq!(media.len(), 4);
        assert_eq!(media[0].url, "https://moneytreerealty.in/a.jpg");
        assert_eq!(p.sources.unwrap(), ["MoneyTree Feed"]);
        assert_eq!(p.approved, Some(true));
        assert_eq!(cfg.project_id("101"), "mt_101");
    }
}
