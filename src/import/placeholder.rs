//! 占位数据生成器。
//!
//! 上游数据没有开发商评级、认证状态和户型面积，这里用可设种子的随机数补齐，
//! 上线前必须换成真实数据源。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const VERIFIED_PROBABILITY: f64 = 0.7;
pub const FEATURED_PROBABILITY: f64 = 0.5;
pub const RATING_MIN: f64 = 3.5;
pub const RATING_MAX: f64 = 5.0;
pub const DEFAULT_CARPET_AREA: f64 = 750.0;

/// (户型标记, 面积下限, 浮动范围)
const CARPET_RANGES: &[(&str, f64, f64)] = &[
    ("1 BHK", 450.0, 150.0),
    ("2 BHK", 650.0, 200.0),
    ("3 BHK", 950.0, 300.0),
    ("4 BHK", 1400.0, 400.0),
    ("5 BHK", 2000.0, 500.0),
];

pub struct PlaceholderGen {
    rng: StdRng,
}

impl PlaceholderGen {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn verified(&mut self) -> bool {
        self.rng.gen_bool(VERIFIED_PROBABILITY)
    }

    /// 一位小数
    pub fn rating(&mut self) -> f64 {
        let r: f64 = self.rng.gen_range(RATING_MIN..=RATING_MAX);
        ((r * 10.0).round() / 10.0).clamp(RATING_MIN, RATING_MAX)
    }

    pub fn featured(&mut self) -> bool {
        self.rng.gen_bool(FEATURED_PROBABILITY)
    }

    pub fn carpet_area(&mut self, unit_detail: &str) -> f64 {
        match CARPET_RANGES
            .iter()
            .find(|(tag, _, _)| unit_detail.contains(tag))
        {
            Some((_, base, spread)) => {
                let area = base + self.rng.gen_range(0.0..*spread);
                area.round()
            }
            None => DEFAULT_CARPET_AREA,
        }
    }
}
