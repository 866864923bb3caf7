// Category statistics: value parsing, multi-week aggregation, league ranking.

pub mod aggregate;
pub mod category;
pub mod parse;
pub mod rankings;
