pub mod config;
pub mod handicap;
pub mod output;
pub mod scorecard;
