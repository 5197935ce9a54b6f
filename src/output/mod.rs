pub mod formatter;

pub use formatter::{
    format_calculation, format_differential, format_index, format_json, format_player_table,
    format_rounds_table, format_summary, format_tsv, should_use_colors, PlayerSummary,
};
