pub mod formatter;

pub use formatter::{
    format_points, format_slip_table, format_summary, format_tsv, format_weight,
    should_use_colors, truncate_label,
};
