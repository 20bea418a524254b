mod engine;
mod report;
mod types;

pub use engine::project;
pub use report::{ChartSeries, Summary, TableRow, format_indian, render_table};
pub use types::{
    GrowthApplied, GrowthFreeze, GrowthMode, InputField, ProjectionError, ProjectionInput,
    ProjectionResult, YearRecord,
};
