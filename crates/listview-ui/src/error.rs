/// Contract violations detected while building a [`ListView`](crate::ListView).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListViewError {
    #[error("a list view needs a render_row callback")]
    MissingRenderRow,
    #[error("page_size must be at least one row")]
    ZeroPageSize,
    #[error("{name} must be a finite, non-negative distance, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
}
