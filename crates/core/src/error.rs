use crate::widget::WidgetType;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(WidgetType),

    #[error("Validation failed: {0}")]
    Validation(String),
}
