use ecow::EcoString;

/// Document-level metadata, collected from `set document(..)` properties
/// while realizing the document's top-level content.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<EcoString>,
    pub author: Vec<EcoString>,
}
