use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A collaboratively edited document.
///
/// Stores move documents around as `Arc<Document>` and never look inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Payload for creating a document; the id is assigned by the curator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(input: NewDocument) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            title: input.title,
            description: input.description,
            content: input.content,
        }
    }
}
