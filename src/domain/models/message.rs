use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(role: &str, content: &str) -> Message {
        return Message {
            role: role.to_string(),
            content: content.to_string(),
        };
    }
}
