use serde::{Deserialize, Serialize};

/// Display profile for a user id. Threads capture a copy of this at
/// creation time, so a stale snapshot is expected and tolerated.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
}

impl Profile {
    pub fn new(display_name: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            avatar,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }
}
