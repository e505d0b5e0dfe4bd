//! User profile model.
//!
//! Single-record document persisted independently of habits.

use serde::{Deserialize, Serialize};

const DEFAULT_PROFILE_NAME: &str = "User";

/// Profile shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default = "default_profile_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    /// Platform URI of the picked or captured picture.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: default_profile_name(),
            email: String::new(),
            bio: String::new(),
            profile_picture: None,
        }
    }
}

fn default_profile_name() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}
