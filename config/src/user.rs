use serde::Deserialize;

/// The backend user on whose behalf versions and undo entries are written.
#[derive(Deserialize)]
pub struct UserConfig {
    id: i64,
    username: String,
}

impl UserConfig {
    pub fn id(&self) -> &i64 {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
