use std::fs::File;

use anyhow::{Error, Result};
use serde::Deserialize;

use self::{db::DbConfig, definition::DefinitionConfig, log::LogConfig, user::UserConfig};

pub mod db;
pub mod definition;
pub mod log;
pub mod user;

#[derive(Deserialize)]
pub struct Config {
    log: LogConfig,
    db: DbConfig,
    user: UserConfig,
    definition: DefinitionConfig,
}

impl Config {
    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn db(&self) -> &DbConfig {
        &self.db
    }

    pub fn user(&self) -> &UserConfig {
        &self.user
    }

    pub fn definition(&self) -> &DefinitionConfig {
        &self.definition
    }
}

pub fn from_path(path: &str) -> Result<Config> {
    let file = File::open(path)
        .map_err(|err| Error::msg(format!("Failed to open config file '{path}': {err}")))?;
    from_reader(file)
}

pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Config> {
    Ok(serde_yaml::from_reader::<_, Config>(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
log:
  display_level: true
  level_filter: debug
db:
  sqlite:
    path: dcgeneral.db
user:
  id: 7
  username: editor
definition:
  name: tl_news
  data_providers:
    - name: tl_news
      table: tl_news
    - name: tl_news_archive
      table: tl_news_archive
      initialization_data:
        source: tl_news_archive
"#;

    #[test]
    fn parses_full_config() {
        let config = from_reader(CONFIG.as_bytes()).unwrap();
        assert!(*config.log().display_level());
        assert_eq!(config.log().level_filter(), "debug");
        assert_eq!(config.db().sqlite().path(), "dcgeneral.db");
        assert_eq!(*config.db().sqlite().max_connections(), 1);
        assert_eq!(*config.user().id(), 7);
        assert_eq!(config.user().username(), "editor");
        assert_eq!(config.definition().name(), "tl_news");

        let providers = config.definition().data_providers();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[1].table(), "tl_news_archive");
        assert!(providers[0].initialization_data().is_none());
        assert_eq!(
            providers[1].initialization_data().as_ref().unwrap()["source"],
            "tl_news_archive"
        );
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(from_reader("log:\n  display_level: true\n  level_filter: info\n".as_bytes()).is_err());
    }
}
