use std::fs;

use anyhow::{Error, Result};

pub fn get() -> Result<String> {
    let config_path = match std::env::var("DCG_CONFIG_PATH") {
        Ok(path) => path,
        Err(_) => "config.yml".to_owned(),
    };

    if fs::metadata(&config_path).is_err() {
        return Err(Error::msg(format!(
            "config file '{config_path}' specified in DCG_CONFIG_PATH environment variable or current directory must exist"
        )));
    }

    Ok(config_path)
}
