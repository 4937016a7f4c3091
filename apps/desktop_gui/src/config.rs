use std::{collections::HashMap, fs, path::PathBuf};

/// Desktop app settings: where the prediction service lives and where
/// downloaded artifacts land by default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub download_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            download_dir: None,
        }
    }
}

/// Resolution order: built-in defaults, `predictor.toml` in the working
/// directory, environment variables, then the CLI override.
pub fn load_settings(cli_api_url: Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("predictor.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("download_dir") {
                settings.download_dir = Some(PathBuf::from(v));
            }
        }
    }

    if let Ok(v) = std::env::var("PREDICTOR_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("PREDICTOR_DOWNLOAD_DIR") {
        settings.download_dir = Some(PathBuf::from(v));
    }

    if let Some(url) = cli_api_url {
        settings.api_base_url = url;
    }

    settings.api_base_url = normalize_api_base_url(&settings.api_base_url);
    settings
}

fn normalize_api_base_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return Settings::default().api_base_url;
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Where artifact downloads are offered by default: the configured directory,
/// the platform download folder, then the temp directory.
pub fn resolve_download_dir(settings: &Settings) -> PathBuf {
    if let Some(dir) = &settings.download_dir {
        return dir.clone();
    }
    dirs::download_dir().unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(
            normalize_api_base_url("127.0.0.1:5000"),
            "http://127.0.0.1:5000"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        assert_eq!(
            normalize_api_base_url("https://predict.example.com/"),
            "https://predict.example.com"
        );
    }

    #[test]
    fn empty_url_falls_back_to_default() {
        assert_eq!(
            normalize_api_base_url("   "),
            Settings::default().api_base_url
        );
    }
}
