//! Where a dataset is loaded from.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::error::DatasetError;
use super::types::Dataset;

/// Request timeout for remote datasets.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// A dataset location: a local file or an HTTP(S) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Interpret a location string. Anything starting with `http://` or
    /// `https://` is a URL, everything else a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Fetch and parse the dataset.
    pub async fn load(&self) -> Result<Dataset, DatasetError> {
        let body = match self {
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| DatasetError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            Self::Url(url) => fetch(url).await?,
        };

        parse_dataset(&body)
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

async fn fetch(url: &str) -> Result<String, DatasetError> {
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let response = http.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DatasetError::Status {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response.text().await?)
}

pub(crate) fn parse_dataset(body: &str) -> Result<Dataset, DatasetError> {
    serde_json::from_str(body).map_err(|e| DatasetError::Json {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_location() {
        assert_eq!(
            DatasetSource::parse("https://example.org/davao.json"),
            DatasetSource::Url("https://example.org/davao.json".into())
        );
        assert_eq!(
            DatasetSource::parse("http://localhost:8080/feed"),
            DatasetSource::Url("http://localhost:8080/feed".into())
        );
        assert_eq!(
            DatasetSource::parse("data/davao.json"),
            DatasetSource::File(PathBuf::from("data/davao.json"))
        );
    }

    #[test]
    fn display() {
        assert_eq!(DatasetSource::parse("data/davao.json").to_string(), "data/davao.json");
        assert_eq!(
            DatasetSource::parse("https://example.org/x").to_string(),
            "https://example.org/x"
        );
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(
            &path,
            r#"{"stops": [{"stop_id": "S1", "stop_name": "Agdao", "stop_lat": 7.08, "stop_lon": 125.62}]}"#,
        )
        .unwrap();

        let dataset = DatasetSource::File(path).load().await.unwrap();
        assert_eq!(dataset.stops.len(), 1);
        assert_eq!(dataset.stops[0].stop_id, "S1");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = DatasetSource::parse("/nonexistent/dataset.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = DatasetSource::File(path).load().await.unwrap_err();
        assert!(matches!(err, DatasetError::Json { .. }));
    }
}
