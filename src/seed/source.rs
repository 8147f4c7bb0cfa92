//! Where seed data comes from.

use std::{fmt::Debug, path::PathBuf};

use async_trait::async_trait;
use reqwest::Client;

use crate::{Error, transaction::NewTransaction};

/// The dataset that the seed endpoint loads by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Provides the transactions used to seed the database.
#[async_trait]
pub trait SeedSource: Debug + Send + Sync {
    /// Fetch every seed transaction.
    ///
    /// # Errors
    /// Returns [Error::SeedFetch] if the data cannot be retrieved, or
    /// [Error::InvalidSeedData] if it is not a JSON array of transactions.
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error>;
}

/// Fetches seed data from a JSON document served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    client: Client,
    url: String,
}

impl HttpSeedSource {
    /// Create a source that downloads the JSON array at `url`.
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_owned(),
        }
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        tracing::debug!("Fetching seed data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::SeedFetch(format!("{}: {error}", self.url)))?;

        response
            .json::<Vec<NewTransaction>>()
            .await
            .map_err(|error| {
                if error.is_decode() {
                    Error::InvalidSeedData(format!("{}: {error}", self.url))
                } else {
                    Error::SeedFetch(format!("{}: {error}", self.url))
                }
            })
    }
}

/// Reads seed data from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    /// Create a source that reads the JSON array in the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|error| Error::SeedFetch(format!("{}: {error}", self.path.display())))?;

        parse_seed_data(&body)
    }
}

fn parse_seed_data(body: &[u8]) -> Result<Vec<NewTransaction>, Error> {
    serde_json::from_slice(body).map_err(|error| Error::InvalidSeedData(error.to_string()))
}

/// A seed source that returns fixed data, or fails if there is none.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct StaticSeedSource {
    pub(crate) transactions: Option<Vec<NewTransaction>>,
}

#[cfg(test)]
#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        self.transactions
            .clone()
            .ok_or_else(|| Error::SeedFetch("the static seed source is unavailable".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    use crate::{
        Error,
        seed::{FileSeedSource, HttpSeedSource, SeedSource},
    };

    const SEED_JSON: &str = r#"[
        {
            "id": 1,
            "title": "Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://example.com/backpack.jpg",
            "sold": true,
            "dateOfSale": "2022-03-15T10:00:00+00:00"
        },
        {
            "id": 2,
            "title": "Ring",
            "price": 695,
            "description": "Gold",
            "category": "jewelery",
            "sold": false,
            "dateOfSale": "2022-03-20T10:00:00Z"
        }
    ]"#;

    /// Serve `router` on a random local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind test listener");
        let address = listener.local_addr().expect("Could not get local address");
        tokio::spawn(async move { axum::serve(listener, router).await });

        format!("http://{address}")
    }

    fn write_temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Could not create temp file");
        file.write_all(contents.as_bytes())
            .expect("Could not write temp file");
        file
    }

    #[tokio::test]
    async fn reads_transactions_from_file() {
        let file = write_temp_file(SEED_JSON);

        let transactions = FileSeedSource::new(file.path()).fetch().await.unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].title, "Backpack");
        assert_eq!(transactions[1].price, 695.0);
        assert_eq!(transactions[1].image, "");
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_seed_data() {
        let file = write_temp_file(r#"{"title": "not an array"}"#);

        let result = FileSeedSource::new(file.path()).fetch().await;

        assert!(matches!(result, Err(Error::InvalidSeedData(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn malformed_date_is_invalid_seed_data() {
        let file = write_temp_file(&SEED_JSON.replace("2022-03-20T10:00:00Z", "last tuesday"));

        let result = FileSeedSource::new(file.path()).fetch().await;

        assert!(matches!(result, Err(Error::InvalidSeedData(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let result = FileSeedSource::new("/this/file/does/not/exist.json")
            .fetch()
            .await;

        assert!(matches!(result, Err(Error::SeedFetch(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn downloads_transactions_over_http() {
        let base_url = serve(Router::new().route("/seed.json", get(|| async { SEED_JSON }))).await;

        let transactions = HttpSeedSource::new(&format!("{base_url}/seed.json"))
            .fetch()
            .await
            .unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].title, "Backpack");
        assert!(transactions[0].sold);
    }

    #[tokio::test]
    async fn undecodable_download_is_invalid_seed_data() {
        let base_url =
            serve(Router::new().route("/seed.json", get(|| async { "<html>oops</html>" }))).await;

        let result = HttpSeedSource::new(&format!("{base_url}/seed.json"))
            .fetch()
            .await;

        assert!(matches!(result, Err(Error::InvalidSeedData(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn error_status_is_a_fetch_error() {
        let base_url = serve(Router::new().route(
            "/seed.json",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        ))
        .await;

        let result = HttpSeedSource::new(&format!("{base_url}/seed.json"))
            .fetch()
            .await;

        assert!(matches!(result, Err(Error::SeedFetch(_))), "got {result:?}");
    }
}
