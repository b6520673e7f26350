use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use crate::browse::{FetchError, Page, PageRequest, PageSource, Resource};
use crate::config::Config;

/// Back-office list API client
#[derive(Clone)]
pub struct RetailClient {
  http: reqwest::Client,
  base: Url,
}

impl RetailClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base = Url::parse(&config.api.url)
      .map_err(|e| eyre!("Invalid API url {}: {}", config.api.url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("Invalid API url {}: not a base url", config.api.url));
    }

    let mut headers = HeaderMap::new();
    if let Some(token) = Config::get_api_token() {
      let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| eyre!("Invalid API token: {}", e))?;
      headers.insert(AUTHORIZATION, value);
    }

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(config.timeout())
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base })
  }

  /// Host shown in the header
  pub fn host(&self) -> &str {
    self.base.host_str().unwrap_or("")
  }

  /// Fetch one page of a resource listing
  pub async fn list_page<R: Resource>(&self, request: PageRequest) -> Result<Page<R>, FetchError> {
    let url = page_url::<R>(&self.base, &request)?;

    let response = self.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(FetchError::Status {
        status: status.as_u16(),
        body,
      });
    }

    response
      .json::<Page<R>>()
      .await
      .map_err(|e| FetchError::Decode(e.to_string()))
  }
}

impl<R: Resource> PageSource<R> for RetailClient {
  fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<R>, FetchError>> {
    let client = self.clone();
    Box::pin(async move { client.list_page::<R>(request).await })
  }
}

impl From<reqwest::Error> for FetchError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      FetchError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
      FetchError::Status {
        status: status.as_u16(),
        body: err.to_string(),
      }
    } else {
      FetchError::Transport(err.to_string())
    }
  }
}

/// Build `{base}/stores/{scope}/{resource}?page=..&limit=..` for a request.
/// Empty filters are left out.
fn page_url<R: Resource>(base: &Url, request: &PageRequest) -> Result<Url, FetchError> {
  let query = &request.query;
  let mut url = base.clone();

  url
    .path_segments_mut()
    .map_err(|_| FetchError::Transport(format!("invalid base url {}", base)))?
    .pop_if_empty()
    .extend(["stores", query.scope_id.as_str(), R::PATH]);

  {
    let mut pairs = url.query_pairs_mut();
    pairs.append_pair("page", &query.page.to_string());
    pairs.append_pair("limit", &request.limit.to_string());
    if !query.search.is_empty() {
      pairs.append_pair("search", &query.search);
    }
    if !query.category.is_empty() {
      pairs.append_pair(R::CATEGORY_PARAM, &query.category);
    }
    for (name, value) in &query.extra {
      pairs.append_pair(name, &value.as_param());
    }
    if let Some(sort) = &query.sort {
      pairs.append_pair("sort", &sort.field);
      pairs.append_pair("order", sort.direction.as_str());
    }
  }

  Ok(url)
}
