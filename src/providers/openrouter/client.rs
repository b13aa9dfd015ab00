use crate::generation::GenerationError;

use super::generation::ImageModel;

// ================================================================
// OpenRouter Client
// ================================================================
const OPENROUTER_API_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub struct ClientBuilder<'a> {
    api_key: &'a str,
    base_url: &'a str,
    http_client: Option<reqwest::Client>,
}

impl<'a> ClientBuilder<'a> {
    pub fn new(api_key: &'a str) -> Self {
        Self {
            api_key,
            base_url: OPENROUTER_API_BASE_URL,
            http_client: None,
        }
    }

    pub fn base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn custom_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Client, GenerationError> {
        let http_client = if let Some(http_client) = self.http_client {
            http_client
        } else {
            reqwest::Client::builder().build()?
        };

        Ok(Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_key: self.api_key.to_string(),
            http_client,
        })
    }
}

#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("http_client", &self.http_client)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

impl Client {
    /// Create a new OpenRouter client builder.
    ///
    /// # Example
    /// ```
    /// use imgen::providers::openrouter::Client;
    ///
    /// let openrouter = Client::builder("your-openrouter-api-key").build()?;
    /// ```
    pub fn builder(api_key: &str) -> ClientBuilder<'_> {
        ClientBuilder::new(api_key)
    }

    /// Create a new OpenRouter client against the public relay. For more
    /// control, use the `builder` method.
    pub fn new(api_key: &str) -> Result<Self, GenerationError> {
        Self::builder(api_key).build()
    }

    /// Create a new OpenRouter client from the `OPENROUTER_API_KEY`
    /// environment variable.
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key =
            std::env::var("OPENROUTER_API_KEY").map_err(|_| GenerationError::MissingCredential)?;
        Self::new(&api_key)
    }

    /// Create an image generation model with the given name.
    pub fn image_model(&self, model: &str) -> ImageModel {
        ImageModel::new(self.clone(), model)
    }

    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!("POST {url}");
        self.http_client.post(url).bearer_auth(&self.api_key)
    }
}
