use std::{fs, path::Path, time::Duration};

use reqwest::{blocking::Client, header::USER_AGENT};

use crate::error::IngestError;

/// The one network operation the downloaders need.  Swap it out in tests.
pub trait HttpGet {
    /// Return the body of a successful GET.  A non-2xx status is an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, IngestError>;
}

pub struct BlockingClient {
    client: Client,
    user_agent: String,
}

impl BlockingClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, IngestError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(BlockingClient {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

impl HttpGet for BlockingClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Fetch `url` and write the body verbatim to `file_path`, creating the parent
/// directories.  An existing file is overwritten.
pub fn download_file(
    client: &impl HttpGet,
    url: &str,
    file_path: &Path,
) -> Result<(), IngestError> {
    let body = client.get(url)?;
    if let Some(dir) = file_path.parent() {
        fs::create_dir_all(dir).map_err(|e| IngestError::io(dir, e))?;
    }
    fs::write(file_path, &body).map_err(|e| IngestError::io(file_path, e))?;
    Ok(())
}

#[cfg(test)]
pub mod fake {
    use std::{cell::RefCell, collections::HashMap};

    use reqwest::StatusCode;

    use super::HttpGet;
    use crate::error::IngestError;

    /// Serves canned bodies keyed by url, 404 for everything else.  Keeps a log
    /// of the requested urls.
    #[derive(Default)]
    pub struct FakeSite {
        pub pages: HashMap<String, Vec<u8>>,
        pub requests: RefCell<Vec<String>>,
    }

    impl FakeSite {
        pub fn with_page(mut self, url: &str, body: &[u8]) -> Self {
            self.pages.insert(url.to_string(), body.to_vec());
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl HttpGet for FakeSite {
        fn get(&self, url: &str) -> Result<Vec<u8>, IngestError> {
            self.requests.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(body.clone()),
                None => Err(IngestError::HttpStatus {
                    url: url.to_string(),
                    status: StatusCode::NOT_FOUND,
                }),
            }
        }
    }
}
