use async_trait::async_trait;

use crate::error::Result;
use crate::session::Session;

/// Behaviour shared by every authenticated client of this crate
#[async_trait]
pub trait ApiClient: Send {
    fn session(&self) -> &Session;
    fn session_mut(&mut self) -> &mut Session;

    /// Log in if no token is held yet. Calling this repeatedly only logs in once.
    async fn ensure_authenticated(&mut self) -> Result<()> {
        self.session_mut().ensure_authenticated().await
    }

    /// Release the transport. This must be called once the client is not needed anymore
    fn close(&mut self) {
        self.session_mut().close()
    }

    fn is_closed(&self) -> bool {
        self.session().is_closed()
    }
}

/// A remote collection that is served one page at a time
#[async_trait]
pub trait PageSource: Send {
    type Item: Send;

    /// Fetch the page that starts after `skip` items (`None` for the first page).
    /// An empty page means the collection is exhausted.
    async fn fetch_page(&mut self, skip: Option<usize>) -> Result<Vec<Self::Item>>;
}
