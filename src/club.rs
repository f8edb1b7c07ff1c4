//! This module provides a client to the Spond Club API, that exposes payments
//!
//! It logs in exactly like [`Spond`](crate::Spond), but with its own session: the two clients never share a token or
//! cached data, even when they are created with the same credentials.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::config::{ClientConfig, Credentials};
use crate::error::Result;
use crate::pagination::collect_pages;
use crate::session::{send_json, Session};
use crate::traits::{ApiClient, PageSource};

/// The header that tells which club a request is about
pub const CLUB_ID_HEADER: &str = "X-Spond-Clubid";

/// A payment record. Its content is passed through as-is
pub type Transaction = Value;

pub struct SpondClub {
    session: Session,
    transactions: Option<Vec<Transaction>>,
}

impl SpondClub {
    /// Create a client to the production API. This does not start a connection
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::club()?)
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            session: Session::new(credentials, config)?,
            transactions: None,
        })
    }

    /// The transactions fetched last, if any
    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.transactions.as_deref()
    }

    /// Fetch the transactions of a club, page by page, until at least `max_items` have been retrieved or there are
    /// no more of them.
    ///
    /// `club_id` is the club identifier, which is not the same as a group id.
    /// The result can hold a bit more than `max_items` transactions, see [`collect_pages`].
    pub async fn get_transactions(&mut self, club_id: &str, max_items: usize) -> Result<&[Transaction]> {
        self.session.ensure_authenticated().await?;

        let mut pages = TransactionPages { session: &self.session, club_id };
        let transactions = collect_pages(&mut pages, max_items).await?;
        log::info!("Retrieved {} transactions for club {}", transactions.len(), club_id);
        Ok(self.transactions.insert(transactions))
    }
}

impl ApiClient for SpondClub {
    fn session(&self) -> &Session { &self.session }
    fn session_mut(&mut self) -> &mut Session { &mut self.session }
}


struct TransactionPages<'a> {
    session: &'a Session,
    club_id: &'a str,
}

#[async_trait]
impl<'a> PageSource for TransactionPages<'a> {
    type Item = Transaction;

    async fn fetch_page(&mut self, skip: Option<usize>) -> Result<Vec<Transaction>> {
        let url = self.session.config().endpoint("transactions")?;
        let mut request = self.session.request(Method::GET, url)?
            .header(CLUB_ID_HEADER, self.club_id);
        if let Some(skip) = skip {
            request = request.query(&[("skip", skip)]);
        }
        send_json(request).await
    }
}
