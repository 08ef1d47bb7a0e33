//! Journals API.

use crate::client::FolioClient;
use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::types::{Journal, JournalResponse, ListJournalsResponse, SubmitJournalRequest};

/// Query parameters for the public journal listing.
#[derive(Debug, Default, Clone)]
pub struct ListJournalsQuery {
    /// Full-text search.
    pub search: Option<String>,
    /// Filter by category.
    pub category: Option<String>,
    /// Filter by tag.
    pub tag: Option<String>,
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl ListJournalsQuery {
    fn apply(&self, mut descriptor: RequestDescriptor) -> RequestDescriptor {
        let pairs = [
            ("search", self.search.clone()),
            ("category", self.category.clone()),
            ("tag", self.tag.clone()),
            ("page", self.page.map(|p| p.to_string())),
            ("limit", self.limit.map(|l| l.to_string())),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                descriptor = descriptor.query_pair(key, value);
            }
        }
        descriptor
    }
}

/// Journals API client.
pub struct JournalsApi {
    client: FolioClient,
}

impl JournalsApi {
    pub(crate) fn new(client: FolioClient) -> Self {
        Self { client }
    }

    /// Published journals. Public endpoint.
    pub async fn list_public(&self, query: ListJournalsQuery) -> Result<ListJournalsResponse> {
        let descriptor = query.apply(RequestDescriptor::get("/journals/public"));
        self.client.send(descriptor).await?.json()
    }

    /// Journals submitted by the logged-in user.
    pub async fn my_journals(&self) -> Result<ListJournalsResponse> {
        self.client.get("/journals/my-journals").await
    }

    /// Get a journal by ID.
    pub async fn get(&self, id: &str) -> Result<Journal> {
        let response: JournalResponse = self.client.get(&format!("/journals/{}", id)).await?;
        Ok(response.journal)
    }

    /// Submit a new article for review.
    pub async fn submit(&self, request: SubmitJournalRequest) -> Result<Journal> {
        let response: JournalResponse = self.client.post("/journals", &request).await?;
        Ok(response.journal)
    }
}
