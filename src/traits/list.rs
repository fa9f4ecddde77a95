//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;
use crate::pagination::{Page, PageOptions};

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List/filter entities with pagination support.
///
/// Implement this trait for entity types that can be listed with
/// optional filtering and pagination.
///
/// # Example
///
/// ```ignore
/// use dtrackapi::{DtrackClient, PageOptions, Project, List};
///
/// let client = DtrackClient::from_env()?;
///
/// // Fetch a single page
/// let page = Project::list_page(&client, &Default::default(), &PageOptions::for_page(1, 50)).await?;
///
/// // Fetch all pages
/// let all_projects = Project::list_all(&client, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// List entities matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The Dependency-Track API client
    /// * `query` - Query parameters for filtering
    /// * `options` - Offset, page number and page size
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &DtrackClient,
        query: &Self::Query,
        options: &PageOptions,
    ) -> Result<Page<Self>>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// Pages are requested until the number of collected items reaches the
    /// total reported by the server, or a page comes back empty. When the
    /// server sends no total, a short page also ends the walk.
    ///
    /// # Arguments
    ///
    /// * `client` - The Dependency-Track API client
    /// * `query` - Query parameters for filtering
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &DtrackClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page_number = 1;

        loop {
            let options = PageOptions::for_page(page_number, DEFAULT_PAGE_SIZE);
            let page = Self::list_page(client, query, &options).await?;
            if page.is_empty() {
                break;
            }

            let fetched = page.len();
            let total_count = page.total_count;
            all_items.extend(page.items);

            // A missing X-Total-Count reads as 0; only then do short pages end the walk.
            let done = if total_count > 0 {
                all_items.len() as u64 >= total_count
            } else {
                fetched < DEFAULT_PAGE_SIZE as usize
            };
            if done {
                break;
            }
            page_number += 1;

            // Safety limit to prevent infinite loops
            if page_number > MAX_PAGES {
                tracing::warn!(
                    "Reached pagination limit of {} pages, stopping",
                    MAX_PAGES
                );
                break;
            }
        }

        Ok(all_items)
    }
}
