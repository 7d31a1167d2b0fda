use crate::error::Result;
use crate::mapper::map_entry;
use crate::models::Article;
use crate::store::EntryStore;
use std::sync::Arc;
use tracing::debug;

/// Datastore key holding the list of every stored article.
pub const ALL_ARTICLES_KEY: &str = "all_articles";

/// Read-only queries over the articles held in an [`EntryStore`].
#[derive(Clone)]
pub struct NewsFeed {
    store: Arc<dyn EntryStore>,
}

impl NewsFeed {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    /// All stored articles, in the order the datastore returns them.
    ///
    /// A single malformed entry fails the whole call.
    pub fn get_all_articles(&self) -> Result<Vec<Article>> {
        let entries = self.store.get_entry(ALL_ARTICLES_KEY)?;
        let articles = entries.iter().map(map_entry).collect::<Result<Vec<_>>>()?;
        debug!(count = articles.len(), "Mapped articles");
        Ok(articles)
    }

    /// All articles, most recent first. Articles sharing a publish date keep
    /// their stored order. `None` when the store holds no articles.
    pub fn get_featured_articles(&self) -> Result<Option<Vec<Article>>> {
        let mut articles = self.get_all_articles()?;
        if articles.is_empty() {
            return Ok(None);
        }
        articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        Ok(Some(articles))
    }
}
