//! Retrieval of paged remote collections

use crate::error::Result;
use crate::traits::PageSource;

/// Fetch pages until one comes back empty, or until at least `max_items` have been collected.
///
/// The offset of the next page is the number of items collected so far, so the remote collection is assumed not to
/// change while it is being walked.
/// The limit is only checked between pages: the result can exceed `max_items` by up to one page.
pub async fn collect_pages<S>(source: &mut S, max_items: usize) -> Result<Vec<S::Item>>
where
    S: PageSource + ?Sized,
{
    let mut items = Vec::new();

    loop {
        let skip = if items.is_empty() { None } else { Some(items.len()) };
        let page = source.fetch_page(skip).await?;
        log::debug!("Fetched a page of {} items (skip={:?})", page.len(), skip);

        if page.is_empty() {
            break;
        }
        items.extend(page);

        if items.len() >= max_items {
            break;
        }
    }

    Ok(items)
}
