use crate::filter::Filter;
use crate::page::{Page, PageRequest};
use crate::sort::SortKey;

/// Filter, sort and slice a snapshot of a collection.
///
/// `items` must arrive in the collection's natural (insertion) order; that
/// order decides ties. `total_elements` is the match count before slicing, so
/// a page past the end comes back empty with full metadata.
pub fn execute<T: 'static>(
    items: Vec<T>,
    filter: &Filter<T>,
    order: Option<&SortKey<T>>,
    request: PageRequest,
) -> Page<T> {
    let mut matched: Vec<T> = items.into_iter().filter(|e| filter.matches(e)).collect();
    if let Some(key) = order {
        key.sort(&mut matched);
    }

    let total = matched.len() as u64;
    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.size()).unwrap_or(usize::MAX);
    let content: Vec<T> = matched.into_iter().skip(skip).take(take).collect();

    Page::new(content, request, total)
}
