//! Sequential task runner
//!
//! Every traversal level of every orchestrator goes through `process_items`.
//! Items are processed one at a time with a fixed pause after each one; this
//! pause is the only throttling the crawler applies to publisher sites.

use std::future::Future;
use std::time::Duration;

/// Runs `f` over `items` in order, keeping the `Some` results
///
/// Sleeps `delay` after every item, including the last. An empty input
/// returns immediately without sleeping. The first `Err` aborts the
/// remaining items and is returned as is.
///
/// # Arguments
///
/// * `items` - Items to process, in traversal order
/// * `delay` - Pause after each item
/// * `f` - Async transform; `Ok(None)` drops the item from the output
///
/// # Example
///
/// ```
/// use catalog_crawler::crawler::process_items;
/// use std::time::Duration;
///
/// # tokio_test_block(async {
/// let evens = process_items(vec![1, 2, 3, 4], Duration::ZERO, |n| async move {
///     Ok::<_, std::convert::Infallible>((n % 2 == 0).then_some(n * 10))
/// })
/// .await
/// .unwrap();
/// assert_eq!(evens, vec![20, 40]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub async fn process_items<I, T, R, E, F, Fut>(items: I, delay: Duration, mut f: F) -> Result<Vec<R>, E>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<Option<R>, E>>,
{
    let mut results = Vec::new();

    for item in items {
        if let Some(result) = f(item).await? {
            results.push(result);
        }
        tokio::time::sleep(delay).await;
    }

    Ok(results)
}
