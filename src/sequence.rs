//! Paced sequential execution: one call at a time, with a fixed pause
//! between consecutive calls.

use std::future::Future;
use std::time::Duration;

/// Runs `f` over `items` strictly in order, sleeping `inter_delay` between
/// consecutive calls (never after the last one).
///
/// Every item produces exactly one output, in input order. Whatever `f`
/// returns is collected as-is, so a failed call does not stop the batch.
///
/// # Examples
///
/// ```
/// use cognima::sequence::paced;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let doubled = paced(vec![1, 2, 3], Duration::from_millis(1), |n| async move { n * 2 }).await;
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # }
/// ```
pub async fn paced<I, F, Fut, T>(items: I, inter_delay: Duration, mut f: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    let items = items.into_iter();
    let mut results = Vec::with_capacity(items.size_hint().0);

    for (index, item) in items.enumerate() {
        if index > 0 && !inter_delay.is_zero() {
            tracing::debug!(
                index = index,
                delay_ms = inter_delay.as_millis(),
                "Pausing before next call in sequence"
            );
            tokio::time::sleep(inter_delay).await;
        }
        results.push(f(item).await);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn keeps_order_and_paces() {
        let start = Instant::now();
        let out = paced(["a", "b", "c"], Duration::from_millis(20), |s| async move {
            (s, Instant::now())
        })
        .await;

        assert_eq!(
            out.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert!(out[1].1 - out[0].1 >= Duration::from_millis(20));
        assert!(out[2].1 - out[1].1 >= Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn no_delay_after_last_item() {
        let start = Instant::now();
        let out = paced([1], Duration::from_secs(5), |n| async move { n }).await;
        assert_eq!(out, vec![1]);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn empty_input() {
        let out: Vec<u8> = paced(Vec::<u8>::new(), Duration::from_secs(1), |n| async move { n }).await;
        assert!(out.is_empty());
    }
}
