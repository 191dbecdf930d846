//! Plain stream - a cold, finite sequence produced per subscription

use std::time::Duration;

use futures_util::stream::{self, Stream};

use crate::constants::ITEM_PREFIX;

/// A fresh sequence of `count` items ("Item 0", "Item 1", ...).
///
/// Each item is yielded, then the producer sleeps `delay` before the next one
/// (and once more before finishing). Nothing runs until the stream is polled,
/// and dropping it stops the delay loop.
pub fn plain_stream(count: usize, delay: Duration) -> impl Stream<Item = String> + Send + 'static {
    stream::unfold(0usize, move |index| async move {
        if index > 0 {
            tokio::time::sleep(delay).await;
        }
        if index >= count {
            return None;
        }
        Some((format!("{} {}", ITEM_PREFIX, index), index + 1))
    })
}
