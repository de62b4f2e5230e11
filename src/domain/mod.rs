pub mod feed;
pub mod item;

pub use feed::FeedUrl;
pub use item::FeedItem;
