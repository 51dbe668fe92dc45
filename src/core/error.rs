use chrono::NaiveDate;

use crate::core::feed::Feed;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Talking to an upstream feed failed. The caller decides whether to retry.
    #[error("failed to fetch the {feed} feed")]
    SourceFetch {
        feed: Feed,

        #[source]
        cause: FetchError,
    },

    /// The feed answered, but had nothing for the day.
    #[error("the {feed} feed has no records on {date}")]
    IncompleteData { feed: Feed, date: NaiveDate },

    #[error("no wind generation data in the {n_days} days before {since}")]
    NoDataAvailable { since: NaiveDate, n_days: u32 },

    #[error("no {duration_hours}-hour window starts at {start_hour}:00 in the forecast")]
    InvalidWindow { start_hour: u32, duration_hours: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed XML document")]
    Xml(#[from] quick_xml::DeError),
}
