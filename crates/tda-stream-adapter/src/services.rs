/*
[INPUT]:  Service identifiers used on the streamer wire
[OUTPUT]: One descriptor row per concrete data service
[POS]:    Data layer - table-driven service registry
[UPDATE]: When the streamer adds a data service
*/

use crate::fields::{self, ServiceSchema};

/// The administrative control service (login, logout, QOS, forced logoff)
pub const ADMIN: &str = "ADMIN";

/// How a service's records are labeled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    /// Single-level numeric-key relabeling
    Flat,
    /// Two-level relabeling of bid/ask entries and their exchange arrays
    Book,
}

/// Where a service's subscribe `keys` parameter comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Caller-supplied symbols
    Symbols,
    /// The session's account-scoped streamer subscription key
    SubscriptionKey,
}

/// One row of the service table: everything the generic subscribe,
/// unsubscribe and handler machinery needs to know about a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub schema: ServiceSchema,
    pub decoder: DecoderKind,
    pub key_source: KeySource,
}

pub const ACCT_ACTIVITY: ServiceDescriptor = ServiceDescriptor {
    service: "ACCT_ACTIVITY",
    schema: fields::ACCOUNT_ACTIVITY,
    decoder: DecoderKind::Flat,
    key_source: KeySource::SubscriptionKey,
};

pub const LEVEL_ONE_EQUITY: ServiceDescriptor = ServiceDescriptor {
    service: "QUOTE",
    schema: fields::LEVEL_ONE_EQUITY,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

pub const LEVEL_ONE_OPTIONS: ServiceDescriptor = ServiceDescriptor {
    service: "OPTION",
    schema: fields::LEVEL_ONE_OPTIONS,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

pub const LEVEL_ONE_FUTURES: ServiceDescriptor = ServiceDescriptor {
    service: "LEVELONE_FUTURES",
    schema: fields::LEVEL_ONE_FUTURES,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

pub const LISTED_BOOK: ServiceDescriptor = ServiceDescriptor {
    service: "LISTED_BOOK",
    schema: fields::BOOK,
    decoder: DecoderKind::Book,
    key_source: KeySource::Symbols,
};

pub const NASDAQ_BOOK: ServiceDescriptor = ServiceDescriptor {
    service: "NASDAQ_BOOK",
    schema: fields::BOOK,
    decoder: DecoderKind::Book,
    key_source: KeySource::Symbols,
};

pub const OPTIONS_BOOK: ServiceDescriptor = ServiceDescriptor {
    service: "OPTIONS_BOOK",
    schema: fields::BOOK,
    decoder: DecoderKind::Book,
    key_source: KeySource::Symbols,
};

pub const FUTURES_BOOK: ServiceDescriptor = ServiceDescriptor {
    service: "FUTURES_BOOK",
    schema: fields::BOOK,
    decoder: DecoderKind::Book,
    key_source: KeySource::Symbols,
};

pub const FUTURES_OPTIONS_BOOK: ServiceDescriptor = ServiceDescriptor {
    service: "FUTURES_OPTIONS_BOOK",
    schema: fields::BOOK,
    decoder: DecoderKind::Book,
    key_source: KeySource::Symbols,
};

pub const TIMESALE_EQUITY: ServiceDescriptor = ServiceDescriptor {
    service: "TIMESALE_EQUITY",
    schema: fields::TIMESALE,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

pub const TIMESALE_OPTIONS: ServiceDescriptor = ServiceDescriptor {
    service: "TIMESALE_OPTIONS",
    schema: fields::TIMESALE,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

pub const TIMESALE_FUTURES: ServiceDescriptor = ServiceDescriptor {
    service: "TIMESALE_FUTURES",
    schema: fields::TIMESALE,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

pub const NEWS_HEADLINE: ServiceDescriptor = ServiceDescriptor {
    service: "NEWS_HEADLINE",
    schema: fields::NEWS_HEADLINE,
    decoder: DecoderKind::Flat,
    key_source: KeySource::Symbols,
};

/// One concrete data service the client can subscribe to.
///
/// Each variant selects one `ServiceDescriptor` row; the subscribe,
/// unsubscribe and handler operations are generic over that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamService {
    AccountActivity,
    LevelOneEquity,
    LevelOneOptions,
    LevelOneFutures,
    ListedBook,
    NasdaqBook,
    OptionsBook,
    FuturesBook,
    FuturesOptionsBook,
    TimesaleEquity,
    TimesaleOptions,
    TimesaleFutures,
    NewsHeadline,
}

impl StreamService {
    pub const ALL: [StreamService; 13] = [
        StreamService::AccountActivity,
        StreamService::LevelOneEquity,
        StreamService::LevelOneOptions,
        StreamService::LevelOneFutures,
        StreamService::ListedBook,
        StreamService::NasdaqBook,
        StreamService::OptionsBook,
        StreamService::FuturesBook,
        StreamService::FuturesOptionsBook,
        StreamService::TimesaleEquity,
        StreamService::TimesaleOptions,
        StreamService::TimesaleFutures,
        StreamService::NewsHeadline,
    ];

    pub fn descriptor(self) -> &'static ServiceDescriptor {
        match self {
            StreamService::AccountActivity => &ACCT_ACTIVITY,
            StreamService::LevelOneEquity => &LEVEL_ONE_EQUITY,
            StreamService::LevelOneOptions => &LEVEL_ONE_OPTIONS,
            StreamService::LevelOneFutures => &LEVEL_ONE_FUTURES,
            StreamService::ListedBook => &LISTED_BOOK,
            StreamService::NasdaqBook => &NASDAQ_BOOK,
            StreamService::OptionsBook => &OPTIONS_BOOK,
            StreamService::FuturesBook => &FUTURES_BOOK,
            StreamService::FuturesOptionsBook => &FUTURES_OPTIONS_BOOK,
            StreamService::TimesaleEquity => &TIMESALE_EQUITY,
            StreamService::TimesaleOptions => &TIMESALE_OPTIONS,
            StreamService::TimesaleFutures => &TIMESALE_FUTURES,
            StreamService::NewsHeadline => &NEWS_HEADLINE,
        }
    }

    /// Resolve a wire service identifier back to its table row
    pub fn from_wire(service: &str) -> Option<StreamService> {
        StreamService::ALL
            .into_iter()
            .find(|candidate| candidate.descriptor().service == service)
    }
}
