/*
[INPUT]:  Compact numeric field keys from streamer data frames
[OUTPUT]: Semantic field names, one fixed table per service
[POS]:    Data layer - field schema registry
[UPDATE]: When the streamer publishes new field indices
*/

/// Fixed mapping from compact numeric wire keys to semantic field names.
///
/// Wire keys are the decimal strings `"0"..="N"`, so the table is stored
/// positionally: index `i` holds the name of field `"i"`. Keys outside the
/// table (or non-numeric keys such as `"key"`) have no label and pass
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSchema {
    name: &'static str,
    fields: &'static [&'static str],
}

impl ServiceSchema {
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Semantic name for one numeric wire key, if the schema defines it
    pub fn label(&self, key: &str) -> Option<&'static str> {
        let index: usize = key.parse().ok()?;
        self.fields.get(index).copied()
    }

    /// Highest field index the schema defines
    pub const fn max_field_index(&self) -> usize {
        self.fields.len() - 1
    }

    /// The subscribe `fields` parameter: `"0,1,...,N"` over the whole table
    pub fn field_range(&self) -> String {
        (0..=self.max_field_index())
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub const ACCOUNT_ACTIVITY: ServiceSchema = ServiceSchema::new(
    "account_activity",
    &["subscription_key", "account_id", "msg_type", "msg"],
);

pub const LEVEL_ONE_EQUITY: ServiceSchema = ServiceSchema::new(
    "level_one_equity",
    &[
        "Symbol",
        "Bid Price",
        "Ask Price",
        "Last Price",
        "Bid Size",
        "Ask Size",
        "Ask ID",
        "Bid ID",
        "Total Volume",
        "Last Size",
        "Trade Time",
        "Quote Time",
        "High Price",
        "Low Price",
        "Bid Tick",
        "Close Price",
        "Exchange ID",
        "Marginable",
        "Shortable",
        "Island Bid",
        "Island Ask",
        "Island Volume",
        "Quote Day",
        "Trade Day",
        "Volatility",
        "Description",
        "Last ID",
        "Digits",
        "Open Price",
        "Net Change",
        "52 Week High",
        "52 Week Low",
        "PE Ratio",
        "Dividend Amount",
        "Dividend Yield",
        "Island Bid Size",
        "Island Ask Size",
        "NAV",
        "Fund Price",
        "Exchange Name",
        "Dividend Date",
        "Regular Market Quote",
        "Regular Market Trade",
        "Regular Market Last Price",
        "Regular Market Last Size",
        "Regular Market Trade Time",
        "Regular Market Trade Day",
        "Regular Market Net Change",
        "Security Status",
        "Mark",
        "Quote Time",
        "Trade Time",
        "Regular Market Trade Time",
    ],
);

pub const LEVEL_ONE_OPTIONS: ServiceSchema = ServiceSchema::new(
    "level_one_options",
    &[
        "Symbol",
        "Description",
        "Bid Price",
        "Ask Price",
        "Last Price",
        "High Price",
        "Low Price",
        "Close Price",
        "Total Volume",
        "Open Interest",
        "Volatility",
        "Quote Time",
        "Trade Time",
        "Money Intrinsic Value",
        "Quote Day",
        "Trade Day",
        "Expiration Year",
        "Multiplier",
        "Digits",
        "Open Price",
        "Bid Size",
        "Ask Size",
        "Last Size",
        "Net Change",
        "Strike Price",
        "Contract Type",
        "Underlying",
        "Expiration Month",
        "Deliverables",
        "Time Value",
        "Expiration Day",
        "Days to Expiration",
        "Delta",
        "Gamma",
        "Theta",
        "Vega",
        "Rho",
        "Security Status",
        "Theoretical Option Value",
        "Underlying Price",
        "UV Expiration Type",
        "Mark",
    ],
);

pub const LEVEL_ONE_FUTURES: ServiceSchema = ServiceSchema::new(
    "level_one_futures",
    &[
        "Symbol",
        "Bid Price",
        "Ask Price",
        "Last Price",
        "Bid Size",
        "Ask Size",
        "Ask ID",
        "Bid ID",
        "Total Volume",
        "Last Size",
        "Quote Time",
        "Trade Time",
        "High Price",
        "Low Price",
        "Close Price",
        "Exchange ID",
        "Description",
        "Last ID",
        "Open Price",
        "Net Change",
        "Future Percent Change",
        "Exchange Name",
        "Security Status",
        "Open Interest",
        "Mark",
        "Tick",
        "Tick Amount",
        "Product",
        "Future Price Format",
        "Future Trading Hours",
        "Future is Tradable",
        "Future Multiplier",
        "Future is Active",
        "Future Settlement Price",
        "Future Active Symbol",
        "Future Expiration Date",
    ],
);

pub const BOOK: ServiceSchema =
    ServiceSchema::new("book", &["Mark", "Time", "Bids", "Asks"]);

pub const BOOK_BIDS: ServiceSchema = ServiceSchema::new(
    "book_bids",
    &["Price", "Volume", "Num Bids", "Exchange Details"],
);

pub const BOOK_ASKS: ServiceSchema =
    ServiceSchema::new("book_asks", &["Price", "Volume", "Num Asks", "Exchanges"]);

pub const BOOK_EXCHANGE: ServiceSchema =
    ServiceSchema::new("book_exchange", &["Exchange", "Volume", "Sequence"]);

pub const TIMESALE: ServiceSchema = ServiceSchema::new(
    "timesale",
    &[
        "Symbol",
        "Trade Time",
        "Last Price",
        "Last Size",
        "Last Sequence",
    ],
);

pub const NEWS_HEADLINE: ServiceSchema = ServiceSchema::new(
    "news_headline",
    &[
        "Symbol",
        "Error Code",
        "Story Datetime",
        "Headline ID",
        "Status",
        "Headline",
        "Story ID",
        "Count for Keyword",
        "Keyword Array",
        "Is Hot",
        "Story Source",
    ],
);
