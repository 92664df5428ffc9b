/*
[INPUT]:  Streamer session identifiers (placeholders here)
[OUTPUT]: Labeled level-one quotes printed per message
[POS]:    Examples - login, subscribe and dispatch loop
[UPDATE]: When the client API changes
*/

use tda_stream_adapter::{StreamService, StreamerSession, TdaStreamClient, handler_fn};

/// Example: stream level-one equity quotes
///
/// The session values come from the user-principals lookup; fill them in
/// before running against the live streamer.
#[tokio::main]
async fn main() {
    let session = StreamerSession {
        account_id: "YOUR_ACCOUNT_ID".to_string(),
        streamer_host: "streamer-ws.tdameritrade.com".to_string(),
        token: "YOUR_STREAMER_TOKEN".to_string(),
        token_timestamp: "2024-01-02T10:00:00+0000".to_string(),
        app_id: "YOUR_APP_ID".to_string(),
        user_group: "ACCT".to_string(),
        access_level: "ACCT".to_string(),
        acl: "YOUR_ACL".to_string(),
        company: "AMER".to_string(),
        segment: "AMER".to_string(),
        cd_domain_id: "YOUR_CD_DOMAIN".to_string(),
        subscription_key: "YOUR_SUBSCRIPTION_KEY".to_string(),
    };

    let mut client = TdaStreamClient::new(session);
    println!("✓ Stream client created");

    client.add_handler(
        StreamService::LevelOneEquity,
        handler_fn(|message| {
            for (symbol, record) in &message.entries {
                println!("{symbol}: {record}");
            }
            None
        }),
    );
    println!("✓ Quote handler registered\n");

    // Against the live streamer:
    // 1. Login:      client.login().await?
    // 2. Subscribe:  client.subscribe(StreamService::LevelOneEquity,
    //                    &["AAPL", "MSFT", "TSLA"]).await?
    // 3. Dispatch:   while client.is_logged_in() {
    //                    client.handle_message().await?;
    //                }
    // 4. Shutdown:   client.logout(true).await?

    println!("Stream client usage:");
    println!("  1. Login: client.login().await?");
    println!("  2. Subscribe: client.subscribe(StreamService::LevelOneEquity, &[\"AAPL\"]).await?");
    println!("  3. Dispatch: client.handle_message().await? in a loop");
    println!("  4. Shutdown: client.logout(true).await?");
}
