//! Deep-link creation and parsing (`https://t.me/<bot>?start=reg_...`).

/// Prefix carried in the bot start payload for registration links.
const START_PREFIX: &str = "reg_";

/// Build the deep link a registrant opens to reach the bot.
pub fn deep_link(bot_username: &str, reg_id: &str) -> String {
    format!("https://t.me/{bot_username}?start={START_PREFIX}{reg_id}")
}

/// Extract the registration id from a bot start payload, if it is a
/// registration payload at all.
pub fn parse_start_payload(payload: &str) -> Option<&str> {
    payload.strip_prefix(START_PREFIX).filter(|rest| !rest.is_empty())
}
