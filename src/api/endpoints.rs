// PostgREST URL builders for the hosted match store

pub const REST_PATH: &str = "/rest/v1";

pub const PROFILE_COLUMNS: &str = "id,display_name,username,avatar_url";

/// Highest slot number in a match; slots are 1-based.
pub const SLOT_COUNT: u8 = 4;

pub fn table_url(base_url: &str, table: &str) -> String {
    format!("{}{}/{}", base_url.trim_end_matches('/'), REST_PATH, table)
}

/// `or` filter matching rows where the user sits in any slot.
pub fn user_slot_filter(user_id: &str) -> String {
    let clauses: Vec<String> = (1..=SLOT_COUNT)
        .map(|slot| format!("user_slot_map->>{}.eq.{}", slot, quote_value(user_id)))
        .collect();
    format!("({})", clauses.join(","))
}

/// `in` filter over profile ids.
pub fn id_in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| quote_value(id)).collect();
    format!("in.({})", quoted.join(","))
}

/// PostgREST reserves `,.:()` inside filter values; wrap those in quotes.
fn quote_value(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | '\\')) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        assert_eq!(
            table_url("https://abc.supabase.co/", "matches"),
            "https://abc.supabase.co/rest/v1/matches"
        );
    }

    #[test]
    fn test_user_slot_filter_covers_every_slot() {
        let filter = user_slot_filter("8f1c-22");
        assert_eq!(
            filter,
            "(user_slot_map->>1.eq.8f1c-22,user_slot_map->>2.eq.8f1c-22,\
user_slot_map->>3.eq.8f1c-22,user_slot_map->>4.eq.8f1c-22)"
        );
    }

    #[test]
    fn test_id_in_filter_quotes_reserved_chars() {
        let ids = vec!["a1".to_string(), "b.2".to_string()];
        assert_eq!(id_in_filter(&ids), "in.(a1,\"b.2\")");
    }
}
