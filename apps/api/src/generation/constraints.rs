//! Constraint enforcement — per-tweet length clamp, `[i/n]` numbering, count cap.
//!
//! Order matters and is fixed: clamp, then number, then cap. Numbering sees
//! the already-clamped text, so a long tweet can be cut twice. The cap runs
//! last, so surviving prefixes keep the pre-cap total (`[1/10]` with only
//! five tweets returned).
//!
//! Lengths are counted in chars, never bytes.

/// Hard ceiling for a single tweet.
pub const MAX_TWEET_CHARS: usize = 280;
const ELLIPSIS: &str = "...";
const ELLIPSIS_CHARS: usize = 3;

/// Applies the length clamp, optional numbering and the `max_tweets` cap.
pub fn enforce_constraints(
    tweets: Vec<String>,
    add_numbering: bool,
    max_tweets: usize,
) -> Vec<String> {
    let clamped: Vec<String> = tweets.into_iter().map(clamp_length).collect();

    let mut result = if add_numbering && clamped.len() > 1 {
        add_thread_numbering(clamped)
    } else {
        clamped
    };

    result.truncate(max_tweets);
    result
}

/// Tweets over the ceiling keep their first 277 chars plus `...`.
fn clamp_length(tweet: String) -> String {
    if char_len(&tweet) <= MAX_TWEET_CHARS {
        tweet
    } else {
        truncate_with_ellipsis(&tweet, MAX_TWEET_CHARS - ELLIPSIS_CHARS)
    }
}

/// Prefixes `[i/total] `. When the prefix would push a tweet over the
/// ceiling, the body is re-trimmed so prefix + body + `...` is exactly 280.
fn add_thread_numbering(tweets: Vec<String>) -> Vec<String> {
    let total = tweets.len();

    tweets
        .into_iter()
        .enumerate()
        .map(|(i, tweet)| {
            let prefix = format!("[{}/{}] ", i + 1, total);
            let prefix_len = char_len(&prefix);

            if prefix_len + char_len(&tweet) <= MAX_TWEET_CHARS {
                format!("{prefix}{tweet}")
            } else {
                let budget = MAX_TWEET_CHARS.saturating_sub(prefix_len + ELLIPSIS_CHARS);
                format!("{prefix}{}", truncate_with_ellipsis(&tweet, budget))
            }
        })
        .collect()
}

fn truncate_with_ellipsis(text: &str, keep_chars: usize) -> String {
    let mut trimmed: String = text.chars().take(keep_chars).collect();
    trimmed.push_str(ELLIPSIS);
    trimmed
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_long_tweet_is_clamped_to_280_with_ellipsis() {
        let result = enforce_constraints(vec!["x".repeat(300)], false, 5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].chars().count(), 280);
        assert!(result[0].ends_with("..."));
        assert!(result[0].starts_with(&"x".repeat(277)));
    }

    #[test]
    fn test_tweet_at_exactly_280_is_untouched() {
        let tweet = "y".repeat(280);
        let result = enforce_constraints(vec![tweet.clone()], false, 5);
        assert_eq!(result, vec![tweet]);
    }

    #[test]
    fn test_numbering_two_short_tweets() {
        let result = enforce_constraints(strings(&["short1", "short2"]), true, 5);
        assert_eq!(result, vec!["[1/2] short1", "[2/2] short2"]);
    }

    #[test]
    fn test_single_tweet_is_never_numbered() {
        let result = enforce_constraints(strings(&["only one"]), true, 5);
        assert_eq!(result, vec!["only one"]);
    }

    #[test]
    fn test_numbering_disabled() {
        let result = enforce_constraints(strings(&["a", "b", "c"]), false, 5);
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cap_keeps_pre_cap_total_in_prefixes() {
        let tweets: Vec<String> = (1..=10).map(|i| format!("tweet {i}")).collect();
        let result = enforce_constraints(tweets, true, 5);
        assert_eq!(result.len(), 5);
        for (i, tweet) in result.iter().enumerate() {
            assert!(
                tweet.starts_with(&format!("[{}/10] ", i + 1)),
                "unexpected prefix: {tweet}"
            );
        }
        assert_eq!(result[4], "[5/10] tweet 5");
    }

    #[test]
    fn test_numbering_retrims_clamped_tweet_to_keep_ceiling() {
        let result = enforce_constraints(vec!["x".repeat(300), "short".to_string()], true, 5);
        assert_eq!(result[0].chars().count(), 280);
        // 280 - len("[1/2] ") - 3 = 271 body chars survive the second cut
        assert_eq!(result[0], format!("[1/2] {}...", "x".repeat(271)));
        assert_eq!(result[1], "[2/2] short");
    }

    #[test]
    fn test_numbering_retrim_on_tweet_just_under_ceiling() {
        let body = "z".repeat(278);
        let result = enforce_constraints(vec![body, "b".to_string()], true, 5);
        assert_eq!(result[0], format!("[1/2] {}...", "z".repeat(271)));
    }

    #[test]
    fn test_lengths_are_counted_in_chars_not_bytes() {
        let tweet = "é".repeat(280);
        let result = enforce_constraints(vec![tweet.clone()], false, 5);
        assert_eq!(result, vec![tweet]);

        let result = enforce_constraints(vec!["🚀".repeat(290)], false, 5);
        assert_eq!(result[0].chars().count(), 280);
        assert!(result[0].ends_with("..."));
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(enforce_constraints(Vec::new(), true, 5).is_empty());
    }

    #[test]
    fn test_every_output_respects_ceiling() {
        let tweets: Vec<String> = (0..20).map(|i| "w".repeat(250 + i * 3)).collect();
        let result = enforce_constraints(tweets, true, 20);
        assert_eq!(result.len(), 20);
        assert!(result.iter().all(|t| t.chars().count() <= MAX_TWEET_CHARS));
    }

    #[test]
    fn test_enforce_is_idempotent_without_numbering() {
        let tweets = vec!["x".repeat(300), "fine".to_string(), "also fine".to_string()];
        let once = enforce_constraints(tweets, false, 2);
        let twice = enforce_constraints(once.clone(), false, 2);
        assert_eq!(once, twice);
    }
}
