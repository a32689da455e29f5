// Utility helpers shared by routes and services

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Shortens a wallet address to `abcd...wxyz` for prompts and logs.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Races `future` against a wall-clock deadline. The future is dropped when
/// the deadline wins, which cancels any request it still has in flight.
pub async fn run_with_timeout<T, F>(timeout: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(timeout.as_secs())),
    }
}

// Internal helper that formats a price with token-specific precision.
pub fn format_price(symbol: &str, price: f64) -> String {
    match symbol {
        "BONK" | "WIF" => format!("{:.8}", price),
        _ => format!("{:.2}", price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_address_keeps_head_and_tail() {
        // Memastikan alamat panjang dipendekkan menjadi 4 karakter depan dan belakang
        assert_eq!(
            shorten_address("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"),
            "9xQe...VFin"
        );
        assert_eq!(shorten_address("short"), "short");
    }

    #[tokio::test(start_paused = true)]
    async fn run_with_timeout_reports_timeout() {
        let result: Result<()> = run_with_timeout(Duration::from_secs(30), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(30))));
    }

    #[tokio::test]
    async fn run_with_timeout_passes_result_through() {
        let result = run_with_timeout(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn format_price_uses_meme_precision() {
        assert_eq!(format_price("BONK", 0.000021), "0.00002100");
        assert_eq!(format_price("SOL", 142.456), "142.46");
    }
}
