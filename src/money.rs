use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rupee amount with Indian digit grouping, e.g. "₹12,34,567.00"
pub fn format_inr(amount: Decimal) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let s = format!("{:.2}", amount.abs());
    let (whole, fraction) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    format!("{}₹{}.{}", sign, group_indian(whole), fraction)
}

/// Rate as a percentage, e.g. 0.0563 -> "5.63%"
pub fn format_pct(rate: Decimal) -> String {
    let pct = (rate * dec!(100)).round_dp(2).normalize();
    format!("{}%", pct)
}

// Last three digits, then pairs: 1234567 -> 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
